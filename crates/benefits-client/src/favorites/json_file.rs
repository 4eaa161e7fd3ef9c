//! JSON file favourites backend.
//!
//! The document shape is `{"favorites": [1, 2], "version": 0}` with the
//! identifiers in ascending order.

use std::collections::BTreeSet;
use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FavoritesError, FavoritesPersistence};
use crate::atomic_io::replace_file;

const DOCUMENT_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct FavoritesDocument {
    favorites: Vec<i64>,
    #[serde(default)]
    version: u32,
}

/// Favourites stored as a JSON document in a capability directory.
#[derive(Debug)]
pub struct JsonFileFavorites {
    dir: Dir,
    file_name: String,
    display_path: Utf8PathBuf,
}

impl JsonFileFavorites {
    /// Store favourites in `file_name` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::InvalidPath`] unless `file_name` is a single
    /// plain path component.
    pub fn new(dir: Dir, file_name: &Utf8Path) -> Result<Self, FavoritesError> {
        let name = single_component(file_name)?;
        Ok(Self {
            dir,
            file_name: name.to_owned(),
            display_path: file_name.to_path_buf(),
        })
    }

    /// Store favourites at `path`, opening its parent directory with ambient
    /// authority.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::InvalidPath`] when `path` has no file name
    /// and [`FavoritesError::Read`] when the parent directory cannot be opened.
    ///
    /// # Example
    ///
    /// ```
    /// use benefits_client::{Favorites, JsonFileFavorites};
    /// use camino::Utf8PathBuf;
    ///
    /// let temp = tempfile::tempdir().expect("temp dir");
    /// let path = Utf8PathBuf::from_path_buf(temp.path().join("favorites.json"))
    ///     .expect("utf-8 path");
    ///
    /// let store = JsonFileFavorites::open(&path).expect("open store");
    /// let mut favorites = Favorites::load(store).expect("load");
    /// favorites.add(4).expect("persist");
    ///
    /// let contents = std::fs::read_to_string(&path).expect("read back");
    /// assert!(contents.contains("\"favorites\""));
    /// ```
    pub fn open(path: &Utf8Path) -> Result<Self, FavoritesError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| FavoritesError::InvalidPath {
                path: path.to_path_buf(),
            })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
            FavoritesError::Read {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        Ok(Self {
            dir,
            file_name: file_name.to_owned(),
            display_path: path.to_path_buf(),
        })
    }

    /// Path used in error messages.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.display_path
    }
}

fn single_component(path: &Utf8Path) -> Result<&str, FavoritesError> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(name)), None) => Ok(name),
        _ => Err(FavoritesError::InvalidPath {
            path: path.to_path_buf(),
        }),
    }
}

impl FavoritesPersistence for JsonFileFavorites {
    fn load(&self) -> Result<BTreeSet<i64>, FavoritesError> {
        let contents = match self.dir.read_to_string(&self.file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.display_path, "no favorites file, starting empty");
                return Ok(BTreeSet::new());
            }
            Err(err) => {
                return Err(FavoritesError::Read {
                    path: self.display_path.clone(),
                    message: err.to_string(),
                });
            }
        };

        let document: FavoritesDocument =
            serde_json::from_str(&contents).map_err(|err| FavoritesError::Corrupt {
                path: self.display_path.clone(),
                message: err.to_string(),
            })?;
        if document.version != DOCUMENT_VERSION {
            return Err(FavoritesError::UnsupportedVersion {
                expected: DOCUMENT_VERSION,
                actual: document.version,
            });
        }
        Ok(document.favorites.into_iter().collect())
    }

    fn save(&self, ids: &BTreeSet<i64>) -> Result<(), FavoritesError> {
        let write_error = |message: String| FavoritesError::Write {
            path: self.display_path.clone(),
            message,
        };
        let document = FavoritesDocument {
            favorites: ids.iter().copied().collect(),
            version: DOCUMENT_VERSION,
        };
        let json = serde_json::to_vec(&document).map_err(|err| write_error(err.to_string()))?;
        replace_file(&self.dir, &self.file_name, &json)
            .map_err(|err| write_error(err.to_string()))?;
        debug!(path = %self.display_path, count = ids.len(), "favorites saved");
        Ok(())
    }
}
