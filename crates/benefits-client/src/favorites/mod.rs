//! Persisted set of favourite benefit identifiers.
//!
//! [`Favorites`] owns the in-memory set and writes through to a
//! [`FavoritesPersistence`] backend after every change. A failed write leaves
//! the in-memory set untouched.

mod json_file;
mod memory;

use std::collections::BTreeSet;

use camino::Utf8PathBuf;
use thiserror::Error;

pub use json_file::JsonFileFavorites;
pub use memory::InMemoryFavorites;

/// Errors raised while loading or saving favourites.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FavoritesError {
    /// The favourites file path does not name a single file.
    #[error("favorites path must name a file: '{path}'")]
    InvalidPath {
        /// Offending path.
        path: Utf8PathBuf,
    },

    /// The favourites file exists but could not be read.
    #[error("failed to read favorites at '{path}': {message}")]
    Read {
        /// Path to the favourites file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The favourites document could not be written.
    #[error("failed to write favorites at '{path}': {message}")]
    Write {
        /// Path to the favourites file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The favourites document is not valid JSON of the expected shape.
    #[error("corrupt favorites document at '{path}': {message}")]
    Corrupt {
        /// Path to the favourites file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// The favourites document was written by an unknown format version.
    #[error("unsupported favorites version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Version this crate writes.
        expected: u32,
        /// Version found in the document.
        actual: u32,
    },
}

/// Storage backend for the favourites set.
pub trait FavoritesPersistence {
    /// Load the stored identifiers; a backend with nothing stored yields an
    /// empty set.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError`] when stored data exists but is unreadable.
    fn load(&self) -> Result<BTreeSet<i64>, FavoritesError>;

    /// Replace the stored identifiers with `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Write`] when the data cannot be stored.
    fn save(&self, ids: &BTreeSet<i64>) -> Result<(), FavoritesError>;
}

/// Favourite benefit identifiers backed by a persistence collaborator.
#[derive(Debug)]
pub struct Favorites<P> {
    persistence: P,
    ids: BTreeSet<i64>,
}

impl<P: FavoritesPersistence> Favorites<P> {
    /// Load the stored set through `persistence`.
    ///
    /// # Errors
    ///
    /// Propagates [`FavoritesPersistence::load`] failures.
    pub fn load(persistence: P) -> Result<Self, FavoritesError> {
        let ids = persistence.load()?;
        Ok(Self { persistence, ids })
    }

    /// Add `id`; returns `false` without writing when it was already present.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError`] when the updated set cannot be saved.
    pub fn add(&mut self, id: i64) -> Result<bool, FavoritesError> {
        if self.ids.contains(&id) {
            return Ok(false);
        }
        self.commit(|ids| {
            ids.insert(id);
        })?;
        Ok(true)
    }

    /// Remove `id`; returns `false` without writing when it was absent.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError`] when the updated set cannot be saved.
    pub fn remove(&mut self, id: i64) -> Result<bool, FavoritesError> {
        if !self.ids.contains(&id) {
            return Ok(false);
        }
        self.commit(|ids| {
            ids.remove(&id);
        })?;
        Ok(true)
    }

    /// Flip membership of `id` and return the new membership.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError`] when the updated set cannot be saved.
    pub fn toggle(&mut self, id: i64) -> Result<bool, FavoritesError> {
        if self.ids.contains(&id) {
            self.remove(id).map(|_| false)
        } else {
            self.add(id).map(|_| true)
        }
    }

    /// Whether `id` is a favourite.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Favourite identifiers in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }

    /// Number of favourites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no favourites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Borrow the persistence backend.
    #[must_use]
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    fn commit(&mut self, change: impl FnOnce(&mut BTreeSet<i64>)) -> Result<(), FavoritesError> {
        let mut next = self.ids.clone();
        change(&mut next);
        self.persistence.save(&next)?;
        self.ids = next;
        Ok(())
    }
}
