//! Volatile favourites backend.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{FavoritesError, FavoritesPersistence};

#[derive(Debug, Default)]
struct Stored {
    ids: BTreeSet<i64>,
    saves: usize,
}

/// Favourites kept in memory for the life of the process.
///
/// Clones share the same storage, so one handle can observe what another
/// saved.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFavorites {
    stored: Arc<Mutex<Stored>>,
}

impl InMemoryFavorites {
    /// Start with `ids` already stored.
    #[must_use]
    pub fn with_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            stored: Arc::new(Mutex::new(Stored {
                ids: ids.into_iter().collect(),
                saves: 0,
            })),
        }
    }

    /// Snapshot of the stored identifiers.
    #[must_use]
    pub fn stored(&self) -> BTreeSet<i64> {
        self.lock().ids.clone()
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> MutexGuard<'_, Stored> {
        self.stored.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FavoritesPersistence for InMemoryFavorites {
    fn load(&self) -> Result<BTreeSet<i64>, FavoritesError> {
        Ok(self.stored())
    }

    fn save(&self, ids: &BTreeSet<i64>) -> Result<(), FavoritesError> {
        let mut stored = self.lock();
        stored.ids.clone_from(ids);
        stored.saves += 1;
        Ok(())
    }
}
