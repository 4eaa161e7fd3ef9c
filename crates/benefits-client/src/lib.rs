//! Client-side access to the benefits catalogue API.
//!
//! The crate is independent of the backend's domain types; it speaks the
//! public JSON contract only.
//!
//! # Overview
//!
//! - [`CatalogueClient`] issues `GET /api/beneficios` and
//!   `GET /api/beneficios/{id}` and decodes the error envelope.
//! - [`CatalogueQueries`] layers a per-key cache with a stale time and a
//!   bounded retry policy over any [`CatalogueSource`].
//! - [`Favorites`] keeps the set of favourite benefit identifiers and persists
//!   every change through a [`FavoritesPersistence`] backend such as
//!   [`JsonFileFavorites`].
//!
//! # Example
//!
//! ```
//! use benefits_client::{Favorites, InMemoryFavorites};
//!
//! let mut favorites = Favorites::load(InMemoryFavorites::default()).expect("load favorites");
//! assert!(favorites.toggle(7).expect("persist"));
//! assert_eq!(favorites.ids(), vec![7]);
//! ```

mod atomic_io;
mod client;
mod error;
mod favorites;
mod model;
mod queries;

pub use client::{CatalogueClient, CatalogueSource};
pub use error::ClientError;
pub use favorites::{
    Favorites, FavoritesError, FavoritesPersistence, InMemoryFavorites, JsonFileFavorites,
};
pub use model::Benefit;
pub use queries::{CatalogueQueries, DEFAULT_RETRIES, DEFAULT_STALE_TIME, QueryKey};
