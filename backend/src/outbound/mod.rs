//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **upstream**: reqwest gateway and repository for the third-party
//!   benefits catalogue
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business policy.

pub mod upstream;
