//! Library entry for playlisting exposing the reconciliation engine for integration tests.

pub mod config;
pub mod info;
pub mod locale;
pub mod store;
pub mod sync;
pub mod util;
pub mod words;
