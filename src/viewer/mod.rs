//! STL upload viewer: an axum service that serves a single page, stores
//! uploaded STL files in temporary files, and hands a validated display
//! configuration to the in-browser renderer.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use config::{Material, ViewerConfig};
pub use error::ViewerError;
pub use routes::{AppState, router};
pub use store::{StoredMesh, UploadStore};
