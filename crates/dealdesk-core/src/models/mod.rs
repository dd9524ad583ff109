//! Data models for the deal pipeline
//!
//! Client-side views of the backend's resources, organized by domain.
//! These mirror the JSON the API serves; fields the console never reads
//! are left out.

mod document;
mod folder;
mod lookup;
mod prospect;

pub use document::*;
pub use folder::*;
pub use lookup::*;
pub use prospect::*;
