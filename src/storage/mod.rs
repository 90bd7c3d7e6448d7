//! Persistence
//!
//! A small generic repository over keyed collections, with one bundled
//! backend that keeps each collection as a versioned JSON document in a
//! named file slot.

mod json_file;
mod repository;

pub use json_file::{JsonFileRepository, RepositoryConfig};
pub use repository::{Entity, Repository, RepositoryError};
