//! pixops: YAML recipes of pixel transforms, run on a worker pool.
//!
//! The transforms themselves live in [`pixop_engine`]; this crate adds the
//! recipe format ([`models::Recipe`]), the batch runner
//! ([`services::BatchProcessor`]) and the `pixops` CLI.

pub mod error;
pub mod models;
pub mod services;

pub use error::{ProcessError, RecipeError};
pub use models::{ImageSummary, Recipe, Step};
pub use pixop_engine;
pub use services::BatchProcessor;
