//! Utility module: logging, input validation and request extractors

pub mod extract;
pub mod logger;
pub mod validation;

pub use extract::{ValidForm, ValidJson, ValidPath, ValidQuery};
