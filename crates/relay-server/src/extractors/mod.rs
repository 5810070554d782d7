//! Custom Axum extractors

mod path;
mod validated;

pub use path::UuidPath;
pub use validated::ValidatedJson;
