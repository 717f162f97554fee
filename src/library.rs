//! Track records and the catalog they are loaded from.
//!
//! The catalog stands in for the content backend: it is read once, sorted
//! once, and from then on the list order is canonical.

mod catalog;
mod lint;
mod model;

pub use catalog::{fetch_tracks, load_catalog, parse_catalog, CatalogFormat};
pub use lint::{lint_sources, SourceWarning};
pub use model::Track;

#[cfg(test)]
mod tests;
