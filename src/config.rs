//! Settings for the wall: where the catalog and media live, breakpoints,
//! audio and visualizer tuning, and logging.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;
