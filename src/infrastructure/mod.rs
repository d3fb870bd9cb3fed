//! Host-facing infrastructure: the page location and runtime data paths.

pub mod location;
pub mod paths;

pub use location::Location;
pub use paths::data_dir;
