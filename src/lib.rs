pub mod cli;
mod document;
mod errors;
mod geometry;
mod layers;
mod path;
mod types;

pub use document::{EventKind, InputEvent, InputList, OutputList, RawElement};
pub use errors::{Error, Result};
pub use geometry::{BoundingBox, BoundingBoxBuilder};
pub use layers::{
    extract_group, extract_str, group_labels, group_labels_str, split_file, split_to_strings,
    SplitConfig,
};
pub use path::{path_bbox, path_points};
