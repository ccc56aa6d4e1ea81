//! Tile coordinates and their filesystem form.
//!
//! Provides the path codec that turns `/Z/X/Y.ext` paths into
//! [`TileCoordinate`] values (and back into directory entry names), plus
//! the row transform between the store's bottom-up rows and the top-down
//! rows shown in the mounted tree.

mod path;
mod row;
mod types;

pub use path::{column_entry_name, is_valid_extension, parse_path, tile_file_name, zoom_entry_name};
pub use row::{flip_row, grid_size, to_storage_row, to_tree_row};
pub use types::{Segment, TileCoordinate};

#[cfg(test)]
mod tests;
