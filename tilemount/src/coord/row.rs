//! Row numbering conversion between the tile store and the exposed tree.
//!
//! MBTiles stores rows bottom-up (TMS); the tree exposes them top-down
//! (XYZ). At zoom `z` the two are related by `row' = 2^z - 1 - row`, which
//! is its own inverse.

/// Number of rows (and columns) in the grid at `zoom`.
///
/// Returns `None` when `2^zoom` does not fit in a `u64`.
#[inline]
pub fn grid_size(zoom: u8) -> Option<u64> {
    1u64.checked_shl(u32::from(zoom))
}

/// Flips a row between bottom-up and top-down numbering.
///
/// # Arguments
///
/// * `zoom` - Zoom level the row belongs to
/// * `row` - Row in either numbering
///
/// # Returns
///
/// The row in the other numbering, or `None` if `row` is outside
/// `0..2^zoom` or the flipped value does not fit in a `u32`.
#[inline]
pub fn flip_row(zoom: u8, row: u32) -> Option<u32> {
    let size = grid_size(zoom)?;
    let row = u64::from(row);
    if row >= size {
        return None;
    }
    u32::try_from(size - 1 - row).ok()
}

/// Converts a tree-space row into the row the store keys on.
#[inline]
pub fn to_storage_row(zoom: u8, tree_row: u32) -> Option<u32> {
    flip_row(zoom, tree_row)
}

/// Converts a store row into the row shown in the tree.
#[inline]
pub fn to_tree_row(zoom: u8, storage_row: u32) -> Option<u32> {
    flip_row(zoom, storage_row)
}
