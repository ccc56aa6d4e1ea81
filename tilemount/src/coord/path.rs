//! Path parsing and child-name synthesis for the `/Z/X/Y.ext` namespace.

use super::types::{Segment, TileCoordinate};
use std::str::FromStr;

/// Number of `/`-separated pieces considered, including the leading empty one.
const MAX_SEGMENTS: usize = 4;

/// Parses a filesystem path into a tile coordinate.
///
/// The path is split on `/` and only the first four pieces are looked at:
/// the empty piece before the root slash, then zoom, column and row.
/// Anything deeper is ignored. The row piece is cut at its first `.`;
/// the numeric prefix is the row and the rest is kept as the extension.
///
/// Empty pieces mark the end of the path, so `/2/` is the same as `/2`.
/// An empty piece followed by a non-empty one (`/2//3.png`) cannot be a
/// prefix of a tile address and marks that level invalid.
///
/// # Example
///
/// ```
/// use tilemount::coord::{parse_path, Segment};
///
/// let coord = parse_path("/2/1/3.png");
/// assert_eq!(coord.zoom, Segment::Valid(2));
/// assert_eq!(coord.column, Segment::Valid(1));
/// assert_eq!(coord.row, Segment::Valid(3));
/// assert_eq!(coord.extension.as_deref(), Some("png"));
/// ```
pub fn parse_path(path: &str) -> TileCoordinate {
    let pieces: Vec<&str> = path.split('/').take(MAX_SEGMENTS).skip(1).collect();
    let piece = |i: usize| pieces.get(i).copied().unwrap_or("");
    let truncated_at = |i: usize| pieces.iter().skip(i + 1).any(|p| !p.is_empty());

    let mut coord = TileCoordinate {
        zoom: level(piece(0), truncated_at(0)),
        ..TileCoordinate::default()
    };
    if piece(0).is_empty() && !truncated_at(0) {
        return coord;
    }

    coord.column = level(piece(1), truncated_at(1));
    if piece(1).is_empty() && !truncated_at(1) {
        return coord;
    }

    let (row, extension) = match piece(2).split_once('.') {
        Some((row, ext)) => (row, Some(ext.to_string())),
        None => (piece(2), None),
    };
    coord.row = if piece(2).is_empty() {
        Segment::Absent
    } else {
        number(row)
    };
    coord.extension = extension;
    coord
}

/// Name of the directory entry for a zoom level.
#[inline]
pub fn zoom_entry_name(zoom: u8) -> String {
    zoom.to_string()
}

/// Name of the directory entry for a column.
#[inline]
pub fn column_entry_name(column: u32) -> String {
    column.to_string()
}

/// Whether `ext` can follow the row number in a tile file name.
///
/// Only non-empty ASCII alphanumeric extensions qualify; anything else
/// could put a separator or a dot into a directory entry.
pub fn is_valid_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Name of the directory entry for a tile in tree-space row `row`.
///
/// # Arguments
///
/// * `row` - Tree-space row
/// * `extension` - Tile extension without the dot; empty means no suffix
#[inline]
pub fn tile_file_name(row: u32, extension: &str) -> String {
    if extension.is_empty() {
        row.to_string()
    } else {
        format!("{}.{}", row, extension)
    }
}

/// Interprets one directory-level piece.
fn level<T: FromStr>(raw: &str, followed_by_more: bool) -> Segment<T> {
    if raw.is_empty() {
        if followed_by_more {
            Segment::Invalid(String::new())
        } else {
            Segment::Absent
        }
    } else {
        number(raw)
    }
}

/// Plain decimal digits only; signs, spaces and overflow are invalid.
fn number<T: FromStr>(raw: &str) -> Segment<T> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Segment::Invalid(raw.to_string());
    }
    match raw.parse() {
        Ok(v) => Segment::Valid(v),
        Err(_) => Segment::Invalid(raw.to_string()),
    }
}
