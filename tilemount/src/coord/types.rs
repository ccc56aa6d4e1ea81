//! Coordinate type definitions

use std::fmt;

/// One level of a parsed tile path.
///
/// Distinguishes a level the path never reached from a level that was
/// present but could not be read as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Segment<T> {
    /// The path ended before this level.
    #[default]
    Absent,
    /// The segment parsed as a non-negative integer.
    Valid(T),
    /// The segment exists but is not a number (raw text kept for logging).
    Invalid(String),
}

impl<T: Copy> Segment<T> {
    /// Returns the parsed value, if any.
    #[inline]
    pub fn value(&self) -> Option<T> {
        match self {
            Segment::Valid(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Segment::Absent)
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Segment::Invalid(_))
    }
}

/// A (possibly partial) tile address taken from a filesystem path.
///
/// `/2/1/3.png` yields zoom 2, column 1, row 3 with extension `png`;
/// `/2` yields only a zoom. Rows are in tree space, top-down.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TileCoordinate {
    /// Zoom level
    pub zoom: Segment<u8>,
    /// Column (X), 0 at west
    pub column: Segment<u32>,
    /// Row (Y) in tree space, 0 at north
    pub row: Segment<u32>,
    /// Text after the first `.` of the row segment
    pub extension: Option<String>,
}

impl TileCoordinate {
    /// Coordinate of the filesystem root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Coordinate of a fully specified tile file.
    pub fn tile(zoom: u8, column: u32, row: u32, extension: impl Into<String>) -> Self {
        Self {
            zoom: Segment::Valid(zoom),
            column: Segment::Valid(column),
            row: Segment::Valid(row),
            extension: Some(extension.into()),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Absent => write!(f, "-"),
            Segment::Valid(v) => write!(f, "{}", v),
            Segment::Invalid(raw) => write!(f, "!{:?}", raw),
        }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "z={} x={} y={}", self.zoom, self.column, self.row)?;
        if let Some(ext) = &self.extension {
            write!(f, " ext={}", ext)?;
        }
        Ok(())
    }
}
