//! Classification of parsed paths into namespace nodes.
//!
//! Every filesystem handler resolves its path exactly once through
//! [`NamespaceResolver::resolve`] and then matches on the returned [`Node`].

use crate::coord::{parse_path, Segment, TileCoordinate};

/// What a path denotes in the mounted tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// `/`
    Root,
    /// `/{zoom}`
    ZoomDir { zoom: u8 },
    /// `/{zoom}/{column}`
    ColumnDir { zoom: u8, column: u32 },
    /// `/{zoom}/{column}/{row}.{ext}`, row in tree space
    TileFile { zoom: u8, column: u32, row: u32 },
    /// Anything else
    Invalid,
}

impl Node {
    /// True for the three directory kinds.
    pub fn is_dir(&self) -> bool {
        matches!(
            self,
            Node::Root | Node::ZoomDir { .. } | Node::ColumnDir { .. }
        )
    }
}

/// Classifies a coordinate.
///
/// A malformed segment at any depth makes the whole coordinate
/// [`Node::Invalid`]; a missing deeper segment makes it a directory.
/// Row 0 is an ordinary row. Coordinates that skip a level (a row without
/// a column, say) are invalid.
pub fn classify(coord: &TileCoordinate) -> Node {
    use Segment::{Absent, Valid};

    if coord.zoom.is_invalid() || coord.column.is_invalid() || coord.row.is_invalid() {
        return Node::Invalid;
    }

    match (&coord.zoom, &coord.column, &coord.row) {
        (Absent, Absent, Absent) => Node::Root,
        (Valid(zoom), Absent, Absent) => Node::ZoomDir { zoom: *zoom },
        (Valid(zoom), Valid(column), Absent) => Node::ColumnDir {
            zoom: *zoom,
            column: *column,
        },
        (Valid(zoom), Valid(column), Valid(row)) => Node::TileFile {
            zoom: *zoom,
            column: *column,
            row: *row,
        },
        _ => Node::Invalid,
    }
}

/// Resolves paths for one mounted store.
///
/// Holds the store's tile extension so that strict mode can refuse tile
/// names whose suffix differs from it. In the default lenient mode the
/// suffix is ignored and `/2/1/2.jpg` reaches the same tile as `/2/1/2.png`.
#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    extension: String,
    strict_extension: bool,
}

impl NamespaceResolver {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            strict_extension: false,
        }
    }

    /// Require tile names to carry the store's extension.
    pub fn with_strict_extension(mut self, strict: bool) -> Self {
        self.strict_extension = strict;
        self
    }

    /// Extension appended to tile names in listings.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn is_strict(&self) -> bool {
        self.strict_extension
    }

    /// Parses and classifies a path.
    pub fn resolve(&self, path: &str) -> Node {
        let coord = parse_path(path);
        let node = classify(&coord);

        if self.strict_extension && matches!(node, Node::TileFile { .. }) {
            let matches = match coord.extension.as_deref() {
                Some(ext) => ext.eq_ignore_ascii_case(&self.extension),
                None => self.extension.is_empty(),
            };
            if !matches {
                return Node::Invalid;
            }
        }

        node
    }
}
