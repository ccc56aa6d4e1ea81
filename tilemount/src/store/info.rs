//! Pyramid metadata.

use std::collections::BTreeMap;
use std::fmt;

use crate::coord::is_valid_extension;

/// Encoding of the tiles in a store, from the MBTiles `format` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileFormat {
    Png,
    Jpg,
    Webp,
    Pbf,
    /// Any other declared format, lowercased
    Other(String),
}

impl TileFormat {
    /// Parses a `format` metadata value.
    ///
    /// # Example
    ///
    /// ```
    /// use tilemount::store::TileFormat;
    ///
    /// assert_eq!(TileFormat::parse("JPEG"), TileFormat::Jpg);
    /// assert_eq!(TileFormat::parse("png").extension(), "png");
    /// ```
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "png" => TileFormat::Png,
            "jpg" | "jpeg" => TileFormat::Jpg,
            "webp" => TileFormat::Webp,
            "pbf" | "mvt" => TileFormat::Pbf,
            _ => TileFormat::Other(value),
        }
    }

    /// File extension used for tile names, without the dot.
    pub fn extension(&self) -> &str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpg => "jpg",
            TileFormat::Webp => "webp",
            TileFormat::Pbf => "pbf",
            TileFormat::Other(ext) => ext.as_str(),
        }
    }
}

/// Metadata describing a tile pyramid.
///
/// Built from the MBTiles `metadata` table. Unknown keys are kept in
/// `extra`; `minzoom`/`maxzoom` fall back to the zoom range of the tiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileStoreInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub attribution: Option<String>,
    pub version: Option<String>,
    /// `overlay` or `baselayer`
    pub kind: Option<String>,
    pub format: Option<TileFormat>,
    /// west, south, east, north
    pub bounds: Option<[f64; 4]>,
    /// longitude, latitude, zoom
    pub center: Option<[f64; 3]>,
    pub minzoom: Option<u8>,
    pub maxzoom: Option<u8>,
    pub extra: BTreeMap<String, String>,
}

impl TileStoreInfo {
    /// Builds the info from raw `(name, value)` metadata rows.
    ///
    /// Values that fail to parse (a malformed `bounds`, a non-numeric
    /// `minzoom`) are left in `extra` rather than rejected.
    pub fn from_metadata<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut info = Self::default();
        for (key, value) in rows {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "name" => info.name = Some(value),
                "description" => info.description = Some(value),
                "attribution" => info.attribution = Some(value),
                "version" => info.version = Some(value),
                "type" => info.kind = Some(value),
                "format" => info.format = Some(TileFormat::parse(&value)),
                "bounds" => match parse_floats::<4>(&value) {
                    Some(b) => info.bounds = Some(b),
                    None => {
                        info.extra.insert(key, value);
                    }
                },
                "center" => match parse_floats::<3>(&value) {
                    Some(c) => info.center = Some(c),
                    None => {
                        info.extra.insert(key, value);
                    }
                },
                "minzoom" => match value.trim().parse() {
                    Ok(z) => info.minzoom = Some(z),
                    Err(_) => {
                        info.extra.insert(key, value);
                    }
                },
                "maxzoom" => match value.trim().parse() {
                    Ok(z) => info.maxzoom = Some(z),
                    Err(_) => {
                        info.extra.insert(key, value);
                    }
                },
                _ => {
                    info.extra.insert(key, value);
                }
            }
        }
        info
    }

    /// Extension implied by the declared format, if any.
    ///
    /// A declared format that cannot be a file name suffix, such as a MIME
    /// type like `image/png`, counts as undeclared.
    pub fn extension(&self) -> Option<&str> {
        self.format
            .as_ref()
            .map(TileFormat::extension)
            .filter(|ext| is_valid_extension(ext))
    }
}

impl fmt::Display for TileStoreInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or("(unnamed)"))?;
        if let Some(format) = &self.format {
            write!(f, " [{}]", format.extension())?;
        }
        match (self.minzoom, self.maxzoom) {
            (Some(min), Some(max)) => write!(f, " zoom {}-{}", min, max)?,
            (Some(min), None) => write!(f, " zoom {}-", min)?,
            (None, Some(max)) => write!(f, " zoom -{}", max)?,
            (None, None) => {}
        }
        if let Some([w, s, e, n]) = self.bounds {
            write!(f, " bounds {},{},{},{}", w, s, e, n)?;
        }
        Ok(())
    }
}

fn parse_floats<const N: usize>(value: &str) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = value.split(',');
    for slot in out.iter_mut() {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}
