//! Tests for path parsing and row conversion

use super::*;

#[test]
fn test_parse_root() {
    let coord = parse_path("/");
    assert_eq!(coord, TileCoordinate::root());
}

#[test]
fn test_parse_empty_path_is_root() {
    assert_eq!(parse_path(""), TileCoordinate::root());
}

#[test]
fn test_parse_zoom_only() {
    let coord = parse_path("/7");
    assert_eq!(coord.zoom, Segment::Valid(7));
    assert!(coord.column.is_absent());
    assert!(coord.row.is_absent());
}

#[test]
fn test_parse_trailing_slash_ignored() {
    assert_eq!(parse_path("/7/"), parse_path("/7"));
    assert_eq!(parse_path("/7/3/"), parse_path("/7/3"));
}

#[test]
fn test_parse_column() {
    let coord = parse_path("/7/3");
    assert_eq!(coord.zoom, Segment::Valid(7));
    assert_eq!(coord.column, Segment::Valid(3));
    assert!(coord.row.is_absent());
    assert_eq!(coord.extension, None);
}

#[test]
fn test_parse_full_tile() {
    let coord = parse_path("/2/1/2.png");
    assert_eq!(coord, TileCoordinate::tile(2, 1, 2, "png"));
}

#[test]
fn test_parse_row_zero_is_valid() {
    let coord = parse_path("/0/0/0.png");
    assert_eq!(coord.row, Segment::Valid(0));
}

#[test]
fn test_parse_row_without_extension() {
    let coord = parse_path("/3/4/5");
    assert_eq!(coord.row, Segment::Valid(5));
    assert_eq!(coord.extension, None);
}

#[test]
fn test_parse_extension_cut_at_first_dot() {
    let coord = parse_path("/3/4/5.pbf.gz");
    assert_eq!(coord.row, Segment::Valid(5));
    assert_eq!(coord.extension.as_deref(), Some("pbf.gz"));
}

#[test]
fn test_parse_deeper_segments_ignored() {
    let coord = parse_path("/2/1/2.png/extra/more");
    assert_eq!(coord, TileCoordinate::tile(2, 1, 2, "png"));
}

#[test]
fn test_parse_non_numeric_zoom_is_invalid() {
    let coord = parse_path("/abc");
    assert_eq!(coord.zoom, Segment::Invalid("abc".to_string()));
}

#[test]
fn test_parse_non_numeric_column_is_invalid() {
    let coord = parse_path("/2/x1");
    assert_eq!(coord.zoom, Segment::Valid(2));
    assert!(coord.column.is_invalid());
}

#[test]
fn test_parse_non_numeric_row_is_invalid() {
    let coord = parse_path("/2/1/abc.png");
    assert!(coord.row.is_invalid());
    assert_eq!(coord.extension.as_deref(), Some("png"));
}

#[test]
fn test_parse_empty_row_prefix_is_invalid() {
    let coord = parse_path("/2/1/.png");
    assert!(coord.row.is_invalid());
}

#[test]
fn test_parse_signs_and_spaces_are_invalid() {
    assert!(parse_path("/-1").zoom.is_invalid());
    assert!(parse_path("/+1").zoom.is_invalid());
    assert!(parse_path("/ 1").zoom.is_invalid());
    assert!(parse_path("/1.5").zoom.is_invalid());
}

#[test]
fn test_parse_zoom_overflow_is_invalid() {
    // zoom is a u8
    assert!(parse_path("/256").zoom.is_invalid());
    assert_eq!(parse_path("/255").zoom, Segment::Valid(255));
}

#[test]
fn test_parse_column_overflow_is_invalid() {
    assert!(parse_path("/2/99999999999").column.is_invalid());
}

#[test]
fn test_parse_gap_marks_level_invalid() {
    let coord = parse_path("//3");
    assert_eq!(coord.zoom, Segment::Invalid(String::new()));

    let coord = parse_path("/2//3.png");
    assert_eq!(coord.column, Segment::Invalid(String::new()));
}

#[test]
fn test_row_name_round_trip() {
    for (zoom, column, row) in [(0u8, 0u32, 0u32), (2, 1, 2), (14, 8190, 5461), (20, 1, 1048575)] {
        let name = tile_file_name(row, "png");
        let path = format!("/{}/{}/{}", zoom, column, name);
        let coord = parse_path(&path);
        assert_eq!(coord.row, Segment::Valid(row), "path {}", path);
        assert_eq!(coord.row.value().map(|r| tile_file_name(r, "png")), Some(name));
    }
}

#[test]
fn test_tile_file_name_without_extension() {
    assert_eq!(tile_file_name(12, ""), "12");
    assert_eq!(tile_file_name(12, "jpg"), "12.jpg");
}

#[test]
fn test_zoom_entry_name() {
    assert_eq!(zoom_entry_name(0), "0");
    assert_eq!(zoom_entry_name(255), "255");
    assert_eq!(parse_path(&format!("/{}", zoom_entry_name(14))).zoom, Segment::Valid(14));
}

#[test]
fn test_valid_extensions() {
    assert!(is_valid_extension("png"));
    assert!(is_valid_extension("JPG"));
    assert!(is_valid_extension("mp4"));
    assert!(!is_valid_extension(""));
    assert!(!is_valid_extension("image/png"));
    assert!(!is_valid_extension("tar.gz"));
    assert!(!is_valid_extension("pn g"));
    assert!(!is_valid_extension("wébp"));
}

#[test]
fn test_column_entry_name() {
    assert_eq!(column_entry_name(0), "0");
    assert_eq!(column_entry_name(5), "5");
}

#[test]
fn test_coordinate_display() {
    let coord = parse_path("/2/x/3.png");
    assert_eq!(coord.to_string(), "z=2 x=!\"x\" y=3 ext=png");
}

#[test]
fn test_grid_size() {
    assert_eq!(grid_size(0), Some(1));
    assert_eq!(grid_size(2), Some(4));
    assert_eq!(grid_size(32), Some(1u64 << 32));
    assert_eq!(grid_size(63), Some(1u64 << 63));
    assert_eq!(grid_size(64), None);
}

#[test]
fn test_flip_row_examples() {
    assert_eq!(flip_row(0, 0), Some(0));
    assert_eq!(flip_row(2, 1), Some(2));
    assert_eq!(flip_row(2, 0), Some(3));
    assert_eq!(flip_row(2, 3), Some(0));
}

#[test]
fn test_flip_row_is_involution() {
    for zoom in 0u8..=12 {
        let size = grid_size(zoom).unwrap() as u32;
        for row in 0..size {
            let storage = to_storage_row(zoom, row).unwrap();
            assert_eq!(to_tree_row(zoom, storage), Some(row), "zoom {} row {}", zoom, row);
        }
    }
}

#[test]
fn test_flip_row_involution_at_high_zoom() {
    for zoom in [20u8, 28, 31, 32] {
        let last = (grid_size(zoom).unwrap() - 1).min(u64::from(u32::MAX)) as u32;
        for row in [0, 1, last / 2, last] {
            let flipped = flip_row(zoom, row).unwrap();
            assert_eq!(flip_row(zoom, flipped), Some(row));
        }
    }
}

#[test]
fn test_flip_row_out_of_range() {
    assert_eq!(flip_row(2, 4), None);
    assert_eq!(flip_row(0, 1), None);
}

#[test]
fn test_flip_row_result_too_wide() {
    // 2^40 - 1 - 0 does not fit a u32 row
    assert_eq!(flip_row(40, 0), None);
    assert_eq!(flip_row(64, 0), None);
}
