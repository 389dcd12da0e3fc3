use super::*;
use crate::byteorder::{MAGIC_N64, MAGIC_V64, MAGIC_Z64};

/// Build a z64 image of `size` bytes with the given title at 0x20.
fn make_z64(size: usize, title: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; size];
    rom[0..4].copy_from_slice(&MAGIC_Z64);
    let end = (TITLE_OFFSET + title.len()).min(size);
    rom[TITLE_OFFSET..end].copy_from_slice(&title[..end - TITLE_OFFSET]);
    rom
}

fn to_v64(z64: &[u8]) -> Vec<u8> {
    let mut v64 = z64.to_vec();
    for pair in v64.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
    v64
}

fn to_n64(z64: &[u8]) -> Vec<u8> {
    let mut n64 = z64.to_vec();
    for chunk in n64.chunks_exact_mut(4) {
        chunk.reverse();
    }
    n64
}

#[test]
fn test_validate_super_mario_64() {
    let rom = make_z64(0x1000, b"SUPER MARIO 64      ");
    let report = validate(&rom);
    assert!(report.is_valid());
    assert_eq!(report.format, Some(N64Format::Z64));
    assert_eq!(report.internal_title, "SUPER MARIO 64");
    assert!(report.is_known_title());
}

#[test]
fn test_validate_zero_magic_is_invalid() {
    let rom = vec![0u8; 0x1000];
    let report = validate(&rom);
    assert!(!report.is_valid());
    assert_eq!(report.internal_title, "");
    assert!(!report.is_known_title());
}

#[test]
fn test_validate_empty_and_short_input() {
    assert!(!validate(&[]).is_valid());
    assert!(!validate(&[0x80]).is_valid());
    assert!(!validate(&[0x80, 0x37, 0x12]).is_valid());
}

#[test]
fn test_validate_magic_only_is_valid_with_empty_title() {
    let report = validate(&MAGIC_Z64);
    assert!(report.is_valid());
    assert_eq!(report.internal_title, "");
}

#[test]
fn test_validate_truncated_title_is_partial() {
    // Only "SUPER" of the title window is present
    let rom = make_z64(TITLE_OFFSET + 5, b"SUPER MARIO 64");
    let report = validate(&rom);
    assert!(report.is_valid());
    assert_eq!(report.internal_title, "SUPER");
    assert!(!report.is_known_title());
}

#[test]
fn test_validate_every_magic_permutation() {
    for magic in [MAGIC_Z64, MAGIC_V64, MAGIC_N64] {
        let mut rom = vec![0u8; 64];
        rom[0..4].copy_from_slice(&magic);
        assert!(validate(&rom).is_valid(), "magic {magic:02X?} rejected");
    }
}

#[test]
fn test_validate_rejects_near_misses() {
    for magic in [
        [0x80, 0x37, 0x12, 0x41],
        [0x12, 0x40, 0x80, 0x37],
        [0x40, 0x12, 0x80, 0x37],
        [0xFF, 0xFF, 0xFF, 0xFF],
    ] {
        assert!(!validate(&magic).is_valid(), "magic {magic:02X?} accepted");
    }
}

#[test]
fn test_title_is_read_as_stored_for_swapped_formats() {
    let z64 = make_z64(0x40, b"SUPER MARIO 64      ");

    let v64 = validate(&to_v64(&z64));
    assert_eq!(v64.format, Some(N64Format::V64));
    assert_eq!(v64.internal_title, "USEP RAMIR O46");
    assert!(!v64.is_known_title());
    assert_eq!(v64.normalized_title, "SUPER MARIO 64");

    let n64 = validate(&to_n64(&z64));
    assert_eq!(n64.format, Some(N64Format::N64));
    assert_eq!(n64.internal_title, "EPUSAM R OIR  46");
    assert!(!n64.is_known_title());
    assert_eq!(n64.normalized_title, "SUPER MARIO 64");
}

#[test]
fn test_z64_titles_agree() {
    let report = validate(&make_z64(0x40, b"SUPER MARIO 64      "));
    assert_eq!(report.internal_title, report.normalized_title);
}

#[test]
fn test_truncated_n64_title_stays_in_one_order() {
    // Window cut mid-word: only whole words are reordered for display
    let z64 = make_z64(0x40, b"SUPER MARIO 64      ");
    let n64 = to_n64(&z64);
    let report = validate(&n64[..TITLE_OFFSET + 6]);
    assert_eq!(report.normalized_title, "SUPE");
    assert_eq!(report.internal_title, "EPUSAM");
}

#[test]
fn test_title_ignores_non_ascii_bytes() {
    let rom = make_z64(0x40, b"\xFFMARIO\x80 KART 64\0\0\0\0\0\0");
    assert_eq!(validate(&rom).internal_title, "MARIO KART 64");
}

#[test]
fn test_known_title_requires_exact_match() {
    let rom = make_z64(0x40, b"SUPER MARIO 64 DS   ");
    assert!(!validate(&rom).is_known_title());
}

#[test]
fn test_image_from_bytes_accessors() {
    let rom = make_z64(0x2000, b"SUPER MARIO 64");
    let image = CartridgeImage::from_bytes(rom.clone());
    assert_eq!(image.len(), 0x2000);
    assert_eq!(image.bytes(), rom.as_slice());
    assert_eq!(image.magic(), MAGIC_Z64);
    assert!(image.path().is_none());
    assert!(image.is_valid());
    assert!(image.is_known_title());
}

#[test]
fn test_require_valid_rejects_bad_header() {
    let image = CartridgeImage::from_bytes(vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00]);
    match image.require_valid() {
        Err(CartridgeError::InvalidImageHeader { magic }) => {
            assert_eq!(magic, [0xDE, 0xAD, 0xBE, 0xEF]);
        }
        other => panic!("expected InvalidImageHeader, got {other:?}"),
    }
}

#[test]
fn test_require_valid_pads_short_magic() {
    let image = CartridgeImage::from_bytes(vec![0x80, 0x37]);
    match image.require_valid() {
        Err(CartridgeError::InvalidImageHeader { magic }) => {
            assert_eq!(magic, [0x80, 0x37, 0x00, 0x00]);
        }
        other => panic!("expected InvalidImageHeader, got {other:?}"),
    }
}

#[test]
fn test_open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = CartridgeImage::open(dir.path().join("missing.z64"));
    assert!(matches!(result, Err(CartridgeError::Io(_))));
}

#[test]
fn test_open_records_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.z64");
    std::fs::write(&path, make_z64(0x100, b"SUPER MARIO 64")).unwrap();

    let image = CartridgeImage::open(&path).unwrap();
    assert_eq!(image.path(), Some(path.as_path()));
    assert_eq!(image.internal_title(), "SUPER MARIO 64");
}
