use std::fs;
use std::path::Path;

use cartkit_core::byteorder::{MAGIC_V64, MAGIC_Z64};
use cartkit_core::{CartridgeError, CartridgeImage, PatchOptions, artifact_path, patch_file};
use tempfile::TempDir;

fn write_rom(dir: &Path, name: &str, magic: [u8; 4], size: usize) -> std::path::PathBuf {
    let mut rom = vec![0x55u8; size];
    rom[0..4].copy_from_slice(&magic);
    let path = dir.join(name);
    fs::write(&path, &rom).unwrap();
    path
}

#[test]
fn patch_file_writes_derived_copy() {
    let tmp = TempDir::new().unwrap();
    let rom = write_rom(tmp.path(), "game.z64", MAGIC_Z64, 0x10000);
    let original = fs::read(&rom).unwrap();

    let patched = patch_file(&rom, &PatchOptions::none().anomaly_count(16).seed(42)).unwrap();

    let artifact = artifact_path(&rom);
    assert_eq!(patched.path(), Some(artifact.as_path()));
    assert!(artifact.exists());
    assert_eq!(fs::read(&artifact).unwrap().len(), original.len());
    // Source is untouched
    assert_eq!(fs::read(&rom).unwrap(), original);

    // The artifact is itself a valid image
    let reloaded = CartridgeImage::open(&artifact).unwrap();
    assert!(reloaded.is_valid());
}

#[test]
fn patch_file_accepts_byte_swapped_images() {
    let tmp = TempDir::new().unwrap();
    let rom = write_rom(tmp.path(), "game.v64", MAGIC_V64, 0x2000);
    assert!(patch_file(&rom, &PatchOptions::default()).is_ok());
}

#[test]
fn patch_file_rejects_invalid_header_without_writing() {
    let tmp = TempDir::new().unwrap();
    let rom = write_rom(tmp.path(), "notes.z64", *b"TEXT", 0x2000);

    let result = patch_file(&rom, &PatchOptions::default());
    assert!(matches!(
        result,
        Err(CartridgeError::InvalidImageHeader { magic }) if &magic == b"TEXT"
    ));
    assert!(!artifact_path(&rom).exists());
}

#[test]
fn patch_file_missing_source_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let result = patch_file(&tmp.path().join("absent.z64"), &PatchOptions::default());
    assert!(matches!(result, Err(CartridgeError::Io(_))));
}
