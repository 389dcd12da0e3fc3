use super::*;
use crate::byteorder::MAGIC_Z64;

/// A valid z64 image of `size` bytes filled with a non-zero pattern.
fn make_image(size: usize) -> CartridgeImage {
    let mut rom: Vec<u8> = (0..size).map(|i| ((i * 7 + 3) & 0xFF) as u8).collect();
    rom[0..4].copy_from_slice(&MAGIC_Z64);
    rom[0x20..0x34].copy_from_slice(b"SUPER MARIO 64      ");
    CartridgeImage::from_bytes(rom)
}

#[test]
fn test_identity_options_return_input() {
    let image = make_image(0x4000);
    let once = patch(&image, &PatchOptions::none()).unwrap();
    let twice = patch(&image, &PatchOptions::none()).unwrap();
    assert_eq!(once.bytes(), image.bytes());
    assert_eq!(twice.bytes(), image.bytes());
    assert!(once.touched().is_empty());
    assert!(PatchOptions::none().is_identity());
    assert!(!PatchOptions::default().is_identity());
}

#[test]
fn test_length_is_preserved() {
    for size in [4, 0x40, 0x1000, 0x1001, 0x8000, TONE_OFFSET + 50] {
        let image = make_image(size.max(0x34));
        let patched = patch(&image, &PatchOptions::default()).unwrap();
        assert_eq!(patched.len(), image.len(), "size {size:#X}");
    }
}

#[test]
fn test_input_is_not_mutated() {
    let image = make_image(0x8000);
    let before = image.bytes().to_vec();
    let _ = patch(&image, &PatchOptions::new().anomaly_count(500)).unwrap();
    assert_eq!(image.bytes(), before.as_slice());
}

#[test]
fn test_anomalies_stay_out_of_header() {
    let image = make_image(0x2000);
    let patched = patch(
        &image,
        &PatchOptions::none().anomaly_count(1000).seed(7),
    )
    .unwrap();

    assert!(!patched.touched().is_empty());
    assert!(patched.touched().len() <= 1000);
    assert!(patched.touched().iter().all(|&o| o >= MIN_SAFE_OFFSET && o < 0x2000));
    assert_eq!(&patched.bytes()[..MIN_SAFE_OFFSET], &image.bytes()[..MIN_SAFE_OFFSET]);
}

#[test]
fn test_anomalies_only_change_touched_offsets() {
    let image = make_image(0x3000);
    let patched = patch(&image, &PatchOptions::none().anomaly_count(25)).unwrap();
    for (offset, (a, b)) in image.bytes().iter().zip(patched.bytes()).enumerate() {
        if a != b {
            assert!(patched.touched().contains(&offset), "untracked change at {offset:#X}");
        }
    }
}

#[test]
fn test_seeded_patch_is_reproducible() {
    let image = make_image(0x10000);
    let options = PatchOptions::none().anomaly_count(32).seed(0xC0FFEE);
    let a = patch(&image, &options).unwrap();
    let b = patch(&image, &options).unwrap();
    assert_eq!(a.bytes(), b.bytes());
    assert_eq!(a.touched(), b.touched());
}

#[test]
fn test_anomalies_skipped_without_safe_region() {
    let image = make_image(MIN_SAFE_OFFSET);
    let patched = patch(&image, &PatchOptions::none().anomaly_count(10)).unwrap();
    assert_eq!(patched.bytes(), image.bytes());
    assert!(patched.touched().is_empty());
}

#[test]
fn test_single_byte_safe_region() {
    let image = make_image(MIN_SAFE_OFFSET + 1);
    let patched = patch(&image, &PatchOptions::none().anomaly_count(5).seed(1)).unwrap();
    assert_eq!(patched.touched(), &[MIN_SAFE_OFFSET]);
}

#[test]
fn test_touched_is_bounded_by_safe_region() {
    let image = make_image(MIN_SAFE_OFFSET + 16);
    let patched = patch(
        &image,
        &PatchOptions::none().anomaly_count(100_000).seed(5),
    )
    .unwrap();

    let touched = patched.touched();
    assert!(touched.len() <= 16);
    assert!(touched.windows(2).all(|w| w[0] < w[1]), "not distinct and sorted");
    assert!(touched.iter().all(|&o| o >= MIN_SAFE_OFFSET));
}

#[test]
fn test_timing_adjust_noop_on_small_image() {
    let image = make_image(0x8000);
    let patched = patch(&image, &PatchOptions::none().timing_adjust(true)).unwrap();
    assert_eq!(patched.bytes(), image.bytes());
    assert!(patched.touched().is_empty());
}

#[test]
fn test_tone_shift_halves_window() {
    let image = make_image(TONE_OFFSET + TONE_LEN + 16);
    let patched = patch(&image, &PatchOptions::none().tone_shift(true)).unwrap();

    for offset in TONE_OFFSET..TONE_OFFSET + TONE_LEN {
        assert_eq!(patched.bytes()[offset], image.bytes()[offset] / 2);
    }
    assert_eq!(&patched.bytes()[..TONE_OFFSET], &image.bytes()[..TONE_OFFSET]);
    assert_eq!(
        &patched.bytes()[TONE_OFFSET + TONE_LEN..],
        &image.bytes()[TONE_OFFSET + TONE_LEN..]
    );
    assert_eq!(patched.touched().len(), TONE_LEN);
}

#[test]
fn test_tone_shift_partial_window() {
    let image = make_image(TONE_OFFSET + 10);
    let patched = patch(&image, &PatchOptions::none().tone_shift(true)).unwrap();
    assert_eq!(patched.touched().len(), 10);
    assert_eq!(patched.len(), image.len());
}

#[test]
fn test_tone_shift_noop_before_window() {
    let image = make_image(0x8000);
    let patched = patch(&image, &PatchOptions::none().tone_shift(true)).unwrap();
    assert_eq!(patched.bytes(), image.bytes());
}

#[test]
fn test_patch_invalid_image_fails() {
    let image = CartridgeImage::from_bytes(vec![0u8; 0x2000]);
    let result = patch(&image, &PatchOptions::default());
    assert!(matches!(result, Err(CartridgeError::InvalidImage)));
}

#[test]
fn test_artifact_path_appends_suffix() {
    assert_eq!(
        artifact_path(Path::new("/roms/n64/game.z64")),
        PathBuf::from("/roms/n64/game.z64.personalized")
    );
    assert_eq!(
        artifact_path(Path::new("game")),
        PathBuf::from("game.personalized")
    );
}

#[test]
fn test_persist_writes_artifact_only() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("game.z64");
    let image = make_image(0x4000);
    std::fs::write(&original, image.bytes()).unwrap();

    let mut patched = patch(&image, &PatchOptions::none().anomaly_count(8).seed(3)).unwrap();
    let written = patched.persist(&original).unwrap().to_path_buf();

    assert_eq!(written, artifact_path(&original));
    assert_eq!(patched.path(), Some(written.as_path()));
    assert_eq!(std::fs::read(&written).unwrap(), patched.bytes());
    assert_eq!(std::fs::read(&original).unwrap(), image.bytes());

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_persist_failure_leaves_no_tmp_file() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("game.z64");
    let image = make_image(0x2000);
    std::fs::write(&original, image.bytes()).unwrap();

    // A non-empty directory where the artifact should go makes the rename fail
    let blocker = artifact_path(&original);
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), b"x").unwrap();

    let mut patched = patch(&image, &PatchOptions::none().anomaly_count(4).seed(2)).unwrap();
    assert!(matches!(patched.persist(&original), Err(CartridgeError::Io(_))));
    assert!(patched.path().is_none());

    let mut tmp = blocker.clone().into_os_string();
    tmp.push(".tmp");
    assert!(!PathBuf::from(tmp).exists());
    assert!(blocker.join("keep").exists());
}

#[test]
fn test_diff_count() {
    assert_eq!(diff_count(&[1, 2, 3], &[1, 2, 3]), 0);
    assert_eq!(diff_count(&[1, 2, 3], &[1, 0, 3]), 1);
    assert_eq!(diff_count(&[1, 2], &[1, 2, 3, 4]), 2);
}
