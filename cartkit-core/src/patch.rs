//! Cosmetic "personalization" patches.
//!
//! A patch never touches the source image: it copies the bytes, applies the
//! requested edits in a fixed order (anomalies, timing byte, tone shift) and
//! returns a [`PatchedImage`] of identical length. Persisting the result
//! writes `<original path>.personalized`; the caller owns deleting it.
//!
//! The offsets below are placeholders with no semantic effect on any game.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cartridge::CartridgeImage;
use crate::error::CartridgeError;

/// First offset anomalies may land on; everything below (header, boot code)
/// is left alone.
pub const MIN_SAFE_OFFSET: usize = 0x1000;
/// Offset of the timing byte.
pub const TIMING_OFFSET: usize = 0x8033_B17E;
/// Value written at [`TIMING_OFFSET`].
pub const TIMING_VALUE: u8 = 0x02;
/// Start of the tone-shift window.
pub const TONE_OFFSET: usize = 0x12_0000;
/// Width of the tone-shift window.
pub const TONE_LEN: usize = 100;
/// Number of anomalies when none is configured.
pub const DEFAULT_ANOMALY_COUNT: u32 = 10;
/// Suffix appended to the source path for the persisted copy.
pub const PATCHED_SUFFIX: &str = ".personalized";

/// Which edits to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
    /// Number of random single-byte overwrites past [`MIN_SAFE_OFFSET`].
    pub anomaly_count: u32,

    /// Write [`TIMING_VALUE`] at [`TIMING_OFFSET`] (no-op on smaller images).
    pub timing_adjust: bool,

    /// Halve every byte in the [`TONE_LEN`]-byte window at [`TONE_OFFSET`].
    pub tone_shift: bool,

    /// Seed for the anomaly generator. `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            anomaly_count: DEFAULT_ANOMALY_COUNT,
            timing_adjust: true,
            tone_shift: true,
            seed: None,
        }
    }
}

impl PatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity configuration: no anomalies, no timing byte, no tone shift.
    pub fn none() -> Self {
        Self {
            anomaly_count: 0,
            timing_adjust: false,
            tone_shift: false,
            seed: None,
        }
    }

    pub fn anomaly_count(mut self, count: u32) -> Self {
        self.anomaly_count = count;
        self
    }

    pub fn timing_adjust(mut self, enabled: bool) -> Self {
        self.timing_adjust = enabled;
        self
    }

    pub fn tone_shift(mut self, enabled: bool) -> Self {
        self.tone_shift = enabled;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// True if applying these options cannot change any byte.
    pub fn is_identity(&self) -> bool {
        self.anomaly_count == 0 && !self.timing_adjust && !self.tone_shift
    }
}

/// A patched copy of a cartridge image.
#[derive(Debug, Clone)]
pub struct PatchedImage {
    bytes: Vec<u8>,
    path: Option<PathBuf>,
    touched: Vec<usize>,
}

impl PatchedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Where the patched bytes were written, once persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Distinct offsets written, in ascending order. Never longer than the
    /// image, however many anomalies were requested.
    pub fn touched(&self) -> &[usize] {
        &self.touched
    }

    /// Write the patched bytes next to `original` as
    /// `<original>.personalized`, replacing any previous copy.
    ///
    /// The bytes go to a temporary sibling first and are renamed into place,
    /// so a failed write never leaves a partial artifact behind.
    pub fn persist(&mut self, original: &Path) -> Result<&Path, CartridgeError> {
        let target = artifact_path(original);
        let mut tmp = target.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Err(e) = fs::write(&tmp, &self.bytes) {
            discard_tmp(&tmp);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            discard_tmp(&tmp);
            return Err(e.into());
        }

        log::debug!(
            "Wrote {} patched bytes to {}",
            self.bytes.len(),
            target.display()
        );
        Ok(self.path.insert(target).as_path())
    }
}

fn discard_tmp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        log::debug!("Could not remove {}: {}", tmp.display(), e);
    }
}

/// Derived artifact path: the original path with [`PATCHED_SUFFIX`] appended.
pub fn artifact_path(original: &Path) -> PathBuf {
    let mut path: OsString = original.as_os_str().to_owned();
    path.push(PATCHED_SUFFIX);
    PathBuf::from(path)
}

/// Produce a patched copy of a valid image. The input is never modified.
pub fn patch(
    image: &CartridgeImage,
    options: &PatchOptions,
) -> Result<PatchedImage, CartridgeError> {
    if !image.is_valid() {
        return Err(CartridgeError::InvalidImage);
    }

    let mut bytes = image.bytes().to_vec();
    let mut touched = BTreeSet::new();
    let len = bytes.len();

    if options.anomaly_count > 0 {
        if len > MIN_SAFE_OFFSET {
            let mut rng = match options.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            for _ in 0..options.anomaly_count {
                let offset = rng.gen_range(MIN_SAFE_OFFSET..len);
                bytes[offset] = rng.gen_range(0..=u8::MAX);
                touched.insert(offset);
            }
        } else {
            log::debug!(
                "Image is {len} bytes, no room for anomalies past 0x{MIN_SAFE_OFFSET:X}; skipping"
            );
        }
    }

    if options.timing_adjust && len > TIMING_OFFSET + 1 {
        bytes[TIMING_OFFSET] = TIMING_VALUE;
        touched.insert(TIMING_OFFSET);
    }

    if options.tone_shift {
        let end = len.min(TONE_OFFSET + TONE_LEN);
        for offset in TONE_OFFSET..end {
            bytes[offset] /= 2;
            touched.insert(offset);
        }
    }

    log::debug!(
        "Patched image: {} offset(s) touched across {} bytes",
        touched.len(),
        len
    );

    Ok(PatchedImage {
        bytes,
        path: None,
        touched: touched.into_iter().collect(),
    })
}

/// Open, validate, patch and persist in one step.
pub fn patch_file(path: &Path, options: &PatchOptions) -> Result<PatchedImage, CartridgeError> {
    let image = CartridgeImage::open(path)?.require_valid()?;
    let mut patched = patch(&image, options)?;
    patched.persist(path)?;
    Ok(patched)
}

/// Count positions where two equal-length sequences differ.
/// Extra bytes in the longer sequence count as differences.
pub fn diff_count(a: &[u8], b: &[u8]) -> usize {
    let common = a.iter().zip(b).filter(|(x, y)| x != y).count();
    common + a.len().abs_diff(b.len())
}

#[cfg(test)]
#[path = "tests/patch_tests.rs"]
mod tests;
