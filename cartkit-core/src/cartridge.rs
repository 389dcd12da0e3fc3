//! Cartridge image loading and header validation.
//!
//! Validity is decided solely by the 4-byte magic at the start of the image.
//! The internal title is the 20-byte window at 0x20 exactly as stored, so a
//! byte-swapped dump of a recognized game is not itself recognized. The same
//! window in cartridge order is kept alongside it for display.

use std::fs;
use std::path::{Path, PathBuf};

use crate::byteorder::{N64Format, detect_n64_format, normalize_to_big_endian};
use crate::error::CartridgeError;
use crate::util::decode_ascii_lossy;

/// Offset of the internal title.
pub const TITLE_OFFSET: usize = 0x20;
/// Width of the internal title field.
pub const TITLE_LEN: usize = 20;
/// The one title the personalization patches are offered for.
pub const KNOWN_TITLE: &str = "SUPER MARIO 64";

/// Result of validating a byte sequence as a cartridge image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderReport {
    /// Detected byte order, or `None` when the magic is not recognized.
    pub format: Option<N64Format>,
    /// Title window decoded as stored on disk; empty for invalid images.
    pub internal_title: String,
    /// Title window decoded after reordering into cartridge order. Equal to
    /// `internal_title` for `.z64` images.
    pub normalized_title: String,
}

impl HeaderReport {
    pub fn is_valid(&self) -> bool {
        self.format.is_some()
    }

    pub fn is_known_title(&self) -> bool {
        self.internal_title == KNOWN_TITLE
    }
}

/// Validate a byte sequence of any length.
///
/// Never fails: short or unrecognized input is reported as invalid, and a
/// valid image too short to hold the full title window yields whatever
/// partial title is present.
pub fn validate(bytes: &[u8]) -> HeaderReport {
    let Some(format) = detect_n64_format(bytes) else {
        return HeaderReport::default();
    };

    let end = bytes.len().min(TITLE_OFFSET + TITLE_LEN);
    let internal_title = bytes
        .get(TITLE_OFFSET..end)
        .map(decode_ascii_lossy)
        .unwrap_or_default();

    // Both title bounds are word aligned, so trimming to whole words never
    // drops a byte of a complete window.
    let whole = end - end % format.word_size();
    let mut header = bytes[..whole].to_vec();
    normalize_to_big_endian(&mut header, format);
    let normalized_title = header
        .get(TITLE_OFFSET..)
        .map(decode_ascii_lossy)
        .unwrap_or_default();

    HeaderReport {
        format: Some(format),
        internal_title,
        normalized_title,
    }
}

/// A cartridge image held in memory.
///
/// The bytes are never modified after loading; patching produces a new
/// sequence (see [`crate::patch`]).
#[derive(Debug, Clone)]
pub struct CartridgeImage {
    bytes: Vec<u8>,
    path: Option<PathBuf>,
    header: HeaderReport,
}

impl CartridgeImage {
    /// Wrap an in-memory byte sequence.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let header = validate(&bytes);
        Self {
            bytes,
            path: None,
            header,
        }
    }

    /// Read an image from disk. Only I/O failures are errors; an
    /// unrecognized header still produces an (invalid) image.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CartridgeError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        log::debug!(
            "Read {} bytes from {}",
            bytes.len(),
            path.display()
        );
        let mut image = Self::from_bytes(bytes);
        image.path = Some(path.to_path_buf());
        Ok(image)
    }

    /// Accept the image only if its header is valid.
    pub fn require_valid(self) -> Result<Self, CartridgeError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(CartridgeError::invalid_header(&self.bytes))
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn header(&self) -> &HeaderReport {
        &self.header
    }

    pub fn format(&self) -> Option<N64Format> {
        self.header.format
    }

    pub fn internal_title(&self) -> &str {
        &self.header.internal_title
    }

    /// Title in cartridge order, for display.
    pub fn normalized_title(&self) -> &str {
        &self.header.normalized_title
    }

    pub fn is_valid(&self) -> bool {
        self.header.is_valid()
    }

    pub fn is_known_title(&self) -> bool {
        self.header.is_known_title()
    }

    /// The first four bytes as stored on disk (zero-filled if shorter).
    pub fn magic(&self) -> [u8; 4] {
        let mut magic = [0u8; 4];
        for (dst, src) in magic.iter_mut().zip(&self.bytes) {
            *dst = *src;
        }
        magic
    }
}

#[cfg(test)]
#[path = "tests/cartridge_tests.rs"]
mod tests;
