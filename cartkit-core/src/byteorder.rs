//! The three storage orders N64 dumps come in.
//!
//! Every cartridge image starts with the reference word `0x80371240`. Dumping
//! tools stored it (and everything after it) as-is, with each 16-bit half
//! swapped, or with each 32-bit word reversed; the first four bytes on disk
//! tell the three apart. Each order is a fixed-width byte reversal, so a
//! single routine converts any of them back to cartridge order.

/// Byte order of an N64 cartridge image on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum N64Format {
    /// Cartridge order (`.z64`).
    Z64,
    /// 16-bit halves swapped (`.v64`).
    V64,
    /// 32-bit words reversed (`.n64`).
    N64,
}

impl N64Format {
    pub fn display_name(self) -> &'static str {
        match self {
            N64Format::Z64 => "z64 (big-endian)",
            N64Format::V64 => "v64 (byte-swapped)",
            N64Format::N64 => "n64 (little-endian)",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            N64Format::Z64 => "z64",
            N64Format::V64 => "v64",
            N64Format::N64 => "n64",
        }
    }

    /// How the reference word appears on disk in this order.
    pub fn magic(self) -> [u8; 4] {
        match self {
            N64Format::Z64 => MAGIC_Z64,
            N64Format::V64 => MAGIC_V64,
            N64Format::N64 => MAGIC_N64,
        }
    }

    /// Width of the unit whose bytes are reversed on disk. Cartridge order
    /// reverses nothing, which is a width of 1.
    pub fn word_size(self) -> usize {
        match self {
            N64Format::Z64 => 1,
            N64Format::V64 => 2,
            N64Format::N64 => 4,
        }
    }
}

pub const MAGIC_Z64: [u8; 4] = [0x80, 0x37, 0x12, 0x40];
pub const MAGIC_V64: [u8; 4] = [0x37, 0x80, 0x40, 0x12];
pub const MAGIC_N64: [u8; 4] = [0x40, 0x12, 0x37, 0x80];

/// Extensions the ROM browser lists, lowercase.
pub const ROM_EXTENSIONS: &[&str] = &["z64", "n64", "v64"];

/// Identify the byte order from the leading bytes of an image.
///
/// Anything shorter than four bytes, or not starting with one of the three
/// magic permutations, is `None`.
pub fn detect_n64_format(header: &[u8]) -> Option<N64Format> {
    let magic: [u8; 4] = header.get(..4)?.try_into().ok()?;
    [N64Format::Z64, N64Format::V64, N64Format::N64]
        .into_iter()
        .find(|format| format.magic() == magic)
}

/// Reorder `data` in place into cartridge order.
///
/// Only whole words are reordered. Bytes past the last whole word are left
/// in disk order; callers that need a consistent order should trim `data` to
/// a multiple of [`N64Format::word_size`] first.
pub fn normalize_to_big_endian(data: &mut [u8], format: N64Format) {
    let width = format.word_size();
    if width > 1 {
        data.chunks_exact_mut(width).for_each(<[u8]>::reverse);
    }
}

#[cfg(test)]
#[path = "tests/byteorder_tests.rs"]
mod tests;
