use thiserror::Error;

/// Errors that can occur while loading or patching a cartridge image.
#[derive(Debug, Error)]
pub enum CartridgeError {
    /// I/O error while reading the image or writing the patched copy
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first four bytes are not a recognized N64 magic permutation
    #[error(
        "Invalid N64 ROM header: [{}] \
         (expected z64=[80,37,12,40], v64=[37,80,40,12], n64=[40,12,37,80])",
        format_magic(.magic)
    )]
    InvalidImageHeader { magic: [u8; 4] },

    /// A patch was requested for an image that failed header validation
    #[error("Cannot patch an invalid cartridge image")]
    InvalidImage,
}

impl CartridgeError {
    /// Build an `InvalidImageHeader` from whatever prefix of the magic is present.
    /// Missing bytes are reported as zero.
    pub fn invalid_header(bytes: &[u8]) -> Self {
        let mut magic = [0u8; 4];
        for (dst, src) in magic.iter_mut().zip(bytes) {
            *dst = *src;
        }
        Self::InvalidImageHeader { magic }
    }
}

fn format_magic(magic: &[u8; 4]) -> String {
    magic
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(", ")
}
