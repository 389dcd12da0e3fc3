//! Cartridge image validation and patching for Nintendo 64 ROMs.
//!
//! - [`cartridge`]: load an image, check its magic, read the internal title
//! - [`patch`]: produce a "personalized" copy without touching the source
//! - [`byteorder`]: the three N64 byte orders and how to normalize them

pub mod byteorder;
pub mod cartridge;
pub mod error;
pub mod patch;
pub mod util;

pub use byteorder::{N64Format, ROM_EXTENSIONS, detect_n64_format};
pub use cartridge::{CartridgeImage, HeaderReport, KNOWN_TITLE, validate};
pub use error::CartridgeError;
pub use patch::{PatchOptions, PatchedImage, artifact_path, patch, patch_file};
