/// Format a byte count as a human-readable size string (e.g., "4 KB", "2 MB").
///
/// Uses exact integer division — values that aren't clean multiples of KB/MB
/// are shown in bytes.
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 && bytes.is_multiple_of(1024 * 1024) {
        format!("{} MB", bytes / (1024 * 1024))
    } else if bytes >= 1024 && bytes.is_multiple_of(1024) {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Decode a fixed-width ASCII header field.
///
/// Bytes outside the 7-bit ASCII range are dropped rather than replaced, then
/// leading and trailing whitespace and NUL padding are trimmed. Never fails.
pub fn decode_ascii_lossy(buf: &[u8]) -> String {
    let s: String = buf
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect();
    s.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0')
        .to_string()
}

/// Format a slice as space-separated uppercase hex bytes (e.g., "80 37 12 40").
pub fn hex_bytes(buf: &[u8]) -> String {
    buf.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(4096), "4 KB");
        assert_eq!(format_bytes(1048576), "1 MB");
        assert_eq!(format_bytes(8388608), "8 MB");
        assert_eq!(format_bytes(1025), "1025 bytes");
    }

    #[test]
    fn test_decode_ascii_lossy() {
        assert_eq!(decode_ascii_lossy(b"SUPER MARIO 64      "), "SUPER MARIO 64");
        assert_eq!(decode_ascii_lossy(b"ZELDA\0\0\0\0"), "ZELDA");
        assert_eq!(decode_ascii_lossy(b"\xFFAB\x80C\xFF"), "ABC");
        assert_eq!(decode_ascii_lossy(b"  PADDED  "), "PADDED");
        assert_eq!(decode_ascii_lossy(b""), "");
        assert_eq!(decode_ascii_lossy(b"\xFF\xFF"), "");
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(hex_bytes(&[0x80, 0x37, 0x12, 0x40]), "80 37 12 40");
        assert_eq!(hex_bytes(&[]), "");
    }
}
