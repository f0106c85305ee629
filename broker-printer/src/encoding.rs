//! Shift-JIS encoding utilities for SBPL label printers
//!
//! SATO-family label printers expect command streams in Shift-JIS.
//! ASCII bytes (including the ESC/STX/ETX control bytes the protocol is
//! built from) encode identically, so commands survive the conversion;
//! Japanese text becomes the two-byte sequences the firmware expects.

/// Convert a string to Shift-JIS bytes.
///
/// Characters with no Shift-JIS mapping are replaced with the encoder's
/// numeric character reference; the target hardware renders them as-is
/// rather than rejecting the job.
pub fn to_shift_jis(s: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(s);
    bytes.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(to_shift_jis("BOX1 *12345*"), b"BOX1 *12345*");
    }

    #[test]
    fn test_control_bytes_passthrough() {
        // STX, ESC, ETX survive unchanged
        assert_eq!(
            to_shift_jis("\u{02}\u{1b}A\u{1b}Z\u{03}"),
            b"\x02\x1bA\x1bZ\x03"
        );
    }

    #[test]
    fn test_kana_double_byte() {
        // ラベル = 3 katakana, 2 bytes each in Shift-JIS
        let bytes = to_shift_jis("ラベル");
        assert_eq!(bytes.len(), 6);
        assert_ne!(bytes, "ラベル".as_bytes());
    }
}
