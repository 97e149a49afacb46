use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1251};

use super::error::{AppError, Result};

/// Detection results below this confidence are ignored and the UTF-8 /
/// windows-1251 fallback chain is used instead.
const MIN_CONFIDENCE: f32 = 0.5;

/// Read a document with heuristically detected encoding.
///
/// Fallback order: detected encoding when confidence >= 0.5, else strict
/// UTF-8, else windows-1251. Documents are always written back as UTF-8
/// regardless of what they were read as.
pub fn read_file_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    decode_bytes(&bytes)
}

fn decode_bytes(bytes: &[u8]) -> Result<String> {
    let (charset, confidence, _) = chardet::detect(bytes);
    if confidence >= MIN_CONFIDENCE {
        let label = chardet::charset2encoding(&charset);
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let (text, _, had_errors) = encoding.decode(bytes);
            if !had_errors {
                return Ok(text.into_owned());
            }
        }
    }
    decode_utf8_or_legacy(bytes)
}

/// Strict UTF-8 first, then the legacy single-byte retry.
fn decode_utf8_or_legacy(bytes: &[u8]) -> Result<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }
    let (text, _, had_errors) = WINDOWS_1251.decode(bytes);
    if had_errors {
        return Err(AppError::Decode(
            "file is neither valid UTF-8 nor windows-1251".to_string(),
        ));
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_text_round_trips() {
        let text = "def greet():\n    return \"hello\"\n";
        assert_eq!(decode_bytes(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_utf8_multibyte() {
        let text = "# комментарий\nx = 'строка'\n";
        assert_eq!(decode_bytes(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_invalid_utf8_retried_as_windows_1251() {
        // "Привет" in windows-1251; invalid as UTF-8.
        let bytes = [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
        assert!(std::str::from_utf8(&bytes).is_err());
        assert_eq!(decode_utf8_or_legacy(&bytes).unwrap(), "Привет");
    }

    #[test]
    fn test_legacy_fallback_reports_undecodable_bytes() {
        // 0x98 is unassigned in windows-1251, and the lone 0xFF continuation
        // makes the input invalid UTF-8.
        let bytes = [0xFF, 0x98];
        assert!(matches!(
            decode_utf8_or_legacy(&bytes),
            Err(AppError::Decode(_))
        ));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = read_file_text(Path::new("/no/such/file.txt")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
