//! Best-effort file type detection.
//!
//! Callers go through [`extension_for`], which turns every failure into
//! [`UNKNOWN`].

use crate::error::ResolveError;

/// Extension used when the type cannot be determined.
pub const UNKNOWN: &str = "unknown";

/// How much of a text payload is inspected for markup.
const TEXT_SNIFF_LEN: usize = 512;

/// Minimum share of printable ASCII, in percent, for unmarked text.
const ASCII_TEXT_PERCENT: usize = 75;

/// Maps raw bytes to a short lowercase type name, without a leading dot.
pub trait ExtensionResolver {
    fn resolve(&self, content: &[u8]) -> Result<String, ResolveError>;
}

impl<R: ExtensionResolver + ?Sized> ExtensionResolver for Box<R> {
    fn resolve(&self, content: &[u8]) -> Result<String, ResolveError> { (**self).resolve(content) }
}

/// Extension for `content`, or [`UNKNOWN`] if the resolver fails.
pub fn extension_for<R: ExtensionResolver + ?Sized>(resolver: &R, content: &[u8]) -> String {
    match resolver.resolve(content) {
        Ok(ext) => ext,
        Err(e) => {
            tracing::warn!(error = %e, "type detection failed, using `{UNKNOWN}`");
            UNKNOWN.to_owned()
        }
    }
}

/// Stand-in for a missing detection capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl ExtensionResolver for Unavailable {
    fn resolve(&self, _content: &[u8]) -> Result<String, ResolveError> { Err(ResolveError::Unavailable) }
}

/// Magic-number detection for common web payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureResolver;

impl ExtensionResolver for SignatureResolver {
    fn resolve(&self, content: &[u8]) -> Result<String, ResolveError> {
        if content.is_empty() {
            return Err(ResolveError::Empty);
        }
        detect(content)
            .map(str::to_owned)
            .ok_or(ResolveError::Unrecognized)
    }
}

fn detect(data: &[u8]) -> Option<&'static str> {
    match data {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        [b'%', b'P', b'D', b'F', b'-', ..] => Some("pdf"),
        [0x50, 0x4B, 0x03, 0x04, ..] => Some("zip"),
        [0x1F, 0x8B, ..] => Some("gzip"),
        [0x00, 0x00, 0x01, 0x00, ..] => Some("ico"),
        [b'B', b'M', _, _, _, _, 0x00, 0x00, 0x00, 0x00, ..] => Some("bmp"),
        _ => detect_text(data),
    }
}

fn detect_text(data: &[u8]) -> Option<&'static str> {
    let text = std::str::from_utf8(data).ok()?;
    let body = text.strip_prefix('\u{feff}');
    let has_bom = body.is_some();
    let body = body.unwrap_or(text);
    let head: String = body
        .trim_start()
        .chars()
        .take(TEXT_SNIFF_LEN)
        .collect::<String>()
        .to_ascii_lowercase();

    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        Some("html")
    } else if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        Some("svg")
    } else if head.starts_with("<?xml") {
        Some("xml")
    } else if head.starts_with('{') || head.starts_with('[') {
        Some("json")
    } else if looks_like_text(body, has_bom) {
        Some("text")
    } else {
        None
    }
}

/// Valid UTF-8 alone says little about short payloads, so unmarked text
/// must also be mostly printable ASCII.
fn looks_like_text(text: &str, has_bom: bool) -> bool {
    if text.chars().any(|c| c.is_control() && !c.is_whitespace()) {
        return false;
    }
    if has_bom {
        return true;
    }
    let (total, ascii) = text.chars().fold((0usize, 0usize), |(total, ascii), c| {
        let printable = c.is_ascii_graphic() || c.is_ascii_whitespace();
        (total + 1, ascii + usize::from(printable))
    });
    total > 0 && ascii * 100 >= total * ASCII_TEXT_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sniff(data: &[u8]) -> Result<String, ResolveError> { SignatureResolver.resolve(data) }

    #[test]
    fn detect_png() {
        let header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
        assert_eq!(sniff(&header).unwrap(), "png");
    }

    #[test]
    fn detect_jpeg() {
        assert_eq!(sniff(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap(), "jpeg");
    }

    #[test]
    fn detect_gif() {
        assert_eq!(sniff(b"GIF89a\x01\x00").unwrap(), "gif");
        assert_eq!(sniff(b"GIF87a\x01\x00").unwrap(), "gif");
    }

    #[test]
    fn detect_webp() {
        assert_eq!(sniff(b"RIFF\x24\x00\x00\x00WEBPVP8 ").unwrap(), "webp");
    }

    #[test]
    fn detect_archives() {
        assert_eq!(sniff(&[0x50, 0x4B, 0x03, 0x04, 0x14]).unwrap(), "zip");
        assert_eq!(sniff(&[0x1F, 0x8B, 0x08, 0x00]).unwrap(), "gzip");
    }

    #[test]
    fn detect_pdf() {
        assert_eq!(sniff(b"%PDF-1.7\n").unwrap(), "pdf");
    }

    #[test]
    fn detect_markup() {
        assert_eq!(sniff(b"<!DOCTYPE html><html></html>").unwrap(), "html");
        assert_eq!(sniff(b"  <html lang=\"en\">").unwrap(), "html");
        assert_eq!(sniff(b"<?xml version=\"1.0\"?><svg/>").unwrap(), "svg");
        assert_eq!(sniff(b"<?xml version=\"1.0\"?><feed/>").unwrap(), "xml");
        assert_eq!(sniff(b"{\"a\": 1}").unwrap(), "json");
    }

    #[test]
    fn detect_plain_text() {
        assert_eq!(sniff(b"hello").unwrap(), "text");
        assert_eq!(sniff("caf\u{e9}\n".as_bytes()).unwrap(), "text");
        assert_eq!(sniff("\u{feff}\u{65e5}\u{672c}\u{8a9e}".as_bytes()).unwrap(), "text");
    }

    #[test]
    fn short_binary_that_decodes_as_utf8() {
        // 0xDE 0xAD is the two-byte encoding of U+07AD.
        assert_eq!(sniff(&[0xDE, 0xAD]), Err(ResolveError::Unrecognized));
        assert_eq!(sniff(&[0xC3, 0xA9, 0xDE, 0xAD, 0xCE, 0xBB]), Err(ResolveError::Unrecognized));
        assert_eq!(sniff(b"   "), Ok("text".to_owned()));
    }

    #[test]
    fn unrecognized_binary() {
        assert_eq!(sniff(&[0xDE, 0xAD, 0xBE, 0xEF]), Err(ResolveError::Unrecognized));
        assert_eq!(sniff(b"\x01\x02\x03"), Err(ResolveError::Unrecognized));
    }

    #[test]
    fn empty_is_an_error() {
        assert_eq!(sniff(b""), Err(ResolveError::Empty));
    }

    #[test]
    fn extension_for_falls_back() {
        assert_eq!(extension_for(&SignatureResolver, &[0xDE, 0xAD]), UNKNOWN);
        assert_eq!(extension_for(&Unavailable, b"%PDF-1.4"), UNKNOWN);
        assert_eq!(extension_for(&SignatureResolver, b"%PDF-1.4"), "pdf");
    }
}
