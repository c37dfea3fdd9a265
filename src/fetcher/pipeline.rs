use crate::fetcher::types::{Charset, PageResponse};
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

// Sniff window for in-document charset declarations.
const SNIFF_BYTES: usize = 4096;

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: &[u8],
    content_type: &str,
) -> PageResponse {
    let charset = detect_charset(content_type, body_bytes);
    let body_utf8 = decode_to_utf8(body_bytes, &charset);

    PageResponse {
        url_final,
        status,
        body_utf8,
    }
}

fn charset_from_label(captures: Option<regex::Captures<'_>>) -> Option<Charset> {
    let label = captures?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // Header wins over anything declared in the document.
    if let Some(charset) = charset_from_label(CHARSET_REGEX.captures(content_type)) {
        return charset;
    }

    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_BYTES)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = charset_from_label(META_CHARSET_REGEX.captures(&search_str)) {
        return charset;
    }
    if let Some(charset) = charset_from_label(META_HTTP_EQUIV_REGEX.captures(&search_str)) {
        return charset;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    Charset::from_encoding(detector.guess(None, true))
}

/// Malformed sequences become U+FFFD; the rest of the page is still usable.
fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        warn!(
            encoding = encoding.name(),
            "body had malformed sequences, replaced"
        );
    }

    decoded.into_owned()
}
