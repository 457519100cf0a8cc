use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Only the start of the document is searched for a `<meta>` charset.
const META_SNIFF_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode an exported HTML file into UTF-8 using: BOM -> meta charset -> strict UTF-8 -> chardetng fallback.
pub fn decode_html(bytes: &[u8]) -> Result<DecodedHtml, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(enc) = sniff_meta_charset(bytes).and_then(|l| Encoding::for_label(l.as_bytes())) {
        return decode_with(bytes, enc);
    }

    if std::str::from_utf8(bytes).is_ok() {
        return decode_with(bytes, UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

/// Finds `charset=...` in the document head, covering both `<meta charset>`
/// and the `http-equiv` content form.
fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let mut rest = head.as_str();
    while let Some(pos) = rest.find("<meta") {
        rest = &rest[pos + "<meta".len()..];
        let tag = rest.split('>').next().unwrap_or(rest);
        if let Some(idx) = tag.find("charset=") {
            let value = tag[idx + "charset=".len()..]
                .trim_start_matches(&['"', '\'', ' '][..])
                .split(|c: char| c == '"' || c == '\'' || c == ';' || c == '/' || c.is_whitespace())
                .next()
                .unwrap_or("");
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedHtml, DecodeError> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "decoding error".into(),
        });
    }
    Ok(DecodedHtml {
        html: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}
