use std::borrow::Cow;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::EpubError;

/// Escapes the five reserved markup characters
///
/// `&`, `<`, `>`, `"` and `'` are replaced with their predefined entities.
/// Every user-supplied string passes through here before it is embedded in a
/// generated document.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Splits a `data:<mime>;base64,<payload>` URL and decodes the payload
///
/// ## Parameters
/// - `name`: Display name of the image, used in error messages
/// - `url`: The data URL
///
/// ## Return
/// - `Ok((String, Vec<u8>))`: The mime type and the raw payload bytes
/// - `Err(EpubError)`: The URL lacks the base64 data prefix or the payload is not base64
pub fn decode_data_url(name: &str, url: &str) -> Result<(String, Vec<u8>), EpubError> {
    let malformed = || EpubError::MalformedDataUrl {
        name: name.to_string(),
    };

    let (header, payload) = url.split_once(',').ok_or_else(malformed)?;
    let mime = header
        .strip_prefix("data:")
        .and_then(|rest| rest.strip_suffix(";base64"))
        .ok_or_else(malformed)?;

    if mime.is_empty() {
        return Err(malformed());
    }

    let data = STANDARD.decode(payload.trim())?;
    Ok((mime.to_string(), data))
}

/// Returns the file extension for a mime type
///
/// The subtype is used as-is (`image/jpeg` gives `jpeg`); an empty string is
/// returned when the mime type has no subtype.
pub fn extension_from_mime(mime: &str) -> &str {
    mime.split_once('/').map(|(_, subtype)| subtype).unwrap_or_default()
}

/// Name of the content document for a package page, `page_NNNN.xhtml`
pub fn page_file_name(page_number: usize) -> String {
    format!("page_{:04}.xhtml", page_number)
}

/// Name of a content image for a package page, `image_NNNN.<ext>`
pub fn image_file_name(page_number: usize, extension: &str) -> String {
    format!("image_{:04}.{}", page_number, extension)
}

/// Suggests a file name for the finished package
///
/// Every character other than ASCII letters and digits, hiragana, katakana and
/// CJK ideographs is replaced with `_`.
pub fn suggested_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' => c,
            '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}' => c,
            _ => '_',
        })
        .collect();

    format!("{}.epub", stem)
}

/// Formats a timestamp for `dcterms:modified`
pub fn modified_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Formats a timestamp for `dc:date`
pub fn publication_date(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}
