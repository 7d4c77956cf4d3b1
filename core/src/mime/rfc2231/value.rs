/*
 * value.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Mailparam, RFC 2231 parameter handling for email headers.
 *
 * Mailparam is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Mailparam is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Mailparam.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Extended value decoding (RFC 2231 section 4): `charset'language'` prefix on the
//! first segment, `%XX` octets everywhere, then charset conversion.

use crate::error::ParameterError;
use crate::mime::charset::charset_bytes_to_string;

/// Charset and language declared by the first encoded segment of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetTag {
    pub charset: String,
    /// May be empty.
    pub language: String,
}

impl CharsetTag {
    pub fn new(charset: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            charset: charset.into(),
            language: language.into(),
        }
    }

    /// Split `charset'language'data`. Both quotes must be present; otherwise the whole
    /// value is data in `default_charset`. An empty charset field also means `default_charset`.
    pub fn split<'a>(raw: &'a str, default_charset: &str) -> (CharsetTag, &'a str) {
        let Some(q1) = raw.find('\'') else {
            return (CharsetTag::new(default_charset, ""), raw);
        };
        let Some(q2) = raw[q1 + 1..].find('\'').map(|i| q1 + 1 + i) else {
            return (CharsetTag::new(default_charset, ""), raw);
        };
        let charset = match raw[..q1].trim() {
            "" => default_charset,
            c => c,
        };
        (CharsetTag::new(charset, &raw[q1 + 1..q2]), &raw[q2 + 1..])
    }
}

/// How a segment's raw value is to be read.
#[derive(Debug, Clone, Copy)]
pub enum SegmentKind<'a> {
    /// Key without trailing `*`: the value is literal text.
    Plain,
    /// First encoded segment of the parameter: carries the charset prefix.
    First,
    /// Later encoded segment: percent-data in the charset the first segment declared.
    Continuation(&'a CharsetTag),
}

/// `%XX` to one octet, every other byte unchanged. Fails on `%` without two hex digits.
pub fn percent_decode(data: &str) -> Result<Vec<u8>, ParameterError> {
    let bytes = data.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b != b'%' {
            out.push(b);
            pos += 1;
            continue;
        }
        let hi = bytes.get(pos + 1).and_then(|&h| (h as char).to_digit(16));
        let lo = bytes.get(pos + 2).and_then(|&l| (l as char).to_digit(16));
        match (hi, lo) {
            (Some(hi), Some(lo)) => {
                out.push(((hi << 4) | lo) as u8);
                pos += 3;
            }
            _ => {
                return Err(ParameterError::InvalidEscape {
                    value: data.to_string(),
                    offset: pos,
                })
            }
        }
    }
    Ok(out)
}

/// Raw octets of one segment, plus the tag when this segment declared one.
pub fn decode_octets(
    raw: &str,
    kind: SegmentKind<'_>,
    default_charset: &str,
) -> Result<(Vec<u8>, Option<CharsetTag>), ParameterError> {
    match kind {
        SegmentKind::Plain => Ok((raw.as_bytes().to_vec(), None)),
        SegmentKind::First => {
            let (tag, data) = CharsetTag::split(raw, default_charset);
            Ok((percent_decode(data)?, Some(tag)))
        }
        SegmentKind::Continuation(_) => Ok((percent_decode(raw)?, None)),
    }
}

/// Tag declared by a segment that is kept as literal text because it failed to decode.
/// A first segment still resolves its prefix so later segments can use the charset.
pub fn undecoded_segment_tag(raw: &str, kind: SegmentKind<'_>, default_charset: &str) -> Option<CharsetTag> {
    match kind {
        SegmentKind::First => Some(CharsetTag::split(raw, default_charset).0),
        _ => None,
    }
}

/// Decode a single segment to text: the entry point for a value that stands alone
/// (`name*=...`). The assembler works on octets via [`decode_octets`] instead, so a
/// multi-byte character split across segments is converted in one piece.
/// A malformed escape leaves the segment as its literal raw text; the returned tag is
/// still resolved so later segments can use it.
pub fn decode_value(
    raw: &str,
    kind: SegmentKind<'_>,
    default_charset: &str,
) -> (String, Option<CharsetTag>) {
    match decode_octets(raw, kind, default_charset) {
        Ok((_, None)) if matches!(kind, SegmentKind::Plain) => (raw.to_string(), None),
        Ok((octets, tag)) => {
            let charset = match (&tag, kind) {
                (Some(t), _) => t.charset.as_str(),
                (None, SegmentKind::Continuation(t)) => t.charset.as_str(),
                (None, _) => default_charset,
            };
            (charset_bytes_to_string(&octets, charset), tag)
        }
        Err(e) => {
            log::debug!("keeping literal segment: {}", e);
            (raw.to_string(), undecoded_segment_tag(raw, kind, default_charset))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_full_prefix() {
        let (tag, data) = CharsetTag::split("us-ascii'en'This%20is", "utf-8");
        assert_eq!(tag, CharsetTag::new("us-ascii", "en"));
        assert_eq!(data, "This%20is");
    }

    #[test]
    fn split_blank_fields() {
        assert_eq!(
            CharsetTag::split("''Hello", "us-ascii"),
            (CharsetTag::new("us-ascii", ""), "Hello")
        );
        assert_eq!(
            CharsetTag::split("'en'Hello", "us-ascii"),
            (CharsetTag::new("us-ascii", "en"), "Hello")
        );
    }

    #[test]
    fn split_without_quotes_is_all_data() {
        assert_eq!(
            CharsetTag::split("Hello%20there", "us-ascii"),
            (CharsetTag::new("us-ascii", ""), "Hello%20there")
        );
        assert_eq!(
            CharsetTag::split("it's", "us-ascii"),
            (CharsetTag::new("us-ascii", ""), "it's")
        );
    }

    #[test]
    fn percent_decode_octets() {
        assert_eq!(percent_decode("a%20b%2a").unwrap(), b"a b*");
        assert_eq!(percent_decode("H%EBll").unwrap(), vec![b'H', 0xEB, b'l', b'l']);
    }

    #[test]
    fn percent_decode_rejects_bad_escape() {
        assert!(matches!(
            percent_decode("50%").unwrap_err(),
            ParameterError::InvalidEscape { offset: 2, .. }
        ));
        assert!(percent_decode("%zz").is_err());
    }

    #[test]
    fn decode_plain_is_unchanged() {
        assert_eq!(
            decode_value("isn't%20it", SegmentKind::Plain, "us-ascii"),
            ("isn't%20it".to_string(), None)
        );
    }

    #[test]
    fn decode_first_segment_latin1() {
        let (text, tag) =
            decode_value("iso-8859-1'en'H%EBll%F3%20there", SegmentKind::First, "us-ascii");
        assert_eq!(text, "Hëlló there");
        assert_eq!(tag, Some(CharsetTag::new("iso-8859-1", "en")));
    }

    #[test]
    fn decode_continuation_uses_given_tag() {
        let tag = CharsetTag::new("iso-8859-1", "");
        let (text, new_tag) = decode_value("%E9t%E9", SegmentKind::Continuation(&tag), "us-ascii");
        assert_eq!(text, "été");
        assert!(new_tag.is_none());
    }

    #[test]
    fn decode_bad_escape_keeps_literal() {
        let (text, tag) = decode_value("utf-8''100%", SegmentKind::First, "us-ascii");
        assert_eq!(text, "utf-8''100%");
        assert_eq!(tag, Some(CharsetTag::new("utf-8", "")));
    }

    #[test]
    fn decode_unknown_charset_is_best_effort() {
        let (text, _) = decode_value("x-martian''caf%C3%A9%FF", SegmentKind::First, "us-ascii");
        assert_eq!(text, "café\u{FFFD}");
    }
}
