/*
 * encode.rs
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

//! Serialization of a parameter map to wire format: `param *( ";" CRLF SP param )`.
//!
//! Values go out as a bare token, a quoted-string, or RFC 2231 percent-encoded
//! `name*N*=` segments, in that order of preference. Parameters that still carry the
//! segments they were decoded from are written back exactly as received.

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::key::classify;
use crate::config::{ParameterConfig, MIN_LINE_WIDTH};
use crate::mime::charset::Charset;
use crate::mime::parameter::Parameter;
use crate::mime::parameter_map::{LogicalParameter, ParameterMap};
use crate::mime::utils::{is_quotable, is_token, quote};

/// Separator between parameters: `;` then a folded line starting with one space.
pub const PARAMETER_SEPARATOR: &str = ";\r\n ";

/// Octets outside RFC 2231 attribute-char are written as `%XX`.
const ATTRIBUTE_CHAR_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'{')
    .remove(b'|')
    .remove(b'}')
    .remove(b'~');

#[derive(Debug, Clone, Copy)]
pub struct ParameterEncoder {
    line_width: usize,
    charset: Charset,
}

impl ParameterEncoder {
    /// Encoder folding at `line_width` (clamped to the configurable minimum), tagging
    /// percent-encoded values as UTF-8.
    pub fn new(line_width: usize) -> Self {
        Self {
            line_width: line_width.max(MIN_LINE_WIDTH),
            charset: Charset::Utf8,
        }
    }

    pub fn from_config(config: &ParameterConfig) -> Self {
        let charset = Charset::from_label(&config.output_charset).unwrap_or(Charset::Utf8);
        Self::new(config.line_width).with_charset(charset)
    }

    /// Charset to tag percent-encoded values with. Values it cannot represent fall back to UTF-8.
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn encode(&self, map: &ParameterMap) -> String {
        map.parameters()
            .flat_map(|p| self.encode_parameter(p))
            .collect::<Vec<_>>()
            .join(PARAMETER_SEPARATOR)
    }

    /// One logical parameter as one or more physical `key=value` strings.
    pub fn encode_parameter(&self, parameter: &LogicalParameter) -> Vec<String> {
        let segments = parameter.segments();
        if !segments.is_empty() && segments.iter().all(|s| is_quotable(s.get_value())) {
            return segments.iter().map(render_segment).collect();
        }
        let name = parameter.name();
        let value = parameter.value();
        if is_quotable(value) {
            // A name that itself ends in `*` or `*N` would be read back as a suffix;
            // an explicit `*0` keeps it whole.
            let single = if classify(name).name.len() == name.len() {
                format!("{}={}", name, render_plain(value))
            } else {
                format!("{}*0={}", name, render_plain(value))
            };
            if self.fits(single.len()) {
                return vec![single];
            }
            return self.fold_plain(name, value);
        }
        self.fold_encoded(name, value)
    }

    /// Does a parameter of `len` bytes fit on one folded line (leading space, trailing `;`)?
    fn fits(&self, len: usize) -> bool {
        len + 2 <= self.line_width
    }

    /// Split a printable value into `name*N=` continuations that each fit the line.
    fn fold_plain(&self, name: &str, value: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut chunk = String::new();
        // Worst case length of the chunk once quoted: two quotes plus escapes.
        let mut rendered = 2;
        for c in value.chars() {
            // name*N=
            let prefix = name.len() + 2 + digits(out.len());
            let extra = if c == '"' || c == '\\' { 2 } else { 1 };
            if !chunk.is_empty() && !self.fits(prefix + rendered + extra) {
                out.push(format!("{}*{}={}", name, out.len(), render_plain(&chunk)));
                chunk.clear();
                rendered = 2;
            }
            chunk.push(c);
            rendered += extra;
        }
        if !chunk.is_empty() || out.is_empty() {
            out.push(format!("{}*{}={}", name, out.len(), render_plain(&chunk)));
        }
        out
    }

    /// Percent-encode into `name*N*=` segments, the first tagged `charset''`.
    /// A `%XX` triple is never split across segments.
    fn fold_encoded(&self, name: &str, value: &str) -> Vec<String> {
        let (charset, octets) = match self.charset.encode(value) {
            Some(octets) => (self.charset, octets),
            None => {
                log::trace!(
                    "{:?} cannot represent parameter {:?}, tagging as utf-8",
                    self.charset.name(),
                    name
                );
                (Charset::Utf8, value.as_bytes().to_vec())
            }
        };
        let encoded = percent_encode(&octets, ATTRIBUTE_CHAR_ENCODE).to_string();
        let mut out = Vec::new();
        let mut chunk = format!("{}''", charset.name());
        let mut units = encoded.as_str();
        while !units.is_empty() {
            let unit_len = if units.starts_with('%') { 3 } else { 1 };
            // name*N*=
            let prefix = name.len() + 3 + digits(out.len());
            let fresh = out.is_empty() && chunk.len() == charset.name().len() + 2;
            if !chunk.is_empty() && !fresh && !self.fits(prefix + chunk.len() + unit_len) {
                out.push(format!("{}*{}*={}", name, out.len(), chunk));
                chunk.clear();
            }
            chunk.push_str(&units[..unit_len]);
            units = &units[unit_len..];
        }
        if !chunk.is_empty() {
            out.push(format!("{}*{}*={}", name, out.len(), chunk));
        }
        out
    }
}

impl Default for ParameterEncoder {
    fn default() -> Self {
        Self::from_config(&ParameterConfig::default())
    }
}

/// Encode a map with the default output charset, folding at `line_width`.
pub fn encode(map: &ParameterMap, line_width: usize) -> String {
    ParameterEncoder::new(line_width).encode(map)
}

/// Bare token unless the value needs quotes. Token values containing `'` are quoted too,
/// so they are never mistaken for a `charset'language'` prefix.
pub(crate) fn render_plain(value: &str) -> String {
    if is_token(value) && !value.contains('\'') {
        value.to_string()
    } else {
        quote(value)
    }
}

/// A segment kept from the wire. Encoded segment data is already percent-encoded and
/// goes out bare whenever it is a token, apostrophes included.
fn render_segment(segment: &Parameter) -> String {
    let key = segment.get_name();
    let value = segment.get_value();
    if classify(key).encoded {
        let rendered = if is_token(value) { value.to_string() } else { quote(value) };
        format!("{}={}", key, rendered)
    } else {
        format!("{}={}", key, render_plain(value))
    }
}

fn digits(n: usize) -> usize {
    n.to_string().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::utils::is_attribute_char;

    fn encode_one(name: &str, value: &str, width: usize) -> Vec<String> {
        ParameterEncoder::new(width).encode_parameter(&LogicalParameter::new(name, value))
    }

    #[test]
    fn token_goes_bare() {
        assert_eq!(encode_one("charset", "utf-8", 78), vec!["charset=utf-8"]);
    }

    #[test]
    fn spaces_and_specials_are_quoted() {
        assert_eq!(encode_one("name", "my file.txt", 78), vec![r#"name="my file.txt""#]);
        assert_eq!(encode_one("name", "a;b", 78), vec![r#"name="a;b""#]);
        assert_eq!(encode_one("name", r#"say "hi""#, 78), vec![r#"name="say \"hi\"""#]);
        assert_eq!(encode_one("name", "", 78), vec![r#"name="""#]);
    }

    #[test]
    fn apostrophe_token_prefers_quotes() {
        assert_eq!(encode_one("title", "isn't", 78), vec![r#"title="isn't""#]);
    }

    #[test]
    fn non_ascii_is_percent_encoded() {
        assert_eq!(
            encode_one("filename", "café.txt", 78),
            vec!["filename*0*=utf-8''caf%C3%A9.txt"]
        );
    }

    #[test]
    fn control_characters_are_percent_encoded() {
        assert_eq!(encode_one("x", "a\r\nb", 78), vec!["x*0*=utf-8''a%0D%0Ab"]);
    }

    #[test]
    fn output_charset_used_when_representable() {
        let enc = ParameterEncoder::new(78).with_charset(Charset::Latin1);
        assert_eq!(
            enc.encode_parameter(&LogicalParameter::new("f", "é")),
            vec!["f*0*=iso-8859-1''%E9"]
        );
        assert_eq!(
            enc.encode_parameter(&LogicalParameter::new("f", "\u{263A}")),
            vec!["f*0*=utf-8''%E2%98%BA"]
        );
    }

    #[test]
    fn long_encoded_value_folds_without_splitting_escapes() {
        let value = "é".repeat(20);
        let lines = encode_one("filename", &value, 30);
        assert!(lines.len() > 1);
        for (i, line) in lines.iter().enumerate() {
            assert!(line.len() <= 30, "{} too long", line);
            assert!(line.starts_with(&format!("filename*{}*=", i)));
            let data = line.split_once('=').unwrap().1;
            let data = if i == 0 { data.strip_prefix("utf-8''").unwrap() } else { data };
            assert!(data.len() % 3 == 0 && data.bytes().step_by(3).all(|b| b == b'%'));
        }
    }

    #[test]
    fn long_plain_value_folds_into_continuations() {
        let value = "word ".repeat(20);
        let lines = encode_one("title", value.trim_end(), 30);
        assert!(lines.len() > 1);
        for (i, line) in lines.iter().enumerate() {
            assert!(line.len() <= 30, "{} too long", line);
            assert!(line.starts_with(&format!("title*{}=", i)));
        }
    }

    #[test]
    fn attribute_chars_are_exactly_the_unescaped_bytes() {
        for b in 0u8..=0x7F {
            let encoded = percent_encode(&[b], ATTRIBUTE_CHAR_ENCODE).to_string();
            let kept = encoded.len() == 1;
            assert_eq!(kept, is_attribute_char(b), "byte {:#04x}", b);
        }
    }

    #[test]
    fn suffix_like_names_get_an_explicit_index() {
        assert_eq!(encode_one("title*", "x", 78), vec!["title**0=x"]);
        assert_eq!(encode_one("size*2", "a b", 78), vec![r#"size*2*0="a b""#]);
        assert_eq!(encode_one("n*", "é", 78), vec!["n**0*=utf-8''%C3%A9"]);
        assert_eq!(classify("title**0").name, "title*");
        assert_eq!(classify("n**0*").name, "n*");
    }

    #[test]
    fn wire_segments_written_back_verbatim() {
        let p = LogicalParameter::from_wire(
            "value",
            "ignored",
            vec![
                Parameter::new("value*0*", "us-ascii'en'This%20is"),
                Parameter::new("value*1", "isn't it"),
            ],
        );
        assert_eq!(
            ParameterEncoder::new(78).encode_parameter(&p),
            vec!["value*0*=us-ascii'en'This%20is", r#"value*1="isn't it""#]
        );
    }

    #[test]
    fn unsafe_wire_segments_are_re_encoded() {
        let p = LogicalParameter::from_wire("v", "a\nb", vec![Parameter::new("v*0", "a\nb")]);
        assert_eq!(ParameterEncoder::new(78).encode_parameter(&p), vec!["v*0*=utf-8''a%0Ab"]);
    }
}
