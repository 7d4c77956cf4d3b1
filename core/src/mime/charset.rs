/*
 * charset.rs
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

//! Charsets understood in RFC 2231 values. Decoding turns declared octets into a Rust
//! string; encoding goes the other way for the encoder's output charset.

const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// windows-1252 code points for 0x80..=0x9F. Zero means the byte maps to the C1
/// control of the same value (WHATWG behaviour for the five unassigned slots).
const WINDOWS_1252_HIGH: [u16; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// iso-8859-15 positions that differ from iso-8859-1.
const LATIN9_OVERRIDES: [(u8, char); 8] = [
    (0xA4, '\u{20AC}'),
    (0xA6, '\u{0160}'),
    (0xA8, '\u{0161}'),
    (0xB4, '\u{017D}'),
    (0xB8, '\u{017E}'),
    (0xBC, '\u{0152}'),
    (0xBD, '\u{0153}'),
    (0xBE, '\u{0178}'),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    UsAscii,
    Latin1,
    Latin9,
    Windows1252,
}

impl Charset {
    /// Look up a charset label (case-insensitive, surrounding whitespace ignored).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        let charset = match label.as_str() {
            "utf-8" | "utf8" => Charset::Utf8,
            "us-ascii" | "ascii" | "us" | "ansi_x3.4-1968" => Charset::UsAscii,
            "iso-8859-1" | "iso_8859-1" | "iso8859-1" | "latin1" | "l1" => Charset::Latin1,
            "iso-8859-15" | "iso_8859-15" | "iso8859-15" | "latin9" | "l9" => Charset::Latin9,
            "windows-1252" | "cp1252" | "x-cp1252" => Charset::Windows1252,
            _ => return None,
        };
        Some(charset)
    }

    /// Preferred MIME name, as written in an RFC 2231 charset field.
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::UsAscii => "us-ascii",
            Charset::Latin1 => "iso-8859-1",
            Charset::Latin9 => "iso-8859-15",
            Charset::Windows1252 => "windows-1252",
        }
    }

    /// Bytes to text. Never fails: unmappable bytes become U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::UsAscii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { REPLACEMENT_CHAR })
                .collect(),
            Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Charset::Latin9 => bytes.iter().map(|&b| latin9_char(b)).collect(),
            Charset::Windows1252 => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
        }
    }

    /// Text to bytes, or None if some character has no representation in this charset.
    pub fn encode(self, s: &str) -> Option<Vec<u8>> {
        match self {
            Charset::Utf8 => Some(s.as_bytes().to_vec()),
            _ => s.chars().map(|c| self.encode_char(c)).collect(),
        }
    }

    fn encode_char(self, c: char) -> Option<u8> {
        if c.is_ascii() {
            return Some(c as u8);
        }
        match self {
            Charset::Utf8 | Charset::UsAscii => None,
            Charset::Latin1 => u8::try_from(c as u32).ok(),
            Charset::Latin9 => {
                if let Some(&(b, _)) = LATIN9_OVERRIDES.iter().find(|(_, ch)| *ch == c) {
                    return Some(b);
                }
                let b = u8::try_from(c as u32).ok()?;
                if LATIN9_OVERRIDES.iter().any(|&(o, _)| o == b) {
                    None
                } else {
                    Some(b)
                }
            }
            Charset::Windows1252 => (0x80u8..=0xFF).find(|&b| windows_1252_char(b) == c),
        }
    }
}

fn latin9_char(b: u8) -> char {
    LATIN9_OVERRIDES
        .iter()
        .find(|&&(o, _)| o == b)
        .map(|&(_, c)| c)
        .unwrap_or(b as char)
}

fn windows_1252_char(b: u8) -> char {
    if (0x80..=0x9F).contains(&b) {
        let cp = WINDOWS_1252_HIGH[(b - 0x80) as usize];
        if cp != 0 {
            return char::from_u32(cp as u32).unwrap_or(REPLACEMENT_CHAR);
        }
    }
    b as char
}

/// Convert declared-charset bytes to a string. Unknown charsets are read as UTF-8 with
/// replacement characters, which is also right for the many mailers that mislabel UTF-8.
pub fn charset_bytes_to_string(bytes: &[u8], charset: &str) -> String {
    match Charset::from_label(charset) {
        Some(c) => c.decode(bytes),
        None => {
            log::debug!("unknown charset {:?}, decoding as UTF-8", charset);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(Charset::from_label("UTF-8"), Some(Charset::Utf8));
        assert_eq!(Charset::from_label(" Latin1 "), Some(Charset::Latin1));
        assert_eq!(Charset::from_label("CP1252"), Some(Charset::Windows1252));
        assert_eq!(Charset::from_label("ebcdic"), None);
    }

    #[test]
    fn latin1_decode() {
        assert_eq!(Charset::Latin1.decode(b"H\xEBll\xF3"), "Hëlló");
    }

    #[test]
    fn ascii_high_bytes_replaced() {
        assert_eq!(Charset::UsAscii.decode(b"a\xE9b"), "a\u{FFFD}b");
    }

    #[test]
    fn latin9_euro() {
        assert_eq!(Charset::Latin9.decode(b"\xA4"), "€");
        assert_eq!(Charset::Latin9.encode("€5"), Some(vec![0xA4, b'5']));
        assert_eq!(Charset::Latin9.encode("\u{A4}"), None);
    }

    #[test]
    fn windows_1252_quotes() {
        assert_eq!(Charset::Windows1252.decode(b"\x93hi\x94"), "\u{201C}hi\u{201D}");
        assert_eq!(Charset::Windows1252.decode(b"\x81"), "\u{81}");
        assert_eq!(Charset::Windows1252.encode("\u{2122}"), Some(vec![0x99]));
    }

    #[test]
    fn encode_unrepresentable() {
        assert_eq!(Charset::UsAscii.encode("é"), None);
        assert_eq!(Charset::Latin1.encode("é"), Some(vec![0xE9]));
        assert_eq!(Charset::Latin1.encode("\u{263A}"), None);
    }

    #[test]
    fn unknown_charset_falls_back_to_utf8() {
        assert_eq!(charset_bytes_to_string("ça".as_bytes(), "x-unknown"), "ça");
        assert_eq!(charset_bytes_to_string(b"\xFF", "x-unknown"), "\u{FFFD}");
    }
}
