/*
 * key.rs
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

//! Physical key classification: `name*N*`, `name*N`, `name*` or a literal name.

/// A physical key split into its logical name and RFC 2231 suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedKey<'a> {
    /// Logical name, case preserved.
    pub name: &'a str,
    /// Continuation index from `*N`; None when the key has no index.
    pub index: Option<u32>,
    /// Key ends in `*`: value is percent-encoded (and charset-tagged on the first segment).
    pub encoded: bool,
}

impl ParsedKey<'_> {
    /// Ordering position within the logical parameter; an unindexed key is segment 0.
    pub fn ordinal(&self) -> u32 {
        self.index.unwrap_or(0)
    }

    /// Lower-cased name used for grouping and lookup.
    pub fn folded_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

/// Classify a physical key. Anything that is not a well-formed RFC 2231 suffix
/// (empty name, index too large, stray `*`) is a literal name.
pub fn classify(raw_key: &str) -> ParsedKey<'_> {
    let literal = ParsedKey {
        name: raw_key,
        index: None,
        encoded: false,
    };
    let (body, encoded) = match raw_key.strip_suffix('*') {
        Some(b) => (b, true),
        None => (raw_key, false),
    };
    if let Some(star) = body.rfind('*') {
        let digits = &body[star + 1..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let name = &body[..star];
            return match digits.parse::<u32>() {
                Ok(index) if !name.is_empty() => ParsedKey {
                    name,
                    index: Some(index),
                    encoded,
                },
                _ => literal,
            };
        }
    }
    if encoded && !body.is_empty() && !body.contains('*') {
        return ParsedKey {
            name: body,
            index: None,
            encoded: true,
        };
    }
    literal
}
