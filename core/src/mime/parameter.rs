/*
 * parameter.rs
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

//! Physical header parameters (`name=value` as it appears on the wire) and the
//! tokenizer that splits a parameter list into them.

use super::utils::is_token;

/// One physical parameter: the key exactly as written (e.g. `filename*1*`) and its
/// raw value with any quoting removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Parameter {
    fn from((name, value): (K, V)) -> Self {
        Parameter::new(name, value)
    }
}

/// Parse semicolon-separated parameter list (name=value; name="value").
/// Folding whitespace (CRLF followed by space) between parameters is skipped.
/// Parameters with an invalid name or an unquoted non-token value are dropped.
pub fn parse_parameter_list(params_part: &str) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    let bytes = params_part.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len {
        while pos < len && (bytes[pos] == b';' || bytes[pos].is_ascii_whitespace()) {
            pos += 1;
        }
        if pos >= len {
            break;
        }
        let eq = match bytes[pos..].iter().position(|&b| b == b'=') {
            Some(i) => pos + i,
            None => break,
        };
        let name = params_part[pos..eq].trim();
        if !is_token(name) {
            match bytes[pos..].iter().position(|&b| b == b';') {
                Some(semi) => {
                    pos += semi + 1;
                    continue;
                }
                None => break,
            }
        }
        pos = eq + 1;
        while pos < len && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
            pos += 1;
        }
        let value = if pos < len && bytes[pos] == b'"' {
            pos += 1;
            let mut v = String::new();
            let mut chars = params_part[pos..].char_indices();
            let mut end = len;
            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            v.push(escaped);
                        }
                    }
                    '"' => {
                        end = pos + i + 1;
                        break;
                    }
                    _ => v.push(c),
                }
            }
            pos = end;
            v
        } else {
            let end = bytes[pos..]
                .iter()
                .position(|&b| b == b';')
                .map(|i| pos + i)
                .unwrap_or(len);
            let v = params_part[pos..end].trim();
            pos = end;
            if !is_token(v) {
                log::trace!("dropping parameter {:?} with non-token value {:?}", name, v);
                continue;
            }
            v.to_string()
        };
        parameters.push(Parameter::new(name, value));
    }
    parameters
}
