/*
 * content_disposition.rs
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

//! Content-Disposition header (RFC 2183).

use std::fmt;

use super::parameter_map::ParameterMap;
use super::rfc2231::encode::PARAMETER_SEPARATOR;
use super::utils::is_token;
use crate::config::ParameterConfig;

#[derive(Debug, Clone)]
pub struct ContentDisposition {
    disposition_type: String,
    parameters: ParameterMap,
}

impl ContentDisposition {
    pub fn new(disposition_type: impl Into<String>, parameters: ParameterMap) -> Self {
        Self {
            disposition_type: disposition_type.into(),
            parameters,
        }
    }

    pub fn get_disposition_type(&self) -> &str {
        &self.disposition_type
    }

    pub fn is_disposition_type(&self, t: &str) -> bool {
        self.disposition_type.eq_ignore_ascii_case(t)
    }

    pub fn get_parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains(name)
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.set(name, value);
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    /// Decoded `filename` parameter, the usual reason to look at this header.
    pub fn get_filename(&self) -> Option<&str> {
        self.parameters.get("filename")
    }

    pub fn to_header_value(&self) -> String {
        if self.parameters.is_empty() {
            self.disposition_type.clone()
        } else {
            format!(
                "{}{}{}",
                self.disposition_type,
                PARAMETER_SEPARATOR,
                self.parameters.encoded()
            )
        }
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

pub fn parse_content_disposition(value: &str) -> Option<ContentDisposition> {
    parse_content_disposition_with_config(value, ParameterConfig::default())
}

pub fn parse_content_disposition_with_config(
    value: &str,
    config: ParameterConfig,
) -> Option<ContentDisposition> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let (disp_part, params_part) = match value.find(';') {
        Some(i) => (value[..i].trim(), &value[i + 1..]),
        None => (value, ""),
    };
    if !is_token(disp_part) {
        return None;
    }
    let parameters = ParameterMap::parse_with_config(params_part, config);
    Some(ContentDisposition::new(disp_part, parameters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_with_encoded_filename() {
        let cd = parse_content_disposition(
            "attachment; filename*=iso-8859-1'en'H%EBll%F3%20there.txt; size=42",
        )
        .unwrap();
        assert!(cd.is_disposition_type("ATTACHMENT"));
        assert_eq!(cd.get_filename(), Some("Hëlló there.txt"));
        assert_eq!(cd.get_parameter("SIZE"), Some("42"));
    }

    #[test]
    fn inline_without_parameters() {
        let cd = parse_content_disposition("inline").unwrap();
        assert_eq!(cd.get_disposition_type(), "inline");
        assert!(cd.parameters().is_empty());
        assert_eq!(cd.to_string(), "inline");
    }

    #[test]
    fn continuation_filename_round_trips() {
        let header = "attachment;\r\n filename*0*=utf-8''caf%C3%A9;\r\n filename*1=\" menu.pdf\"";
        let cd = parse_content_disposition(header).unwrap();
        assert_eq!(cd.get_filename(), Some("café menu.pdf"));
        assert_eq!(cd.to_header_value(), header);
    }

    #[test]
    fn rejects_bad_type() {
        assert!(parse_content_disposition("  ").is_none());
        assert!(parse_content_disposition("at tachment; a=b").is_none());
    }
}
