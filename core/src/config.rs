/*
 * config.rs
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

//! Parameter map configuration: default charset for RFC 2231 values that do not
//! declare one, charset used when percent-encoding on output, and the folding width.
//! Loaded from JSON (all fields optional, missing fields take the defaults).

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::mime::Charset;

/// Charset assumed when an encoded value has an empty charset field (RFC 2231 section 4).
pub const DEFAULT_CHARSET: &str = "us-ascii";

/// Charset tagged on values the encoder has to percent-encode.
pub const DEFAULT_OUTPUT_CHARSET: &str = "utf-8";

/// RFC 5322 recommended line length.
pub const DEFAULT_LINE_WIDTH: usize = 78;

/// Narrowest width that still leaves room for `name*NN*=` plus one `%XX` triple.
pub const MIN_LINE_WIDTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterConfig {
    pub default_charset: String,
    pub output_charset: String,
    pub line_width: usize,
}

impl Default for ParameterConfig {
    fn default() -> Self {
        Self {
            default_charset: DEFAULT_CHARSET.to_string(),
            output_charset: DEFAULT_OUTPUT_CHARSET.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl ParameterConfig {
    /// Parse and validate a JSON object, e.g. `{"default_charset": "iso-8859-1", "line_width": 72}`.
    pub fn from_json(json: &str) -> Result<Self, ParameterError> {
        let config: ParameterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Both charsets must be known to the registry and the width must fit at least one
    /// encoded octet per continuation line.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for label in [&self.default_charset, &self.output_charset] {
            if Charset::from_label(label).is_none() {
                return Err(ParameterError::UnknownCharset(label.clone()));
            }
        }
        if self.line_width < MIN_LINE_WIDTH {
            return Err(ParameterError::InvalidConfig(format!(
                "line_width {} is below the minimum of {}",
                self.line_width, MIN_LINE_WIDTH
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ParameterError> {
        Ok(serde_json::to_string(self)?)
    }
}
