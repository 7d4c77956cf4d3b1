/*
 * error.rs
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

//! Parameter errors.
//!
//! Decoding and encoding never fail: these errors surface only from configuration,
//! from the per-segment decoder (where the assembler recovers from them), and from
//! the C FFI argument checks.

use thiserror::Error;

/// Errors from configuration, percent decoding, or FFI calls.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// `%` not followed by two hex digits. Offset is the byte position of the `%`.
    #[error("invalid percent escape at offset {offset} in {value:?}")]
    InvalidEscape { value: String, offset: usize },
    /// Charset label not in the registry.
    #[error("unknown charset {0:?}")]
    UnknownCharset(String),
    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Null pointer, non-UTF-8 string, or similar from a C caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unknown parameter map handle {0}")]
    UnknownHandle(u64),
}

impl ParameterError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
