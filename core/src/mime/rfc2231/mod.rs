/*
 * mod.rs
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

//! RFC 2231 parameter value and parameter continuations.
//!
//! `key` classifies physical keys, `value` decodes extended values, `assemble` turns
//! physical parameters into logical ones, and `encode` goes back to the wire.

pub mod assemble;
pub mod encode;
pub mod key;
pub mod value;

pub use assemble::assemble;
pub use encode::{encode, ParameterEncoder, PARAMETER_SEPARATOR};
pub use key::{classify, ParsedKey};
pub use value::{
    decode_octets, decode_value, percent_decode, undecoded_segment_tag, CharsetTag, SegmentKind,
};
