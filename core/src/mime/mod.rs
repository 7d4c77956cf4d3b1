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

//! MIME header parameters: RFC 2045 parameter lists, RFC 2231 continuations and
//! charset-tagged values, and the Content-Type / Content-Disposition headers built on them.

mod charset;
mod content_disposition;
mod content_type;
mod parameter;
mod parameter_map;
pub mod rfc2231;
mod utils;

pub use charset::{charset_bytes_to_string, Charset};
pub use content_disposition::{
    parse_content_disposition, parse_content_disposition_with_config, ContentDisposition,
};
pub use content_type::{parse_content_type, parse_content_type_with_config, ContentType};
pub use parameter::{parse_parameter_list, Parameter};
pub use parameter_map::{LogicalParameter, ParameterMap};
pub use utils::{is_attribute_char, is_quotable, is_token, is_token_char};
