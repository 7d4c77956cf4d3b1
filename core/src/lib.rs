/*
 * lib.rs
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

//! Mailparam core: case-insensitive, order-preserving maps of email header parameters
//! with RFC 2231 continuation reassembly, charset decoding and folded re-encoding.
//!
//! ```
//! use mailparam_core::mime::ParameterMap;
//!
//! let map: ParameterMap = [
//!     ("value*0*", "us-ascii'en'This%20is%20even%20more%20"),
//!     ("value*1*", "%2A%2A%2Afun%2A%2A%2A%20"),
//!     ("value*2", "isn't it"),
//! ]
//! .into_iter()
//! .collect();
//! assert_eq!(map.get("VALUE"), Some("This is even more ***fun*** isn't it"));
//! ```

pub mod config;
pub mod error;
pub mod mime;

pub use config::ParameterConfig;
pub use error::ParameterError;
pub use mime::{Parameter, ParameterMap};
