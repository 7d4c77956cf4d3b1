/*
 * assemble.rs
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

//! Reassembly of physical parameters into logical ones (RFC 2231 sections 3 and 4).
//!
//! Keys are grouped by case-folded logical name in first-seen order. Within a group,
//! segments are ordered by continuation index; duplicate indices stay in input order and
//! are all kept. Octets of adjacent encoded segments are joined before charset
//! conversion, so a multi-byte character split across `*0*` and `*1*` survives.

use std::collections::HashMap;

use super::key::{classify, ParsedKey};
use super::value::{decode_octets, undecoded_segment_tag, CharsetTag, SegmentKind};
use crate::config::ParameterConfig;
use crate::mime::charset::charset_bytes_to_string;
use crate::mime::parameter::Parameter;
use crate::mime::parameter_map::{LogicalParameter, ParameterMap};

struct Group<'a> {
    name: &'a str,
    segments: Vec<(ParsedKey<'a>, &'a Parameter)>,
}

impl Group<'_> {
    /// Any continuation index or `*` suffix: the group is RFC 2231 rather than a literal key.
    fn is_extended(&self) -> bool {
        self.segments
            .iter()
            .any(|(k, _)| k.index.is_some() || k.encoded)
    }
}

/// Build a map from physical parameters, using `default_charset` for encoded values
/// that leave the charset field empty.
pub fn assemble(pairs: &[Parameter], default_charset: &str) -> ParameterMap {
    let config = ParameterConfig {
        default_charset: default_charset.to_string(),
        ..ParameterConfig::default()
    };
    let mut map = ParameterMap::with_config(config);
    for parameter in assemble_parameters(pairs, default_charset) {
        map.insert_parameter(parameter);
    }
    map
}

/// Logical parameters in first-seen order of their names.
pub(crate) fn assemble_parameters(pairs: &[Parameter], default_charset: &str) -> Vec<LogicalParameter> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    for parameter in pairs {
        let key = classify(parameter.get_name());
        let i = *by_name.entry(key.folded_name()).or_insert_with(|| {
            groups.push(Group {
                name: key.name,
                segments: Vec::new(),
            });
            groups.len() - 1
        });
        groups[i].segments.push((key, parameter));
    }

    groups
        .into_iter()
        .map(|mut group| {
            group.segments.sort_by_key(|(k, _)| k.ordinal());
            if !group.is_extended() {
                // Literal key(s) only: duplicates concatenate like any other segment.
                let value: String = group.segments.iter().map(|(_, p)| p.get_value()).collect();
                return LogicalParameter::new(group.name, value);
            }
            // An RFC 2231 form wins over a plain `name=` sent alongside it for old readers.
            group.segments.retain(|(k, _)| k.index.is_some() || k.encoded);
            let value = decode_group(&group, default_charset);
            let segments = group.segments.iter().map(|&(_, p)| p.clone()).collect();
            LogicalParameter::from_wire(group.name, value, segments)
        })
        .collect()
}

fn decode_group(group: &Group<'_>, default_charset: &str) -> String {
    let mut value = String::new();
    let mut tag: Option<CharsetTag> = None;
    let mut pending: Vec<u8> = Vec::new();

    for (key, parameter) in &group.segments {
        let raw = parameter.get_value();
        if !key.encoded {
            flush_octets(&mut value, &mut pending, tag.as_ref(), default_charset);
            value.push_str(raw);
            continue;
        }
        // Only `*0*` or a bare `*` may declare a charset.
        if tag.is_none() && key.ordinal() != 0 {
            tag = Some(CharsetTag::new(default_charset, ""));
        }
        let kind = match &tag {
            None => SegmentKind::First,
            Some(t) => SegmentKind::Continuation(t),
        };
        match decode_octets(raw, kind, default_charset) {
            Ok((octets, declared)) => {
                if declared.is_some() {
                    tag = declared;
                }
                pending.extend_from_slice(&octets);
            }
            Err(e) => {
                log::debug!(
                    "parameter {:?}: keeping segment {:?} undecoded: {}",
                    group.name,
                    parameter.get_name(),
                    e
                );
                let declared = undecoded_segment_tag(raw, kind, default_charset);
                flush_octets(&mut value, &mut pending, tag.as_ref(), default_charset);
                value.push_str(raw);
                if declared.is_some() {
                    tag = declared;
                }
            }
        }
    }
    flush_octets(&mut value, &mut pending, tag.as_ref(), default_charset);
    value
}

fn flush_octets(out: &mut String, pending: &mut Vec<u8>, tag: Option<&CharsetTag>, default_charset: &str) {
    if pending.is_empty() {
        return;
    }
    let charset = tag.map(|t| t.charset.as_str()).unwrap_or(default_charset);
    out.push_str(&charset_bytes_to_string(pending, charset));
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<Parameter> {
        pairs.iter().map(|&(k, v)| Parameter::new(k, v)).collect()
    }

    fn values(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        assemble_parameters(&params(pairs), "us-ascii")
            .into_iter()
            .map(|p| (p.name().to_string(), p.value().to_string()))
            .collect()
    }

    #[test]
    fn literal_keys_pass_through() {
        assert_eq!(
            values(&[("value1", "one"), ("VALUE2", "two")]),
            vec![
                ("value1".to_string(), "one".to_string()),
                ("VALUE2".to_string(), "two".to_string()),
            ]
        );
    }

    #[test]
    fn out_of_order_continuations() {
        assert_eq!(
            values(&[("title*2", "c"), ("title*0", "a"), ("Title*1", "b")]),
            vec![("title".to_string(), "abc".to_string())]
        );
    }

    #[test]
    fn mixed_encoded_and_plain() {
        assert_eq!(
            values(&[
                ("value*0*", "us-ascii'en'This%20is%20even%20more%20"),
                ("value*1*", "%2A%2A%2Afun%2A%2A%2A%20"),
                ("value*2", "isn't it"),
            ]),
            vec![("value".to_string(), "This is even more ***fun*** isn't it".to_string())]
        );
    }

    #[test]
    fn utf8_sequence_split_across_segments() {
        assert_eq!(
            values(&[("name*0*", "utf-8''caf%C3"), ("name*1*", "%A9.txt")]),
            vec![("name".to_string(), "café.txt".to_string())]
        );
    }

    #[test]
    fn charset_from_first_segment_applies_to_later_ones() {
        assert_eq!(
            values(&[("f*1*", "%E9"), ("f*0*", "iso-8859-1''%E9t")]),
            vec![("f".to_string(), "été".to_string())]
        );
    }

    #[test]
    fn later_encoded_segment_does_not_declare_charset() {
        assert_eq!(
            values(&[("v*0", "a"), ("v*1*", "b'c'd")]),
            vec![("v".to_string(), "ab'c'd".to_string())]
        );
        assert_eq!(
            values(&[("v*0", "a"), ("v*1*", "iso-8859-1''%41")]),
            vec![("v".to_string(), "aiso-8859-1''A".to_string())]
        );
    }

    #[test]
    fn extended_form_takes_precedence_over_plain_name() {
        assert_eq!(
            values(&[
                ("filename", "resume.pdf"),
                ("filename*", "utf-8''r%C3%A9sum%C3%A9.pdf"),
            ]),
            vec![("filename".to_string(), "résumé.pdf".to_string())]
        );
        let out = assemble_parameters(
            &params(&[("Name*0", "a"), ("name", "fallback"), ("name*1", "b")]),
            "us-ascii",
        );
        assert_eq!(out[0].value(), "ab");
        assert_eq!(out[0].segments().len(), 2);
    }

    #[test]
    fn duplicate_indices_concatenate_in_input_order() {
        assert_eq!(
            values(&[("v*0", "a"), ("v*1", "x"), ("v*1", "y"), ("v*2", "z")]),
            vec![("v".to_string(), "axyz".to_string())]
        );
    }

    #[test]
    fn bad_segment_does_not_poison_the_rest() {
        assert_eq!(
            values(&[
                ("n*0*", "utf-8''a%20b"),
                ("n*1*", "50%"),
                ("n*2*", "%21"),
                ("other", "ok"),
            ]),
            vec![
                ("n".to_string(), "a b50%!".to_string()),
                ("other".to_string(), "ok".to_string()),
            ]
        );
    }

    #[test]
    fn first_seen_order_and_casing() {
        let got = values(&[("B", "1"), ("a*0", "x"), ("b", "2"), ("A*1", "y")]);
        assert_eq!(
            got,
            vec![
                ("B".to_string(), "12".to_string()),
                ("a".to_string(), "xy".to_string()),
            ]
        );
    }

    #[test]
    fn extended_groups_keep_wire_segments() {
        let out = assemble_parameters(&params(&[("t*1", "b"), ("t*0*", "''a")]), "us-ascii");
        let names: Vec<&str> = out[0].segments().iter().map(|p| p.get_name()).collect();
        assert_eq!(names, vec!["t*0*", "t*1"]);
        let literal = assemble_parameters(&params(&[("t", "a")]), "us-ascii");
        assert!(literal[0].segments().is_empty());
    }

    #[test]
    fn assemble_carries_default_charset() {
        let map = assemble(&params(&[("v*", "%E9")]), "iso-8859-1");
        assert_eq!(map.get("v"), Some("é"));
        assert_eq!(map.config().default_charset, "iso-8859-1");
    }
}
