/*
 * parameter_map.rs
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

//! Insertion-ordered, case-insensitive map of logical header parameters.
//!
//! Merging physical parameters runs them through RFC 2231 reassembly, so
//! `filename*0*`, `filename*1` and `FILENAME` all address one entry named `filename`.

use std::collections::HashMap;

use super::parameter::{parse_parameter_list, Parameter};
use super::rfc2231::assemble::assemble_parameters;
use super::rfc2231::encode::{render_plain, ParameterEncoder};
use crate::config::ParameterConfig;

/// One logical parameter: display name, decoded value, and the physical segments it
/// was reassembled from (empty once the value has been assigned directly).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalParameter {
    name: String,
    value: String,
    segments: Vec<Parameter>,
}

impl LogicalParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            segments: Vec::new(),
        }
    }

    pub(crate) fn from_wire(name: impl Into<String>, value: impl Into<String>, segments: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            segments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Physical segments in continuation order, as received.
    pub fn segments(&self) -> &[Parameter] {
        &self.segments
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterMap {
    entries: Vec<LogicalParameter>,
    /// Lower-cased name to position in `entries`.
    index: HashMap<String, usize>,
    config: ParameterConfig,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParameterConfig) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            config,
        }
    }

    /// Parse a `; name=value; name*0*=...` list into a map.
    pub fn parse(params: &str) -> Self {
        Self::parse_with_config(params, ParameterConfig::default())
    }

    pub fn parse_with_config(params: &str, config: ParameterConfig) -> Self {
        let mut map = Self::with_config(config);
        map.merge(parse_parameter_list(params));
        map
    }

    pub fn config(&self) -> &ParameterConfig {
        &self.config
    }

    /// Value by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_parameter(name).map(LogicalParameter::value)
    }

    pub fn get_parameter(&self, name: &str) -> Option<&LogicalParameter> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_ascii_lowercase())
    }

    /// Assign a value. An existing entry (any case) keeps its position and display name;
    /// a new one is appended. The name is taken literally, without RFC 2231 suffix parsing;
    /// a name such as `title*` is encoded as `title**0=` so it reads back unchanged.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert_parameter(LogicalParameter::new(name, value));
    }

    /// Merge physical parameters (e.g. from a header tokenizer). Continuations and encoded
    /// values are reassembled among the merged pairs; each resulting logical parameter
    /// replaces any existing entry of the same name in place.
    pub fn merge<I, P>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Parameter>,
    {
        let pairs: Vec<Parameter> = pairs.into_iter().map(Into::into).collect();
        for parameter in assemble_parameters(&pairs, &self.config.default_charset) {
            self.insert_parameter(parameter);
        }
    }

    pub(crate) fn insert_parameter(&mut self, parameter: LogicalParameter) {
        let folded = parameter.name.to_ascii_lowercase();
        match self.index.get(&folded) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.value = parameter.value;
                entry.segments = parameter.segments;
            }
            None => {
                self.index.insert(folded, self.entries.len());
                self.entries.push(parameter);
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let i = self.index.remove(&name.to_ascii_lowercase())?;
        let removed = self.entries.remove(i);
        for pos in self.index.values_mut() {
            if *pos > i {
                *pos -= 1;
            }
        }
        Some(removed.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (name, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|p| (p.name(), p.value()))
    }

    pub fn parameters(&self) -> impl Iterator<Item = &LogicalParameter> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(LogicalParameter::name)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(LogicalParameter::value)
    }

    /// Wire form, folded and RFC 2231 encoded per the map's configuration.
    pub fn encoded(&self) -> String {
        ParameterEncoder::from_config(&self.config).encode(self)
    }

    /// Readable form of the decoded values: `name=value; name="quoted value"`.
    pub fn decoded(&self) -> String {
        self.entries
            .iter()
            .map(|p| format!("{}={}", p.name, render_plain(&p.value)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Maps are equal when they hold the same names (ignoring case) with the same values in
/// the same order. How a value arrived on the wire does not matter.
impl PartialEq for ParameterMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.entries.iter().zip(&other.entries).all(|(a, b)| {
                a.name.eq_ignore_ascii_case(&b.name) && a.value == b.value
            })
    }
}

impl Eq for ParameterMap {}

impl<P: Into<Parameter>> FromIterator<P> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        map.merge(iter);
        map
    }
}

impl<P: Into<Parameter>> Extend<P> for ParameterMap {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.merge(iter);
    }
}
