// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Placeholder name -> ordered candidate values.
pub type PlaceholderMap = BTreeMap<String, Vec<String>>;

/// A reusable query building block.
///
/// `query` is an opaque template that may contain `{{name}}` markers. Fields other than
/// `query` and `placeholderTransformation` are carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_map_opt"
    )]
    placeholder_transformation: Option<PlaceholderMap>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Fragment {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: Some(query.into()), ..Self::default() }
    }

    pub fn with_placeholder_transformation(mut self, transformation: PlaceholderMap) -> Self {
        self.placeholder_transformation = Some(transformation);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Values this fragment adds to the placeholder pool once selected.
    pub fn placeholder_transformation(&self) -> Option<&PlaceholderMap> {
        self.placeholder_transformation.as_ref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Copy of this fragment with its template replaced by one concrete expansion.
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            placeholder_transformation: self.placeholder_transformation.clone(),
            extra: self.extra.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientScalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl LenientScalar {
    fn into_string(self) -> String {
        match self {
            Self::Str(value) => value,
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientValues {
    One(LenientScalar),
    Many(Vec<LenientScalar>),
}

impl LenientValues {
    fn into_strings(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value.into_string()],
            Self::Many(values) => values.into_iter().map(LenientScalar::into_string).collect(),
        }
    }
}

/// Accepts a scalar or a list of scalars per key and normalises everything to strings.
pub(crate) fn deserialize_lenient_map<'de, D>(deserializer: D) -> Result<PlaceholderMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<LenientValues>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, values)| (key, values.map(LenientValues::into_strings).unwrap_or_default()))
        .collect())
}

fn deserialize_lenient_map_opt<'de, D>(deserializer: D) -> Result<Option<PlaceholderMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<LenientValues>>>::deserialize(deserializer)?;
    Ok(raw.map(|map| {
        map.into_iter()
            .map(|(key, values)| {
                (key, values.map(LenientValues::into_strings).unwrap_or_default())
            })
            .collect()
    }))
}
