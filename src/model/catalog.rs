// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::fragment::{deserialize_lenient_map, Fragment, PlaceholderMap};

/// Fragments plus baseline placeholder values, merged from one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default, deserialize_with = "deserialize_default_placeholders")]
    default_placeholder_transformation: PlaceholderMap,
    #[serde(default, deserialize_with = "deserialize_fragments")]
    fragments: Vec<Fragment>,
}

impl Catalog {
    pub fn new(
        default_placeholder_transformation: PlaceholderMap,
        fragments: Vec<Fragment>,
    ) -> Self {
        Self {
            default_placeholder_transformation: union_placeholders(
                PlaceholderMap::new(),
                &default_placeholder_transformation,
            ),
            fragments,
        }
    }

    pub fn default_placeholder_transformation(&self) -> &PlaceholderMap {
        &self.default_placeholder_transformation
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Appends `other`'s fragments and unions its default values into ours.
    pub fn merged_with(self, other: Catalog) -> Catalog {
        let Catalog { default_placeholder_transformation, mut fragments } = self;
        fragments.extend(other.fragments);
        Catalog {
            default_placeholder_transformation: union_placeholders(
                default_placeholder_transformation,
                &other.default_placeholder_transformation,
            ),
            fragments,
        }
    }
}

/// Folds catalogs left to right; fragments concatenate, default values union per key.
pub fn merge_catalogs(catalogs: impl IntoIterator<Item = Catalog>) -> Catalog {
    catalogs.into_iter().fold(Catalog::default(), Catalog::merged_with)
}

/// Ordered union per key: first occurrence keeps its position, later duplicates are dropped.
pub fn union_placeholders(
    mut base: PlaceholderMap,
    contribution: &PlaceholderMap,
) -> PlaceholderMap {
    for (key, values) in contribution {
        let entry = base.entry(key.clone()).or_default();
        for value in values {
            if !entry.contains(value) {
                entry.push(value.clone());
            }
        }
    }
    base
}

fn deserialize_default_placeholders<'de, D>(deserializer: D) -> Result<PlaceholderMap, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = deserialize_lenient_map(deserializer)?;
    Ok(union_placeholders(PlaceholderMap::new(), &raw))
}

fn deserialize_fragments<'de, D>(deserializer: D) -> Result<Vec<Fragment>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Fragment>>::deserialize(deserializer)?.unwrap_or_default())
}
