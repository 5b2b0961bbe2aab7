// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{union_placeholders, Catalog, PlaceholderMap, Selection};

/// Folds `contributions` onto `defaults`, deduplicating per key in first-seen order.
///
/// Every step produces a fresh map; neither input is mutated.
pub fn fold_pool<'a>(
    defaults: &PlaceholderMap,
    contributions: impl IntoIterator<Item = &'a PlaceholderMap>,
) -> PlaceholderMap {
    contributions
        .into_iter()
        .fold(union_placeholders(PlaceholderMap::new(), defaults), union_placeholders)
}

/// The placeholder pool seen after `selections`: catalog defaults plus each selection's
/// contribution, in selection order.
pub fn session_pool(catalog: &Catalog, selections: &[Selection]) -> PlaceholderMap {
    fold_pool(
        catalog.default_placeholder_transformation(),
        selections.iter().filter_map(Selection::placeholder_transformation),
    )
}

#[cfg(test)]
mod tests {
    use super::{fold_pool, session_pool};
    use crate::model::{Catalog, Fragment, PlaceholderMap, Selection};

    fn values(pairs: &[(&str, &[&str])]) -> PlaceholderMap {
        pairs
            .iter()
            .map(|(key, values)| {
                ((*key).to_owned(), values.iter().map(|value| (*value).to_owned()).collect())
            })
            .collect()
    }

    #[test]
    fn fold_starts_from_defaults_and_dedupes() {
        let defaults = values(&[("env", &["prod"])]);
        let first = values(&[("env", &["dev", "prod"]), ("svc", &["auth"])]);
        let second = values(&[("svc", &["auth", "billing"])]);

        let pool = fold_pool(&defaults, [&first, &second]);
        assert_eq!(pool, values(&[("env", &["prod", "dev"]), ("svc", &["auth", "billing"])]));
        assert_eq!(defaults, values(&[("env", &["prod"])]));
    }

    #[test]
    fn selections_without_contribution_are_skipped() {
        let catalog = Catalog::new(values(&[("env", &["prod"])]), Vec::new());
        let selections = vec![
            Selection::new(Fragment::new("plain")),
            Selection::new(
                Fragment::new("service=auth")
                    .with_placeholder_transformation(values(&[("svc", &["auth"])])),
            ),
        ];

        assert_eq!(
            session_pool(&catalog, &selections),
            values(&[("env", &["prod"]), ("svc", &["auth"])])
        );
        assert_eq!(session_pool(&catalog, &[]), values(&[("env", &["prod"])]));
    }
}
