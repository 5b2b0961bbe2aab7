// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::model::PlaceholderMap;

static MARKER: OnceLock<Regex> = OnceLock::new();

fn marker_regex() -> &'static Regex {
    MARKER.get_or_init(|| {
        Regex::new(r"\{\{(.*?)\}\}").expect("hard-coded placeholder marker regex is valid")
    })
}

/// A `{{name}}` marker and the literal text between it and the previous marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Occurrence<'a> {
    literal: &'a str,
    name: &'a str,
}

/// Names of all placeholder markers in `template`, left to right, repeats included.
pub fn placeholder_names(template: &str) -> Vec<&str> {
    marker_regex()
        .captures_iter(template)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str())
        .collect()
}

/// Expands every `{{name}}` marker in `template` against `pool`.
///
/// Output is the cartesian product over marker occurrences, the first occurrence varying
/// slowest. A marker whose name has no (or no non-empty) entry in `pool` stays literal.
/// An empty template yields no expansions.
pub fn expand(template: &str, pool: &PlaceholderMap) -> Vec<String> {
    if template.is_empty() {
        return Vec::new();
    }

    let mut occurrences: SmallVec<[Occurrence<'_>; 4]> = SmallVec::new();
    let mut cursor = 0;
    let markers = marker_regex()
        .captures_iter(template)
        .filter_map(|captures| Some((captures.get(0)?, captures.get(1)?)));
    for (marker, name) in markers {
        occurrences
            .push(Occurrence { literal: &template[cursor..marker.start()], name: name.as_str() });
        cursor = marker.end();
    }

    if occurrences.is_empty() {
        return vec![template.to_owned()];
    }

    let mut combinations = vec![String::new()];
    for occurrence in &occurrences {
        let candidates = candidates_for(occurrence.name, pool);
        let literal = occurrence.literal;
        combinations = combinations
            .iter()
            .flat_map(|prefix| {
                candidates
                    .iter()
                    .map(move |candidate| [prefix.as_str(), literal, candidate.as_str()].concat())
            })
            .collect();
    }

    let tail = &template[cursor..];
    if !tail.is_empty() {
        for combination in &mut combinations {
            combination.push_str(tail);
        }
    }
    combinations
}

fn candidates_for<'a>(name: &str, pool: &'a PlaceholderMap) -> Cow<'a, [String]> {
    match pool.get(name) {
        Some(values) if !values.is_empty() => Cow::Borrowed(values.as_slice()),
        _ => Cow::Owned(vec![format!("{{{{{name}}}}}")]),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{expand, placeholder_names};
    use crate::model::PlaceholderMap;

    fn pool(pairs: &[(&str, &[&str])]) -> PlaceholderMap {
        pairs
            .iter()
            .map(|(key, values)| {
                ((*key).to_owned(), values.iter().map(|value| (*value).to_owned()).collect())
            })
            .collect()
    }

    #[rstest]
    #[case::no_markers("select *", vec![], &["select *"])]
    #[case::unknown_marker("where x = {{v}}", vec![], &["where x = {{v}}"])]
    #[case::empty_candidates("where x = {{v}}", vec![("v", vec![])], &["where x = {{v}}"])]
    #[case::single("env={{env}}", vec![("env", vec!["prod", "dev"])], &["env=prod", "env=dev"])]
    #[case::product(
        "{{a}}-{{b}}",
        vec![("a", vec!["1", "2"]), ("b", vec!["x", "y"])],
        &["1-x", "1-y", "2-x", "2-y"]
    )]
    #[case::repeated_key_is_independent(
        "{{a}}/{{a}}",
        vec![("a", vec!["1", "2"])],
        &["1/1", "1/2", "2/1", "2/2"]
    )]
    #[case::mixed_known_and_unknown(
        "{{svc}} in {{env}}",
        vec![("env", vec!["prod"])],
        &["{{svc}} in prod"]
    )]
    #[case::empty_name("a{{}}b", vec![("", vec!["-"])], &["a-b"])]
    fn expands(
        #[case] template: &str,
        #[case] values: Vec<(&str, Vec<&str>)>,
        #[case] expected: &[&str],
    ) {
        let pairs =
            values.iter().map(|(key, values)| (*key, values.as_slice())).collect::<Vec<_>>();
        assert_eq!(expand(template, &pool(&pairs)), expected);
    }

    #[test]
    fn empty_template_has_no_expansions() {
        assert!(expand("", &pool(&[("a", &["1"])])).is_empty());
    }

    #[test]
    fn substituted_values_are_not_re_expanded() {
        let values = pool(&[("a", &["{{b}}"]), ("b", &["nope"])]);
        assert_eq!(expand("{{a}}", &values), vec!["{{b}}"]);
    }

    #[test]
    fn marker_does_not_span_lines() {
        let template = "{{a\n}} and {{b}}";
        assert_eq!(expand(template, &pool(&[("b", &["x"])])), vec!["{{a\n}} and x"]);
    }

    #[test]
    fn names_in_occurrence_order() {
        assert_eq!(placeholder_names("{{b}} {{a}} {{b}}"), vec!["b", "a", "b"]);
    }
}
