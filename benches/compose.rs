// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use kqool::compose::{available_options, expand};
use kqool::format::{decode_option, encode_option, option_records, render_records};
use kqool::model::{Catalog, Fragment, PlaceholderMap, Selection};

fn values(key: &str, count: usize) -> (String, Vec<String>) {
    (key.to_owned(), (0..count).map(|i| format!("{key}-{i}")).collect())
}

/// `fragments` two-marker fragments over a default pool with `width` values per key.
fn catalog(fragments: usize, width: usize) -> Catalog {
    let defaults: PlaceholderMap =
        [values("svc", width), values("env", width)].into_iter().collect();
    let fragments = (0..fragments)
        .map(|i| {
            Fragment::new(format!("f{i}: service={{{{svc}}}} env={{{{env}}}} other={{{{k{i}}}}}"))
        })
        .collect();
    Catalog::new(defaults, fragments)
}

fn selections(count: usize, width: usize) -> Vec<Selection> {
    (0..count)
        .map(|i| {
            let contribution: PlaceholderMap =
                [values(&format!("k{i}"), width)].into_iter().collect();
            Selection::new(
                Fragment::new(format!("picked {i}")).with_placeholder_transformation(contribution),
            )
        })
        .collect()
}

fn benches_compose(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("compose.expand");
        let pool: PlaceholderMap =
            [values("a", 8), values("b", 8), values("c", 4)].into_iter().collect();

        for (case_id, template) in [
            ("no_markers", "plain text without markers"),
            ("single", "key={{a}}"),
            ("product_256", "{{a}}/{{b}}/{{c}}"),
            ("unknown", "{{a}} and {{missing}}"),
        ] {
            group.bench_function(case_id, |b| {
                b.iter(|| black_box(expand(black_box(template), black_box(&pool)).len()))
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("compose.available_options");

        for (case_id, fragments, width, picked) in
            [("small", 8, 2, 1), ("medium", 64, 4, 4), ("wide", 32, 8, 16)]
        {
            let catalog = catalog(fragments, width);
            let selections = selections(picked, 2);
            group.throughput(Throughput::Elements(fragments as u64));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let options = available_options(black_box(&catalog), black_box(&selections));
                    black_box(options.len())
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("compose.records");
        let options = available_options(&catalog(64, 4), &selections(4, 2));
        group.throughput(Throughput::Elements(options.len() as u64));

        group.bench_function("render", |b| {
            b.iter(|| black_box(render_records(&option_records(black_box(&options))).len()))
        });

        let tokens: Vec<String> =
            options.iter().map(|entry| encode_option(entry.option())).collect();
        group.bench_function("decode", |b| {
            b.iter(|| {
                let mut acc = 0usize;
                for token in &tokens {
                    acc = acc.wrapping_add(decode_option(black_box(token)).is_ok() as usize);
                }
                black_box(acc)
            })
        });

        group.finish();
    }
}

criterion_group!(benches, benches_compose);
criterion_main!(benches);
