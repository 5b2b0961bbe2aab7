// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::time::Duration;

use tracing::{debug, warn};

use super::{ConfigError, ConfigSource, DocumentFormat};
use crate::model::Catalog;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Parses one catalog document.
pub fn parse_catalog(
    raw: &str,
    format: DocumentFormat,
    source_ref: &ConfigSource,
) -> Result<Catalog, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(Catalog::default());
    }

    match format {
        DocumentFormat::Json => serde_json::from_str(raw)
            .map_err(|source| ConfigError::Json { source_ref: source_ref.clone(), source }),
        DocumentFormat::Yaml => serde_yaml::from_str(raw)
            .map_err(|source| ConfigError::Yaml { source_ref: source_ref.clone(), source }),
    }
}

/// Reads or fetches one source. `Ok(None)` means the source is unreachable and was skipped.
pub fn load_source(source_ref: &ConfigSource) -> Result<Option<Catalog>, ConfigError> {
    let raw = match source_ref {
        ConfigSource::File(path) => match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(source = %source_ref, "catalog source not found; skipping");
                return Ok(None);
            }
            Err(source) => {
                return Err(ConfigError::Io { source_ref: source_ref.clone(), source });
            }
        },
        ConfigSource::Url(url) => match fetch(url) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(source = %source_ref, error = %err, "catalog source fetch failed; skipping");
                return Ok(None);
            }
        },
    };

    let catalog = parse_catalog(&raw, source_ref.format(), source_ref)?;
    debug!(
        source = %source_ref,
        fragments = catalog.fragments().len(),
        placeholders = catalog.default_placeholder_transformation().len(),
        "loaded catalog source"
    );
    Ok(Some(catalog))
}

/// Loads every source in order, skipping unreachable ones.
///
/// Fails when nothing could be loaded or when any reachable source is malformed.
pub fn load_catalogs(sources: &[ConfigSource]) -> Result<Vec<Catalog>, ConfigError> {
    let mut catalogs = Vec::with_capacity(sources.len());
    for source_ref in sources {
        if let Some(catalog) = load_source(source_ref)? {
            catalogs.push(catalog);
        }
    }

    if catalogs.is_empty() {
        return Err(ConfigError::NoSources { tried: sources.to_vec() });
    }
    Ok(catalogs)
}

fn fetch(url: &str) -> Result<String, reqwest::Error> {
    let client = reqwest::blocking::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    client.get(url).send()?.error_for_status()?.text()
}
