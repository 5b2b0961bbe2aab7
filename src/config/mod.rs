// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Catalog sources: where fragment documents come from and how they are parsed.
//!
//! Sources are local files (`.json` via serde_json, anything else as YAML) or `http(s)` URLs
//! fetched once each. Unreachable sources are skipped; malformed ones abort.

mod loader;

use std::fmt;
use std::path::{Path, PathBuf};

pub use loader::{load_catalogs, load_source, parse_catalog};

/// Env var holding a comma-separated list of catalog sources (paths or URLs).
pub const CONFIG_ENV: &str = "KQOOL_CONFIG";

pub const DEFAULT_CONFIG_FILENAME: &str = ".kqool.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Url(String),
}

impl ConfigSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    pub fn format(&self) -> DocumentFormat {
        let name = match self {
            Self::File(path) => path.to_string_lossy().into_owned(),
            Self::Url(url) => url.split(['?', '#']).next().unwrap_or(url).to_owned(),
        };
        if name.to_ascii_lowercase().ends_with(".json") {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

#[derive(Debug)]
pub enum ConfigError {
    /// None of the configured sources could be read or fetched.
    NoSources { tried: Vec<ConfigSource> },
    /// Sources resolved, but together they define no fragments.
    EmptyCatalog,
    Io { source_ref: ConfigSource, source: std::io::Error },
    Yaml { source_ref: ConfigSource, source: serde_yaml::Error },
    Json { source_ref: ConfigSource, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSources { tried } if tried.is_empty() => {
                f.write_str("no catalog sources configured")
            }
            Self::NoSources { tried } => {
                let tried = tried.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "no catalog source could be loaded (tried: {})", tried.join(", "))
            }
            Self::EmptyCatalog => f.write_str("catalog sources define no fragments"),
            Self::Io { source_ref, source } => {
                write!(f, "cannot read catalog source {source_ref}: {source}")
            }
            Self::Yaml { source_ref, source } => {
                write!(f, "malformed YAML catalog in {source_ref}: {source}")
            }
            Self::Json { source_ref, source } => {
                write!(f, "malformed JSON catalog in {source_ref}: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoSources { .. } | Self::EmptyCatalog => None,
            Self::Io { source, .. } => Some(source),
            Self::Yaml { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Sources used when none are given explicitly: `$KQOOL_CONFIG`, else `~/.kqool.yaml`.
pub fn default_sources() -> Vec<ConfigSource> {
    sources_from(std::env::var(CONFIG_ENV).ok(), dirs::home_dir().as_deref())
}

fn sources_from(env_value: Option<String>, home: Option<&Path>) -> Vec<ConfigSource> {
    if let Some(value) = env_value.filter(|value| !value.trim().is_empty()) {
        return value
            .split(',')
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(ConfigSource::parse)
            .collect();
    }

    home.map(|home| vec![ConfigSource::File(home.join(DEFAULT_CONFIG_FILENAME))])
        .unwrap_or_default()
}
