// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session operations exposed to hosts (CLI picker callbacks, MCP tools).
//!
//! Each operation takes the session handle, reads the persisted state fully, computes the next
//! state, and writes it back in one atomic replace. A failed operation never writes.

use std::fmt;

use tracing::{debug, info};

use crate::compose::{available_options, OptionEntry};
use crate::config::ConfigError;
use crate::format::{decode_option, DecodeError};
use crate::model::{merge_catalogs, Catalog, Selection, SessionError, SessionState};
use crate::store::{SessionFile, StoreError};

/// Joins selection queries into the composed query.
pub const QUERY_SEPARATOR: &str = "\n";

#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    Decode(DecodeError),
    Store(StoreError),
    /// The composed query was requested before anything was picked.
    NoSelection,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "cannot start session: {err}"),
            Self::Decode(err) => write!(f, "pick rejected: {err}"),
            Self::Store(err) => write!(f, "session store: {err}"),
            Self::NoSelection => f.write_str("nothing selected yet"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NoSelection => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DecodeError> for EngineError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Outcome of [`undo`]: the recomputed options and the selection removed, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Undo {
    pub options: Vec<OptionEntry>,
    pub removed: Option<Selection>,
}

/// Merges `catalogs`, persists a new session under `file`, and returns the initial options.
pub fn init_session(
    file: SessionFile,
    catalogs: Vec<Catalog>,
) -> Result<(SessionFile, Vec<OptionEntry>), EngineError> {
    if catalogs.is_empty() {
        return Err(ConfigError::NoSources { tried: Vec::new() }.into());
    }
    let source_count = catalogs.len();
    let catalog = merge_catalogs(catalogs);
    if catalog.fragments().is_empty() {
        return Err(ConfigError::EmptyCatalog.into());
    }

    let state = SessionState::new(catalog);
    let options = available_options(state.catalog(), state.selections());
    file.save_state(&state)?;

    info!(
        session = %file.root().display(),
        sources = source_count,
        fragments = state.catalog().fragments().len(),
        "session started"
    );
    Ok((file, options))
}

/// Current options for the session, without changing it.
pub fn options(file: &SessionFile) -> Result<Vec<OptionEntry>, EngineError> {
    let state = file.load_state()?;
    Ok(available_options(state.catalog(), state.selections()))
}

/// Decodes `token`, appends it as a selection, and returns the recomputed options.
pub fn pick(file: &SessionFile, token: &str) -> Result<Vec<OptionEntry>, EngineError> {
    let state = file.load_state()?;
    let option = decode_option(token)?;
    debug!(query = option.query().unwrap_or_default(), "picked option");

    let next = state.append(Selection::new(option));
    let options = available_options(next.catalog(), next.selections());
    file.save_state(&next)?;
    Ok(options)
}

/// Removes the latest selection; with nothing selected this is a no-op.
pub fn undo(file: &SessionFile) -> Result<Undo, EngineError> {
    let state = file.load_state()?;
    match state.undo_last() {
        Ok((next, removed)) => {
            let options = available_options(next.catalog(), next.selections());
            file.save_state(&next)?;
            debug!(query = removed.query(), "undid selection");
            Ok(Undo { options, removed: Some(removed) })
        }
        Err(SessionError::Empty) => {
            debug!("undo on empty session; nothing to do");
            let options = available_options(state.catalog(), state.selections());
            Ok(Undo { options, removed: None })
        }
    }
}

/// The composed query: every selection's resolved query in pick order.
pub fn current_query(file: &SessionFile) -> Result<String, EngineError> {
    let state = file.load_state()?;
    compose_query(state.selections()).ok_or(EngineError::NoSelection)
}

pub fn compose_query(selections: &[Selection]) -> Option<String> {
    if selections.is_empty() {
        return None;
    }
    Some(selections.iter().map(Selection::query).collect::<Vec<_>>().join(QUERY_SEPARATOR))
}
