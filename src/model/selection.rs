// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::fragment::{Fragment, PlaceholderMap};

/// One committed fragment-option: the resolved query plus the originating fragment payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Fragment);

impl Selection {
    pub fn new(option: Fragment) -> Self {
        Self(option)
    }

    pub fn query(&self) -> &str {
        self.0.query().unwrap_or_default()
    }

    pub fn placeholder_transformation(&self) -> Option<&PlaceholderMap> {
        self.0.placeholder_transformation()
    }

    pub fn fragment(&self) -> &Fragment {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Undo was requested with no prior selection.
    Empty,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("session has no selection to undo"),
        }
    }
}

impl std::error::Error for SessionError {}

/// The catalog a session started with plus its selections, in pick order.
///
/// Transitions return a new state; the selection list only grows at the end or shrinks from
/// the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    config: Catalog,
    #[serde(default)]
    selection: Vec<Selection>,
}

impl SessionState {
    pub fn new(config: Catalog) -> Self {
        Self { config, selection: Vec::new() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.config
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selection
    }

    pub fn append(&self, selection: Selection) -> SessionState {
        let mut next = self.clone();
        next.selection.push(selection);
        next
    }

    /// Drops the most recent selection, returning the new state and what was removed.
    pub fn undo_last(&self) -> Result<(SessionState, Selection), SessionError> {
        let mut next = self.clone();
        let removed = next.selection.pop().ok_or(SessionError::Empty)?;
        Ok((next, removed))
    }
}
