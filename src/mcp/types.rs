// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One selectable option: display text plus the token to pass to `session.pick`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpOption {
    pub query: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SessionInitParams {
    /// Catalog sources (file paths or http(s) URLs); server defaults when empty.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Session directory to (re)initialise; a fresh temp directory when omitted.
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SessionParams {
    pub session: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SessionPickParams {
    pub session: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionOptionsResponse {
    pub session: String,
    pub options: Vec<McpOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionUndoResponse {
    pub session: String,
    pub options: Vec<McpOption>,
    /// Query of the removed selection; `None` when there was nothing to undo.
    pub undone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionQueryResponse {
    pub session: String,
    /// Composed query; `None` when nothing has been selected.
    pub query: Option<String>,
    pub selections: u64,
}
