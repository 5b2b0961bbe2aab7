// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Kqool: incremental query composition from fragment catalogs.
//!
//! A session holds a merged catalog and an ordered list of picked fragments. Picking a
//! fragment contributes its placeholder values, which expands the remaining fragments
//! into concrete options. The composed query is the picked fragments joined in order.

pub mod compose;
pub mod config;
pub mod format;
pub mod host;
pub mod mcp;
pub mod model;
pub mod ops;
pub mod store;
