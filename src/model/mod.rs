// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A session holds an immutable catalog (fragments plus default placeholder values) and the
//! ordered selections picked so far.

pub mod catalog;
pub mod fragment;
pub mod selection;

pub use catalog::{merge_catalogs, union_placeholders, Catalog};
pub use fragment::{Fragment, PlaceholderMap};
pub use selection::{Selection, SessionError, SessionState};
