// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for sessions on disk.
//!
//! A session directory is the handle every host call passes around; the engine keeps no
//! state between calls.

pub mod session_file;

pub use session_file::{SessionFile, StoreError, WriteDurability};
