// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pure composition: placeholder expansion, pool derivation, and option recomputation.

pub mod expand;
pub mod options;
pub mod pool;

pub use expand::{expand, placeholder_names};
pub use options::{available_options, OptionEntry};
pub use pool::{fold_pool, session_pool};
