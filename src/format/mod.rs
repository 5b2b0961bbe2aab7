// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Data handed across the picker boundary.
//!
//! Options travel as `<display>\t<token>` records, NUL-separated; the token is the only thing
//! the engine needs back to commit a pick.

pub mod records;
pub mod token;

pub use records::{
    option_records, render_records, OptionRecord, FIELD_SEPARATOR, RECORD_SEPARATOR,
};
pub use token::{decode_option, encode_option, DecodeError};
