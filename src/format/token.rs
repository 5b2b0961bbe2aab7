// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::model::Fragment;

#[derive(Debug)]
pub enum DecodeError {
    Base64 { source: base64::DecodeError },
    Json { source: serde_json::Error },
    MissingQuery,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 { source } => write!(f, "option token is not valid base64: {source}"),
            Self::Json { source } => write!(f, "option token does not hold an option: {source}"),
            Self::MissingQuery => f.write_str("option token has no query string"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Base64 { source } => Some(source),
            Self::Json { source } => Some(source),
            Self::MissingQuery => None,
        }
    }
}

/// Serialises a fragment-option into a token free of whitespace and NUL (standard base64 of
/// its JSON form).
pub fn encode_option(option: &Fragment) -> String {
    // Fragment holds only strings, string lists and JSON values, so this cannot fail.
    let json = serde_json::to_vec(option).unwrap_or_default();
    STANDARD.encode(json)
}

/// Parses a token produced by [`encode_option`] back into the fragment-option.
pub fn decode_option(token: &str) -> Result<Fragment, DecodeError> {
    let bytes = STANDARD.decode(token.trim()).map_err(|source| DecodeError::Base64 { source })?;
    let option: Fragment =
        serde_json::from_slice(&bytes).map_err(|source| DecodeError::Json { source })?;
    if option.query().is_none() {
        return Err(DecodeError::MissingQuery);
    }
    Ok(option)
}
