// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use super::expand::expand;
use super::pool::session_pool;
use crate::model::{Catalog, Fragment, Selection};

/// One selectable option: the text shown to the user and the payload handed back on pick.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    display: String,
    option: Fragment,
}

impl OptionEntry {
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn option(&self) -> &Fragment {
        &self.option
    }

    pub fn into_option(self) -> Fragment {
        self.option
    }
}

/// Every option currently selectable, in catalog order then expansion order.
///
/// Pure in `(catalog, selections)`; fragments without a query contribute nothing.
pub fn available_options(catalog: &Catalog, selections: &[Selection]) -> Vec<OptionEntry> {
    let pool = session_pool(catalog, selections);

    let options = catalog
        .fragments()
        .iter()
        .flat_map(|fragment| {
            expand(fragment.query().unwrap_or_default(), &pool).into_iter().map(|query| {
                OptionEntry { option: fragment.with_query(query.as_str()), display: query }
            })
        })
        .collect::<Vec<_>>();

    debug!(
        fragments = catalog.fragments().len(),
        selections = selections.len(),
        options = options.len(),
        "recomputed available options"
    );
    options
}
