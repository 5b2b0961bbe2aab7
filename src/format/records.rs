// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::token::encode_option;
use crate::compose::OptionEntry;

/// Separates the display text from the option token within one record.
pub const FIELD_SEPARATOR: char = '\t';

/// Separates records; display text may span lines, so records are NUL-terminated.
pub const RECORD_SEPARATOR: char = '\0';

/// A picker record: the human-readable query plus the opaque token to hand back on pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRecord {
    pub display: String,
    pub token: String,
}

impl OptionRecord {
    pub fn from_entry(entry: &OptionEntry) -> Self {
        Self { display: display_field(entry.display()), token: encode_option(entry.option()) }
    }

    pub fn to_line(&self) -> String {
        format!("{}{FIELD_SEPARATOR}{}", self.display, self.token)
    }
}

pub fn option_records(entries: &[OptionEntry]) -> Vec<OptionRecord> {
    entries.iter().map(OptionRecord::from_entry).collect()
}

/// Joins records into the framed stream read by the picker (`--read0 --delimiter '\t'`).
pub fn render_records(records: &[OptionRecord]) -> String {
    let mut out = String::new();
    for (idx, record) in records.iter().enumerate() {
        if idx > 0 {
            out.push(RECORD_SEPARATOR);
        }
        out.push_str(&record.to_line());
    }
    out
}

/// Display text with separator characters blanked; the token still carries the exact query.
fn display_field(query: &str) -> String {
    query.replace([FIELD_SEPARATOR, RECORD_SEPARATOR], " ")
}

#[cfg(test)]
mod tests {
    use super::{option_records, render_records, RECORD_SEPARATOR};
    use crate::compose::available_options;
    use crate::format::decode_option;
    use crate::model::{Catalog, Fragment};

    #[test]
    fn records_split_back_into_display_and_token() {
        let catalog = Catalog::new(
            Default::default(),
            vec![Fragment::new("a\tb"), Fragment::new("multi\nline"), Fragment::new("c")],
        );
        let entries = available_options(&catalog, &[]);
        let rendered = render_records(&option_records(&entries));

        let lines = rendered.split(RECORD_SEPARATOR).collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);

        let fields =
            lines.iter().map(|line| line.split('\t').collect::<Vec<_>>()).collect::<Vec<_>>();
        assert_eq!(fields[0][0], "a b");
        assert_eq!(fields[1][0], "multi\nline");
        assert_eq!(fields[2][0], "c");
        for (field, entry) in fields.iter().zip(&entries) {
            assert_eq!(field.len(), 2);
            assert_eq!(&decode_option(field[1]).expect("decode"), entry.option());
        }
    }

    #[test]
    fn empty_option_list_renders_empty_stream() {
        assert_eq!(render_records(&[]), "");
    }
}
