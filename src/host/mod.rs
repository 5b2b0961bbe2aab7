// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive host: drives `fzf` over a session and captures the final query.
//!
//! fzf bindings call back into this binary (`--pick`, `--undo`, `--options`, `--query`) with
//! the session directory, so every action runs as a fresh process against persisted state.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::ops::{self, EngineError};
use crate::store::{SessionFile, StoreError};

const PICKER_PROGRAM: &str = "fzf";

#[derive(Debug)]
pub enum HostError {
    Spawn { program: String, source: io::Error },
    Io { path: PathBuf, source: io::Error },
    Engine(EngineError),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, source } => write!(f, "cannot run {program}: {source}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Engine(err) => Some(err),
        }
    }
}

impl From<EngineError> for HostError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl From<StoreError> for HostError {
    fn from(err: StoreError) -> Self {
        Self::Engine(EngineError::Store(err))
    }
}

/// Quotes `value` for a POSIX shell (fzf runs bindings through `$SHELL -c`).
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// fzf arguments wiring picks, undo, and preview back to `exe` for the session in `session_dir`.
pub fn picker_args(exe: &Path, session_dir: &Path) -> Vec<String> {
    let callback = format!(
        "{} --session {}",
        shell_quote(&exe.to_string_lossy()),
        shell_quote(&session_dir.to_string_lossy())
    );
    let reload = format!("reload({callback} --options)");

    let mut args = [
        "--border",
        "--exact",
        "--multi",
        "--read0",
        "--gap",
        "--highlight-line",
        "--delimiter",
        "\t",
        "--with-nth",
        "1",
    ]
    .map(str::to_owned)
    .to_vec();
    args.extend([
        "--preview".to_owned(),
        format!("{callback} --query"),
        "--bind".to_owned(),
        format!("enter:execute-silent({callback} --pick {{2}})+{reload}+clear-query+refresh-preview"),
        "--bind".to_owned(),
        format!("ctrl-u:execute-silent({callback} --undo)+{reload}+refresh-preview"),
        "--bind".to_owned(),
        "ctrl-c:abort".to_owned(),
    ]);
    args
}

/// Runs the picker with `records` on stdin and waits for it to exit.
pub fn run_picker(exe: &Path, file: &SessionFile, records: &str) -> Result<ExitStatus, HostError> {
    let spawn_err = |source| HostError::Spawn { program: PICKER_PROGRAM.to_owned(), source };

    let mut child = Command::new(PICKER_PROGRAM)
        .args(picker_args(exe, file.root()))
        .stdin(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(records.as_bytes()) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
            Err(source) => return Err(spawn_err(source)),
        }
    }

    let status = child.wait().map_err(spawn_err)?;
    debug!(?status, "picker exited");
    Ok(status)
}

/// OSC 52 escape sequence asking the terminal to put `text` on the clipboard.
pub fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

pub fn append_history(path: &Path, query: &str) -> Result<(), HostError> {
    let io_err = |source| HostError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path).map_err(io_err)?;
    let mut entry = query.to_owned();
    if !entry.ends_with('\n') {
        entry.push('\n');
    }
    file.write_all(entry.as_bytes()).map_err(io_err)
}

/// Captures the composed query once the picker is done.
///
/// Writes it next to the session state, reports it on `out`, copies it via OSC 52, and appends
/// it to `history` when given. Returns `None` when nothing was selected.
pub fn finish(
    file: &SessionFile,
    history: Option<&Path>,
    out: &mut impl Write,
) -> Result<Option<String>, HostError> {
    let query = match ops::current_query(file) {
        Ok(query) => query,
        Err(EngineError::NoSelection) => {
            writeln!(out, "Nothing selected; no query captured.")
                .map_err(|source| HostError::Io { path: PathBuf::from("<stdout>"), source })?;
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let path = file.write_final_query(&query)?;
    if let Some(history) = history {
        append_history(history, &query)?;
    }

    let report = format!(
        "Your query is saved at: {}\nYour query:\n{query}\n{}",
        path.display(),
        osc52_sequence(&query)
    );
    out.write_all(report.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|source| HostError::Io { path: PathBuf::from("<stdout>"), source })?;
    Ok(Some(query))
}
