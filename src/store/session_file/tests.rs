// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{SessionFile, StoreError, WriteDurability};
use crate::model::{Catalog, Fragment, Selection, SessionState};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("kqool-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct SessionFileTestCtx {
    _tmp: TempDir,
    session_dir: std::path::PathBuf,
    file: SessionFile,
}

impl SessionFileTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let session_dir = tmp.path().join("my-session");
        let file = SessionFile::new(&session_dir);
        Self { _tmp: tmp, session_dir, file }
    }
}

#[fixture]
fn ctx() -> SessionFileTestCtx {
    SessionFileTestCtx::new("session-file")
}

fn sample_state() -> SessionState {
    let catalog = Catalog::new(
        Default::default(),
        vec![Fragment::new("env={{env}}").with_extra("label", serde_json::json!("Env"))],
    );
    SessionState::new(catalog).append(Selection::new(Fragment::new("env=prod")))
}

#[rstest]
fn save_then_load_returns_same_state(ctx: SessionFileTestCtx) {
    let state = sample_state();
    ctx.file.save_state(&state).expect("save");

    assert!(ctx.file.exists());
    assert_eq!(ctx.file.load_state().expect("load"), state);
}

#[rstest]
fn save_creates_missing_session_dir(ctx: SessionFileTestCtx) {
    assert!(!ctx.session_dir.exists());
    ctx.file.save_state(&sample_state()).expect("save");
    assert!(ctx.session_dir.join("kqool-session.json").is_file());
}

#[rstest]
fn save_leaves_no_temp_files(ctx: SessionFileTestCtx) {
    let file = ctx.file.clone().with_durability(WriteDurability::Durable);
    file.save_state(&sample_state()).expect("first save");
    file.save_state(&SessionState::new(Catalog::default())).expect("second save");

    let names = std::fs::read_dir(&ctx.session_dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["kqool-session.json".to_owned()]);
    assert_eq!(file.load_state().expect("load"), SessionState::new(Catalog::default()));
}

#[rstest]
fn load_without_state_reports_missing_session(ctx: SessionFileTestCtx) {
    assert!(matches!(ctx.file.load_state(), Err(StoreError::MissingSession { .. })));
}

#[rstest]
fn load_of_corrupt_state_reports_json_error(ctx: SessionFileTestCtx) {
    std::fs::create_dir_all(&ctx.session_dir).unwrap();
    std::fs::write(ctx.file.state_path(), "{\"config\":").unwrap();

    let err = ctx.file.load_state().unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }), "{err}");
}

#[rstest]
fn final_query_is_written_next_to_state(ctx: SessionFileTestCtx) {
    let path = ctx.file.write_final_query("a\nb").expect("write final query");
    assert_eq!(path, ctx.session_dir.join("final.kql"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "a\nb");
}

#[cfg(unix)]
#[rstest]
fn refuses_to_write_through_symlink(ctx: SessionFileTestCtx) {
    std::fs::create_dir_all(&ctx.session_dir).unwrap();
    let target = ctx.session_dir.join("elsewhere.json");
    std::fs::write(&target, "{}").unwrap();
    std::os::unix::fs::symlink(&target, ctx.file.state_path()).unwrap();

    let err = ctx.file.save_state(&sample_state()).unwrap_err();
    assert!(matches!(err, StoreError::SymlinkRefused { .. }), "{err}");
}

#[test]
fn fresh_handles_are_distinct_empty_dirs_under_temp_dir() {
    let first = SessionFile::create_in_temp_dir().expect("first handle");
    let second = SessionFile::create_in_temp_dir().expect("second handle");

    assert_ne!(first.root(), second.root());
    for file in [&first, &second] {
        assert!(file.root().starts_with(env::temp_dir()));
        assert!(file.root().is_dir());
        assert!(!file.exists());
    }

    let _ = std::fs::remove_dir_all(first.root());
    let _ = std::fs::remove_dir_all(second.root());
}
