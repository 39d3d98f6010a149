//! Test helpers for writing problem records and route files to disk.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use sortie_core::ProblemData;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write test file");
}

pub(super) fn write_problem(path: &Utf8Path, data: &ProblemData) {
    let payload = serde_json::to_string_pretty(data).expect("serialize problem");
    write_utf8(path, payload.as_bytes());
}

/// Temporary directory addressed through UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}
