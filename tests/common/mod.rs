//! Common test utilities for annuaire integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a directory of vCard source files.
pub struct SourceDir {
    dir: TempDir,
}

impl SourceDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a vCard file and return its path.
    pub fn add_vcf(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, body).expect("Failed to write vcf");
        path
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Build one serialized card from (property, value) pairs.
pub fn card(props: &[(&str, &str)]) -> String {
    let mut out = String::from("BEGIN:VCARD\nVERSION:4.0\n");
    for (prop, value) in props {
        out.push_str(&format!("{prop}:{value}\n"));
    }
    out.push_str("END:VCARD\n");
    out
}

/// Drop REV lines so serialized outputs can be compared deterministically.
pub fn strip_rev(serialized: &str) -> String {
    serialized
        .lines()
        .filter(|line| !line.starts_with("REV:"))
        .collect::<Vec<_>>()
        .join("\n")
}
