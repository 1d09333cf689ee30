//! Append-only record of transcripts that have been fully processed

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{RecapError, Result};

/// One line per completed input filename.
///
/// Entries are appended only after the document's note is on disk and are
/// never removed, so a crash part-way through a document leaves it eligible
/// for the next run.
#[derive(Debug)]
pub struct ProcessingLedger {
    path: PathBuf,
    done: HashSet<String>,
}

impl ProcessingLedger {
    /// Open the ledger, creating an empty file (and its directory) if absent
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| RecapError::io_operation("create directory", parent.display(), e))?;
        }

        if !path.exists() {
            File::create(path).map_err(|e| RecapError::io_operation("create", path.display(), e))?;
            tracing::info!(path = %path.display(), "Created empty ledger");
        }

        let content =
            fs::read_to_string(path).map_err(|e| RecapError::io_operation("read", path.display(), e))?;
        if !content.is_empty() && !content.ends_with('\n') {
            // A hand-edited ledger may lack the final newline
            OpenOptions::new()
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(b"\n"))
                .map_err(|e| RecapError::io_operation("append to", path.display(), e))?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            done: parse_entries(&content),
        })
    }

    /// Read the ledger without touching the filesystem; a missing file is empty
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(RecapError::io_operation("read", path.display(), e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            done: parse_entries(&content),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_done(&self, filename: &str) -> bool {
        self.done.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Append `filename` and flush it to disk
    pub fn mark_done(&mut self, filename: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| RecapError::io_operation("open", self.path.display(), e))?;

        writeln!(file, "{filename}")
            .and_then(|()| file.sync_data())
            .map_err(|e| RecapError::io_operation("append to", self.path.display(), e))?;

        self.done.insert(filename.to_string());
        Ok(())
    }
}

fn parse_entries(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
