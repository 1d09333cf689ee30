//! Reading from and writing to the markdown vault

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{RecapError, Result};
use crate::link::{keywords_footer, link_all};

/// Characters a vault note name may not contain
const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Titles of every note in the vault, without the `.md` extension.
///
/// Hidden files and anything under hidden directories are skipped.
pub fn note_titles(vault: &Path) -> Result<Vec<String>> {
    if !vault.is_dir() {
        return Err(RecapError::not_found("vault directory", vault.display()));
    }

    let mut titles = Vec::new();
    for entry in WalkDir::new(vault)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable vault entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(title) = name.strip_suffix(".md") {
            titles.push(title.to_string());
        }
    }
    Ok(titles)
}

/// Whether a note title is short and non-numeric enough to act as a keyword
pub fn is_keyword_candidate(title: &str) -> bool {
    let words = title.split_whitespace().count();
    let numeric = !title.is_empty() && title.chars().all(char::is_numeric);
    words > 0 && words < 4 && !numeric
}

/// Sorted, deduplicated keyword vocabulary drawn from the vault's note titles
#[tracing::instrument(fields(vault = %vault.display()))]
pub fn keyword_vocabulary(vault: &Path) -> Result<Vec<String>> {
    let vocabulary: BTreeSet<String> = note_titles(vault)?
        .into_iter()
        .filter(|title| is_keyword_candidate(title))
        .collect();

    tracing::debug!(size = vocabulary.len(), "vocabulary");
    Ok(vocabulary.into_iter().collect())
}

/// Input filenames in `dir`, sorted; hidden files and subdirectories are ignored
pub fn list_inputs(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(RecapError::not_found("input directory", dir.display()));
    }

    let entries = fs::read_dir(dir).map_err(|e| RecapError::io_operation("read", dir.display(), e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!(name = ?raw, "Skipping input with a non-UTF-8 file name");
                continue;
            }
        };
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Filename without its extension, used when linking back to the source
pub fn display_name(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
}

fn safe_name(title: &str) -> String {
    let safe: String = title
        .chars()
        .map(|c| if FORBIDDEN_NAME_CHARS.contains(&c) { '-' } else { c })
        .collect();
    safe.trim().to_string()
}

/// File name for a note titled `title`
pub fn note_file_name(title: &str) -> String {
    format!("{}.md", safe_name(title))
}

/// Path for a note titled `title` that avoids every path in `claimed`,
/// numbering the name ` (2)`, ` (3)`, ... when needed
pub fn unclaimed_note_path(output_dir: &Path, title: &str, claimed: &HashSet<PathBuf>) -> PathBuf {
    let path = output_dir.join(note_file_name(title));
    if !claimed.contains(&path) {
        return path;
    }

    let base = safe_name(title);
    (2..)
        .map(|n| output_dir.join(format!("{base} ({n}).md")))
        .find(|candidate| !claimed.contains(candidate))
        .unwrap_or(path)
}

/// Full text of a summary note
pub fn render_note(source_filename: &str, summary: &str, keywords: &[String]) -> String {
    format!(
        "_From conversation [[{}]]_\n\n{}\n\n{}",
        display_name(source_filename),
        link_all(summary, keywords),
        keywords_footer(keywords)
    )
}

/// Write a note into `output_dir`, creating the directory if needed.
///
/// Paths in `claimed` (notes written earlier in the same run) are never
/// overwritten; a note left by an earlier run is.
pub fn write_note(
    output_dir: &Path,
    title: &str,
    content: &str,
    claimed: &HashSet<PathBuf>,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .map_err(|e| RecapError::io_operation("create directory", output_dir.display(), e))?;

    let path = unclaimed_note_path(output_dir, title, claimed);
    if path.exists() {
        tracing::warn!(path = %path.display(), "Overwriting existing note");
    }

    fs::write(&path, content).map_err(|e| RecapError::io_operation("write", path.display(), e))?;
    Ok(path)
}
