use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::edit::{apply_text_edits, EditError, TextEdit};
use crate::java::{collect_problems, extract_file, parse_java};
use crate::model::{JavaFile, ParseFailure, ParseOutcome, TypeDecl};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to walk source directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parser { path: PathBuf, message: String },
    #[error("failed to edit {path}: {source}")]
    Edit {
        path: PathBuf,
        #[source]
        source: EditError,
    },
}

/// Parses one compilation unit held in memory.
pub fn parse_source(path: PathBuf, text: String) -> Result<ParseOutcome, SourceError> {
    let tree = parse_java(&text).map_err(|message| SourceError::Parser {
        path: path.clone(),
        message,
    })?;
    let root = tree.root_node();
    if root.has_error() {
        let problems = collect_problems(root, &text);
        return Ok(ParseOutcome::Failed(ParseFailure { path, problems }));
    }
    Ok(ParseOutcome::Parsed(extract_file(path, text, root)))
}

pub fn parse_file(path: &Path) -> Result<ParseOutcome, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_source(path.to_path_buf(), text)
}

/// Parses every `.java` file beneath `root`, in path order.
///
/// Files with syntax errors come back as [`ParseOutcome::Failed`]; I/O problems abort.
pub fn try_to_parse(root: &Path) -> Result<Vec<ParseOutcome>, SourceError> {
    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| SourceError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || entry.path().extension() != Some(OsStr::new("java")) {
            continue;
        }
        let outcome = parse_file(entry.path())?;
        if let ParseOutcome::Failed(failure) = &outcome {
            tracing::debug!(
                target: "interfacer.syntax",
                path = %failure.path.display(),
                problems = failure.problems.len(),
                "source file has syntax errors"
            );
        }
        out.push(outcome);
    }
    Ok(out)
}

fn collect_insertions(decl: &TypeDecl, out: &mut Vec<TextEdit>) {
    if let Some((offset, text)) = decl.clause_insertion() {
        out.push(TextEdit::insert(offset, text));
    }
    for member in &decl.members {
        collect_insertions(member, out);
    }
}

/// Writes every file whose declarations gained supertype clauses and returns how many were
/// written. Only the new clauses are inserted; the rest of the text is left byte-for-byte.
///
/// Saved files are re-read into their in-memory form so they can be edited again.
pub fn save_all(files: &mut [JavaFile]) -> Result<usize, SourceError> {
    let mut written = 0;
    for file in files.iter_mut().filter(|f| f.is_modified()) {
        let mut edits = Vec::new();
        for decl in &file.types {
            collect_insertions(decl, &mut edits);
        }
        let text = apply_text_edits(&file.text, &edits).map_err(|source| SourceError::Edit {
            path: file.path.clone(),
            source,
        })?;
        std::fs::write(&file.path, &text).map_err(|source| SourceError::Write {
            path: file.path.clone(),
            source,
        })?;
        written += 1;
        tracing::debug!(target: "interfacer.syntax", path = %file.path.display(), edits = edits.len(), "saved source file");

        match parse_source(file.path.clone(), text.clone())? {
            ParseOutcome::Parsed(reparsed) => *file = reparsed,
            ParseOutcome::Failed(failure) => {
                file.text = text;
                tracing::warn!(
                    target: "interfacer.syntax",
                    path = %failure.path.display(),
                    "saved file no longer parses; it will be skipped until reloaded"
                );
                file.types.clear();
            }
        }
    }
    Ok(written)
}
