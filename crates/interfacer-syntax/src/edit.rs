//! Byte-offset text edits.

use std::ops::Range;

use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset..offset, text)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for text length {text_len}")]
    RangeOutOfBounds { range: Range<usize>, text_len: usize },
    #[error("offset {offset} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary { offset: usize },
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits {
        first: Range<usize>,
        second: Range<usize>,
    },
}

/// Applies `edits` to `text`, back to front, after sorting them by position.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut edits = edits.to_vec();
    normalize_text_edits(text, &mut edits)?;

    let mut out = text.to_string();
    for edit in edits.into_iter().rev() {
        out.replace_range(edit.range, &edit.replacement);
    }
    Ok(out)
}

/// Sorts edits, rejects out-of-bounds or overlapping ones and merges adjacent ones.
///
/// Two inserts at the same offset count as overlapping: their relative order would be
/// ambiguous.
pub fn normalize_text_edits(text: &str, edits: &mut Vec<TextEdit>) -> Result<(), EditError> {
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    for edit in edits.iter() {
        if edit.range.start > edit.range.end || edit.range.end > text.len() {
            return Err(EditError::RangeOutOfBounds {
                range: edit.range.clone(),
                text_len: text.len(),
            });
        }
        for offset in [edit.range.start, edit.range.end] {
            if !text.is_char_boundary(offset) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }
    }

    for pair in edits.windows(2) {
        let (first, second) = (&pair[0].range, &pair[1].range);
        let same_point = first.is_empty() && second.is_empty() && first.start == second.start;
        if first.end > second.start || same_point {
            return Err(EditError::OverlappingEdits {
                first: first.clone(),
                second: second.clone(),
            });
        }
    }

    let mut merged: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.range.end == edit.range.start {
                last.range.end = edit.range.end;
                last.replacement.push_str(&edit.replacement);
                continue;
            }
        }
        merged.push(edit);
    }
    *edits = merged;

    Ok(())
}
