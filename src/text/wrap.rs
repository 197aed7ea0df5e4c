//! Width-bounded line splitting.
//!
//! Word mode breaks at UAX #14 opportunities and falls back to character
//! breaking for a single word wider than the line. Character mode breaks
//! anywhere. Both honor hard newlines and always place at least one
//! character on a line, so an over-narrow box cannot loop forever.

use serde::{Deserialize, Serialize};
use unicode_linebreak::linebreaks;

use crate::error::Result;

/// How a text node splits a string that is wider than its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    #[default]
    Word,
    Character,
}

/// Split `text` into lines no wider than `max_width` according to `measure`.
pub fn split_lines<F>(text: &str, max_width: f64, mode: WrapMode, mut measure: F) -> Result<Vec<String>>
where
    F: FnMut(&str) -> Result<f64>,
{
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        match mode {
            WrapMode::Word => break_words(paragraph, max_width, &mut measure, &mut lines)?,
            WrapMode::Character => break_chars(paragraph, max_width, &mut measure, &mut lines)?,
        }
    }
    Ok(lines)
}

fn break_words<F>(paragraph: &str, max_width: f64, measure: &mut F, lines: &mut Vec<String>) -> Result<()>
where
    F: FnMut(&str) -> Result<f64>,
{
    let mut line = String::new();
    let mut start = 0;

    // linebreaks() yields the byte offset AFTER each opportunity, i.e. the
    // start of the next segment; the last one is the end of the paragraph.
    for (offset, _) in linebreaks(paragraph) {
        let segment = &paragraph[start..offset];
        start = offset;

        let candidate = format!("{}{}", line, segment);
        if measure(candidate.trim_end())? <= max_width {
            line = candidate;
            continue;
        }

        if !line.is_empty() {
            lines.push(line.trim_end().to_string());
            line.clear();
        }

        let word = segment.trim_end();
        if measure(word)? <= max_width {
            line.push_str(segment);
            continue;
        }

        let mut pieces = Vec::new();
        break_chars(word, max_width, measure, &mut pieces)?;
        let tail = pieces.pop().unwrap_or_default();
        lines.extend(pieces);
        line = tail;
        line.push_str(&segment[word.len()..]);
    }

    if !line.is_empty() {
        lines.push(line.trim_end().to_string());
    }
    Ok(())
}

fn break_chars<F>(paragraph: &str, max_width: f64, measure: &mut F, lines: &mut Vec<String>) -> Result<()>
where
    F: FnMut(&str) -> Result<f64>,
{
    let mut line = String::new();
    for ch in paragraph.chars() {
        line.push(ch);
        if line.chars().count() > 1 && measure(&line)? > max_width {
            line.pop();
            lines.push(std::mem::take(&mut line));
            line.push(ch);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    Ok(())
}
