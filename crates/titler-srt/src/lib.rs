//! # titler-srt
//!
//! SubRip (`.srt`) reader. Produces the unordered cue list the caption
//! timeline is built from.
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:02,500  X1:63 X2:223 Y1:43 Y2:58
//! First line
//! second line
//!
//! 2
//! ...
//! ```

use std::path::Path;

use titler_core::{Cue, CueBounds, Strictness, Timestamp, TitlerError, TitlerResult};

/// Read and parse a SubRip file.
pub fn read_srt(path: &Path, strictness: Strictness) -> TitlerResult<Vec<Cue>> {
    let contents = std::fs::read_to_string(path)?;
    let cues = parse_srt(&contents, strictness)?;
    tracing::info!("Read {} cues from {}", cues.len(), path.display());
    Ok(cues)
}

/// Parse SubRip text into cues in file order.
pub fn parse_srt(input: &str, strictness: Strictness) -> TitlerResult<Vec<Cue>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut cues = Vec::new();

    for block in blocks(input) {
        match parse_block(&block, strictness) {
            Ok(cue) => cues.push(cue),
            Err(e) if strictness == Strictness::SkipInvalid => {
                tracing::warn!("Skipping invalid subtitle: {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(cues)
}

/// A run of non-blank lines, with the 1-based line number it starts on.
struct Block<'a> {
    first_line: usize,
    lines: Vec<&'a str>,
}

fn blocks(input: &str) -> Vec<Block<'_>> {
    let mut out = Vec::new();
    let mut current: Option<Block<'_>> = None;

    for (i, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                out.push(block);
            }
            continue;
        }
        current
            .get_or_insert_with(|| Block {
                first_line: i + 1,
                lines: Vec::new(),
            })
            .lines
            .push(line);
    }
    if let Some(block) = current {
        out.push(block);
    }
    out
}

fn parse_block(block: &Block<'_>, strictness: Strictness) -> TitlerResult<Cue> {
    let number = block.lines[0].trim();
    if number.parse::<u64>().is_err() {
        return Err(TitlerError::parse(
            format!("invalid sequence number '{}'", number),
            block.first_line,
        ));
    }

    let timing_line = block.first_line + 1;
    let timing = block.lines.get(1).ok_or_else(|| {
        TitlerError::parse(format!("cue {} has no timestamp row", number), timing_line)
    })?;

    // The separator token between the two times is not checked.
    let elements: Vec<&str> = timing.split_whitespace().collect();
    if elements.len() < 3 {
        return Err(TitlerError::parse(
            format!("invalid timestamp row '{}'", timing.trim()),
            timing_line,
        ));
    }
    let start = parse_timecode(elements[0], timing_line)?;
    let end = parse_timecode(elements[2], timing_line)?;

    let bounds = if elements.len() >= 7 {
        match parse_bounds(&elements[3..7]) {
            Some(bounds) => Some(bounds),
            None if strictness == Strictness::Lenient => None,
            None => {
                return Err(TitlerError::parse(
                    format!("invalid bounds '{}'", elements[3..7].join(" ")),
                    timing_line,
                ))
            }
        }
    } else {
        None
    };

    let text = block.lines[2..].join("\n");
    let cue = Cue::new(start, end, text);
    Ok(match bounds {
        Some(bounds) => cue.with_bounds(bounds),
        None => cue,
    })
}

fn parse_timecode(s: &str, line: usize) -> TitlerResult<Timestamp> {
    Timestamp::from_timecode(s)
        .ok_or_else(|| TitlerError::parse(format!("invalid time format '{}'", s), line))
}

/// `X1:left X2:right Y1:top Y2:bottom`
fn parse_bounds(parts: &[&str]) -> Option<CueBounds> {
    let field = |part: &str, key: &str| -> Option<i32> {
        let digits = part.strip_prefix(key)?.strip_prefix(':')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    };
    Some(CueBounds {
        left: field(parts[0], "X1")?,
        right: field(parts[1], "X2")?,
        top: field(parts[2], "Y1")?,
        bottom: field(parts[3], "Y2")?,
    })
}
