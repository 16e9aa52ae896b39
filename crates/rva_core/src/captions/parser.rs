//! SubRip caption parser.
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! Hello, world!
//! ```
//!
//! Index lines are optional. Multi-line text is joined with a single space
//! so that word derivation sees one stream of tokens. Times are returned in
//! seconds.

use super::error::ParseError;
use super::types::{CaptionEntry, CaptionTrack};

/// Parse SRT content into a caption track, preserving source order.
pub fn parse_srt(content: &str) -> Result<CaptionTrack, ParseError> {
    let content = content
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut entries = Vec::new();
    let mut line_offset = 0;

    for block in content.split("\n\n") {
        let lines: Vec<&str> = block.trim().lines().collect();
        let block_lines = block.lines().count().max(1);

        if lines.is_empty() {
            line_offset += block_lines + 1;
            continue;
        }

        let Some(timing_idx) = lines.iter().position(|line| line.contains("-->")) else {
            // A lone index or stray text line without timing is malformed.
            if lines.iter().any(|l| l.trim().parse::<usize>().is_err()) {
                return Err(ParseError::MissingTiming {
                    line: line_offset + 1,
                });
            }
            line_offset += block_lines + 1;
            continue;
        };

        let timing_line = lines[timing_idx];
        let line_num = line_offset + timing_idx + 1;
        let (start, end) = parse_srt_timing(timing_line)
            .ok_or_else(|| ParseError::invalid_time(line_num, timing_line))?;

        if end < start {
            return Err(ParseError::invalid_entry(
                line_num,
                format!("end {end:.3}s precedes start {start:.3}s"),
            ));
        }

        let text = lines[timing_idx + 1..]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !text.is_empty() {
            entries.push(CaptionEntry::new(entries.len() + 1, start, end, text));
        }

        line_offset += block_lines + 1;
    }

    Ok(CaptionTrack::new(entries))
}

/// Parse a timing line: `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
fn parse_srt_timing(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    // Position tags like `X1:100` may follow the end time.
    let end = end.split_whitespace().next()?;
    Some((parse_srt_time(start)?, parse_srt_time(end)?))
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) into seconds.
pub fn parse_srt_time(s: &str) -> Option<f64> {
    let s = s.trim().replace(',', ".");

    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: u64 = parts[0].parse().ok()?;
    let minutes: u64 = parts[1].parse().ok()?;

    let (sec_str, frac_str) = parts[2].split_once('.').unwrap_or((parts[2], ""));
    let seconds: u64 = sec_str.parse().ok()?;

    let fraction = if frac_str.is_empty() {
        0.0
    } else {
        let digits: u64 = frac_str.parse().ok()?;
        digits as f64 / 10f64.powi(frac_str.len() as i32)
    };

    let whole = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?;
    Some(whole as f64 + fraction)
}
