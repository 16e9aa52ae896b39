//! SubRip caption writer.
//!
//! Used to export retimed captions in output-timeline coordinates.

use super::types::CaptionEntry;

/// Write caption entries to SRT content. Indices are regenerated 1-based.
pub fn write_srt(entries: &[CaptionEntry]) -> String {
    let mut output = String::new();

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt_time(entry.start),
            format_srt_time(entry.end)
        ));
        output.push_str(&entry.text);
        output.push('\n');
    }

    output
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`), rounding to the
/// nearest millisecond.
pub fn format_srt_time(seconds: f64) -> String {
    let ms = (seconds.max(0.0) * 1000.0).round() as u64;

    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::parser::parse_srt;

    #[test]
    fn test_format_srt_time() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(1.5), "00:00:01,500");
        assert_eq!(format_srt_time(3661.0005), "01:01:01,001");
        assert_eq!(format_srt_time(-2.0), "00:00:00,000");
    }

    #[test]
    fn test_written_output_parses_back() {
        let entries = vec![
            CaptionEntry::new(7, 0.25, 1.75, "first"),
            CaptionEntry::new(9, 2.0, 3.5, "second one"),
        ];
        let srt = write_srt(&entries);
        assert!(srt.starts_with("1\n00:00:00,250 --> 00:00:01,750\nfirst\n\n2\n"));

        let track = parse_srt(&srt).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.entries[1].text, "second one");
        assert!((track.entries[1].end - 3.5).abs() < 1e-9);
    }
}
