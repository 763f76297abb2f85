use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// A single timed cue from a WebVTT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptCue {
    /// 1-based position in the transcript
    pub number: usize,

    /// Offset of the cue start from the beginning of the audio
    pub start: Duration,

    /// Offset of the cue end
    pub end: Duration,

    /// Cue text, with internal line breaks collapsed to spaces
    pub text: String,
}

/// Parse a WebVTT payload into timed cues.
///
/// Tolerates payloads that arrive JSON-string-encoded: surrounding quotes are
/// stripped and literal `\n` sequences become real newlines before parsing.
/// Blocks whose first line is not exactly one cue timing (cue identifiers,
/// NOTE blocks, mangled timing lines) are skipped.
pub fn parse_vtt(content: &str) -> Result<Vec<TranscriptCue>> {
    let mut content = content.trim_matches('"').to_string();
    if content.contains("\\n") {
        content = content.replace("\\n", "\n");
    }

    let body = content
        .strip_prefix("WEBVTT\n\n")
        .ok_or_else(|| anyhow::anyhow!("invalid VTT format: missing WEBVTT header"))?;

    let mut cues = Vec::new();
    for block in body.split("\n\n") {
        let lines: Vec<&str> = block.trim_matches('\n').lines().collect();
        if lines.len() < 2 {
            continue;
        }

        let timing: Vec<&str> = lines[0].split(" --> ").collect();
        if timing.len() != 2 {
            continue;
        }
        let (start_raw, end_raw) = (timing[0], timing[1]);

        let start = parse_timestamp(start_raw)
            .with_context(|| format!("invalid start timestamp {:?}", start_raw))?;
        let end = parse_timestamp(end_raw)
            .with_context(|| format!("invalid end timestamp {:?}", end_raw))?;

        cues.push(TranscriptCue {
            number: cues.len() + 1,
            start,
            end,
            text: lines[1..].join(" "),
        });
    }

    Ok(cues)
}

/// Join cue texts into the plain transcript string
pub fn flatten_cues(cues: &[TranscriptCue]) -> String {
    cues.iter()
        .map(|cue| cue.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a cue offset in the VTT timestamp form `HH:MM:SS.mmm`
pub fn format_timestamp(offset: Duration) -> String {
    let total_ms = offset.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Parse a strict `HH:MM:SS.mmm` timestamp (two-digit hours, explicit
/// milliseconds)
fn parse_timestamp(timestamp: &str) -> Result<Duration> {
    if !timestamp.contains('.') {
        anyhow::bail!("invalid timestamp format: missing milliseconds");
    }

    let parts: Vec<&str> = timestamp.split(':').collect();
    if parts.len() != 3 || parts[0].len() != 2 {
        anyhow::bail!("invalid timestamp format: expected HH:MM:SS.mmm");
    }

    let hours: u64 = parts[0].parse().context("invalid hours")?;
    let minutes: u64 = parts[1].parse().context("invalid minutes")?;

    let second_parts: Vec<&str> = parts[2].split('.').collect();
    if second_parts.len() != 2 {
        anyhow::bail!("invalid seconds format: missing milliseconds");
    }
    let seconds: u64 = second_parts[0].parse().context("invalid seconds")?;
    let millis: u64 = second_parts[1].parse().context("invalid milliseconds")?;

    Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds) + Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_vtt() {
        let content = "WEBVTT\n\n\
            00:00:01.000 --> 00:00:04.000\n\
            Hello, this is the first subtitle\n\n\
            00:00:04.100 --> 00:00:08.000\n\
            This is the second subtitle";

        let cues = parse_vtt(content).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].number, 1);
        assert_eq!(cues[0].start, Duration::from_secs(1));
        assert_eq!(cues[0].end, Duration::from_secs(4));
        assert_eq!(cues[0].text, "Hello, this is the first subtitle");
        assert_eq!(cues[1].number, 2);
        assert_eq!(cues[1].start, Duration::from_millis(4100));
    }

    #[test]
    fn test_parse_multi_line_subtitle() {
        let content = "WEBVTT\n\n\
            00:00:01.000 --> 00:00:04.000\n\
            Hello, this is\n\
            a multi-line subtitle\n\n\
            00:00:04.100 --> 00:00:08.000\n\
            Second entry";

        let cues = parse_vtt(content).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "Hello, this is a multi-line subtitle");
    }

    #[test]
    fn test_parse_invalid_header() {
        assert!(parse_vtt("NOT A VTT FILE").is_err());
    }

    #[test]
    fn test_parse_extra_blank_lines_between_entries() {
        let content = "WEBVTT\n\n\n\
            00:00:01.000 --> 00:00:04.000\n\
            First entry\n\n\n\
            00:00:04.100 --> 00:00:08.000\n\
            Second entry";

        let cues = parse_vtt(content).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[1].number, 2);
    }

    #[test]
    fn test_parse_json_encoded_payload() {
        // VTT that went through a JSON string on the way here
        let content = "\"WEBVTT\\n\\n00:00:00.000 --> 00:00:02.500\\nhello world\"";

        let cues = parse_vtt(content).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "hello world");
        assert_eq!(cues[0].end, Duration::from_millis(2500));
    }

    #[test]
    fn test_cue_identifier_blocks_are_skipped() {
        let content = "WEBVTT\n\n\
            intro\n\
            00:00:01.000 --> 00:00:04.000\n\
            First entry\n\n\
            00:00:04.100 --> 00:00:08.000\n\
            Second entry";

        // the identifier pushes the timing off the first line, so that block
        // is dropped rather than misparsed
        let cues = parse_vtt(content).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Second entry");
    }

    #[test]
    fn test_mangled_timing_lines_are_skipped() {
        let content = "WEBVTT\n\n\
            00:00:01.000 --> 00:00:02.000 --> 00:00:03.000\n\
            doubled separator\n\n\
            00:00:04.100 --> 00:00:08.000\n\
            Second entry";

        let cues = parse_vtt(content).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].number, 1);
        assert_eq!(cues[0].text, "Second entry");
    }

    #[test]
    fn test_parse_timestamp_values() {
        let cases = [
            ("00:00:00.000", Duration::ZERO),
            ("00:00:01.000", Duration::from_secs(1)),
            ("01:00:00.000", Duration::from_secs(3600)),
            ("00:00:00.500", Duration::from_millis(500)),
            (
                "01:23:45.678",
                Duration::from_secs(3600 + 23 * 60 + 45) + Duration::from_millis(678),
            ),
        ];

        for (raw, want) in cases {
            assert_eq!(parse_timestamp(raw).unwrap(), want, "timestamp {}", raw);
        }
    }

    #[test]
    fn test_parse_timestamp_rejects_loose_forms() {
        // single-digit hours
        assert!(parse_timestamp("1:23:45.678").is_err());
        // missing milliseconds
        assert!(parse_timestamp("00:00:01").is_err());
        // missing hours entirely
        assert!(parse_timestamp("00:01.000").is_err());
    }

    #[test]
    fn test_flatten_and_format() {
        let cues = parse_vtt(
            "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nfirst\n\n00:00:04.000 --> 00:00:05.000\nsecond",
        )
        .unwrap();

        assert_eq!(flatten_cues(&cues), "first second");
        assert_eq!(format_timestamp(cues[0].start), "00:00:01.000");
        assert_eq!(
            format_timestamp(Duration::from_secs(3600 + 23 * 60 + 45) + Duration::from_millis(678)),
            "01:23:45.678"
        );
    }
}
