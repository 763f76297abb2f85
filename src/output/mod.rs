use crate::transcribe::{vtt, ResponseFormat, TranscriptionResult};

/// Render the user-facing result block.
///
/// The first line always reads `Transcription result: <text>`. When the
/// result carries timed cues they follow, one per line.
pub fn render_result(result: &TranscriptionResult) -> String {
    let mut out = format!("Transcription result: {}", result.text);

    if result.format == ResponseFormat::Vtt && !result.cues.is_empty() {
        out.push('\n');
        for cue in &result.cues {
            out.push('\n');
            out.push_str(&format!(
                "  [{} --> {}] {}",
                vtt::format_timestamp(cue.start),
                vtt::format_timestamp(cue.end),
                cue.text
            ));
        }
    }

    out
}

/// Print transcription result to console
pub fn print_result(result: &TranscriptionResult) {
    println!("{}", render_result(result));
}
