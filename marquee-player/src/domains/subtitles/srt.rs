use crate::error::{PlayerError, PlayerResult};
use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const WEBVTT_HEADER: &str = "WEBVTT";

static CUE_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(\d+):(\d{2}):(\d{2})[,.](\d{3})([ \t]*-->[ \t]*)(\d+):(\d{2}):(\d{2})[,.](\d{3})",
    )
    .expect("cue timing pattern is valid")
});

/// Convert SubRip text into a WebVTT document.
///
/// Timing lines switch from comma to period decimals and the `WEBVTT` header
/// is prepended. Cue numbers and cue text are left untouched; WebVTT treats
/// a numeric line before the timing as a cue identifier.
pub fn srt_to_vtt(input: &str) -> PlayerResult<String> {
    let text = normalize_line_endings(input.trim_start_matches('\u{feff}'));

    if text.trim_start().starts_with(WEBVTT_HEADER) {
        debug!("[Subtitles] Source is already WebVTT, passing through");
        return Ok(text);
    }

    let mut cues = 0usize;
    let body = CUE_TIMING.replace_all(&text, |caps: &Captures| {
        cues += 1;
        format!(
            "{:0>2}:{}:{}.{}{}{:0>2}:{}:{}.{}",
            &caps[1],
            &caps[2],
            &caps[3],
            &caps[4],
            &caps[5],
            &caps[6],
            &caps[7],
            &caps[8],
            &caps[9]
        )
    });

    if cues == 0 {
        return Err(PlayerError::SubtitleConversion(
            "no cue timing lines found".to_string(),
        ));
    }

    debug!("[Subtitles] Converted SRT with {} cues", cues);

    let mut output = String::with_capacity(body.len() + WEBVTT_HEADER.len() + 2);
    output.push_str(WEBVTT_HEADER);
    output.push_str("\n\n");
    output.push_str(body.trim_start_matches('\n'));
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\r\n00:00:01,000 --> 00:00:04,250\r\nHello, world\r\n\r\n2\r\n00:01:02,500 --> 00:01:05,000 X1:10 X2:20\r\n<i>Second</i> line\r\n";

    #[test]
    fn converts_timings_and_prepends_header() {
        let vtt = srt_to_vtt(SAMPLE).unwrap();
        assert!(vtt.starts_with("WEBVTT\n\n1\n00:00:01.000 --> 00:00:04.250\n"));
        assert!(vtt.contains("00:01:02.500 --> 00:01:05.000 X1:10 X2:20"));
        assert!(!vtt.contains('\r'));
    }

    #[test]
    fn commas_in_cue_text_survive() {
        let vtt = srt_to_vtt(SAMPLE).unwrap();
        assert!(vtt.contains("Hello, world"));
    }

    #[test]
    fn strips_byte_order_mark() {
        let input = format!("\u{feff}{SAMPLE}");
        let vtt = srt_to_vtt(&input).unwrap();
        assert!(vtt.starts_with(WEBVTT_HEADER));
    }

    #[test]
    fn pads_single_digit_hours() {
        let vtt = srt_to_vtt("1\n1:02:03,004 --> 1:02:05,000\nLate cue\n").unwrap();
        assert!(vtt.contains("01:02:03.004 --> 01:02:05.000"));
    }

    #[test]
    fn passes_existing_webvtt_through() {
        let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n";
        assert_eq!(srt_to_vtt(input).unwrap(), input);
    }

    #[test]
    fn rejects_text_without_cues() {
        let err = srt_to_vtt("this is not a subtitle file").unwrap_err();
        assert!(matches!(err, PlayerError::SubtitleConversion(_)));
        assert!(srt_to_vtt("").is_err());
    }
}
