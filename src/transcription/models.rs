//! Data models for transcription.

/// A single segment of a transcript, the text for exactly one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    /// Position of the source chunk, starting at 0.
    pub index: usize,
    /// Transcribed (and possibly refined) text content.
    pub text: String,
}

/// The ordered transcript of one input file.
///
/// Segments are held in chunk order; `render` produces the persisted
/// artifact, each segment followed by a single line break.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// File stem of the source recording.
    pub source: String,
    /// Per-chunk segments in chunk order.
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Build a transcript from per-chunk texts in chunk order.
    pub fn from_segments(source: impl Into<String>, texts: Vec<String>) -> Self {
        let segments = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| TranscriptSegment { index, text })
            .collect();

        Self {
            source: source.into(),
            segments,
        }
    }

    /// Number of segments, equal to the source chunk count.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether the transcript holds no segments (zero-duration input).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render the persisted form: each segment followed by one `\n`.
    pub fn render(&self) -> String {
        self.segments.iter().fold(String::new(), |mut out, segment| {
            out.push_str(&segment.text);
            out.push('\n');
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_keep_chunk_order() {
        let transcript = Transcript::from_segments(
            "standup",
            vec!["first".to_string(), "second".to_string(), "third".to_string()],
        );

        assert_eq!(transcript.source, "standup");
        assert_eq!(transcript.segment_count(), 3);
        let indexes: Vec<usize> = transcript.segments.iter().map(|s| s.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_render_joins_segments_with_trailing_newlines() {
        let transcript = Transcript::from_segments(
            "memo",
            vec!["Hello world.".to_string(), "This is a test.".to_string()],
        );

        assert_eq!(transcript.render(), "Hello world.\nThis is a test.\n");
    }

    #[test]
    fn test_empty_transcript_renders_empty() {
        let transcript = Transcript::from_segments("silence", Vec::new());
        assert!(transcript.is_empty());
        assert_eq!(transcript.render(), "");
    }

    #[test]
    fn test_render_round_trips_segment_count() {
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let transcript = Transcript::from_segments("memo", texts.clone());

        let rendered = transcript.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), transcript.segment_count());
        assert_eq!(lines, texts.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
