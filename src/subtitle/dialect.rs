use super::{Dialect, DialogueBlock, SequenceNumber, TIME_RANGE_MARKER, VTT_HEADER_TOKEN};

/// Per-dialect structural rules shared by the parser and the writer
pub trait DialectRules: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Token that marks the first chunk as a document header, if the dialect has one
    fn header_token(&self) -> Option<&'static str>;

    /// Index of the timestamp line within a chunk's lines
    fn timestamp_offset(&self, lines: &[&str]) -> usize;

    /// Cue number carried on the chunk's first line, if the dialect numbers cues
    fn sequence_number(&self, lines: &[&str]) -> Option<SequenceNumber>;

    /// Header content to emit, or `None` to drop it
    fn emit_header<'a>(&self, content: &'a str) -> Option<&'a str>;

    fn render_dialogue(&self, block: &DialogueBlock) -> String;
}

/// Numbered blocks: line 0 is the cue number, line 1 the timestamp
pub struct SrtRules;

/// Header-prefixed blocks: line 0 is the timestamp, unless it is a cue identifier
pub struct VttRules;

fn timed_text(block: &DialogueBlock) -> String {
    format!("{}\n{}", block.timestamp(), block.text)
}

impl DialectRules for SrtRules {
    fn dialect(&self) -> Dialect {
        Dialect::Srt
    }

    fn header_token(&self) -> Option<&'static str> {
        None
    }

    fn timestamp_offset(&self, _lines: &[&str]) -> usize {
        1
    }

    fn sequence_number(&self, lines: &[&str]) -> Option<SequenceNumber> {
        lines.first().and_then(|line| SequenceNumber::parse(line))
    }

    fn emit_header<'a>(&self, _content: &'a str) -> Option<&'a str> {
        None
    }

    fn render_dialogue(&self, block: &DialogueBlock) -> String {
        match block.sequence() {
            Some(seq) => format!("{}\n{}", seq.source(), timed_text(block)),
            // Unnumbered cue: keep the timing, lose nothing else
            None => timed_text(block),
        }
    }
}

impl DialectRules for VttRules {
    fn dialect(&self) -> Dialect {
        Dialect::Vtt
    }

    fn header_token(&self) -> Option<&'static str> {
        Some(VTT_HEADER_TOKEN)
    }

    fn timestamp_offset(&self, lines: &[&str]) -> usize {
        match lines.first() {
            Some(first) if !first.contains(TIME_RANGE_MARKER) => 1,
            _ => 0,
        }
    }

    fn sequence_number(&self, _lines: &[&str]) -> Option<SequenceNumber> {
        None
    }

    fn emit_header<'a>(&self, content: &'a str) -> Option<&'a str> {
        Some(content)
    }

    fn render_dialogue(&self, block: &DialogueBlock) -> String {
        timed_text(block)
    }
}
