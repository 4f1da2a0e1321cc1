// Subtitle document model
//
// A document is split into blank-line separated chunks, each classified as a
// header, a dialogue cue or a raw chunk that is carried through untouched:
// - dialect: per-format parsing and rendering rules (SRT, WebVTT)
// - parser: text -> blocks
// - writer: blocks -> text

pub mod dialect;
pub mod parser;
pub mod writer;

use std::borrow::Cow;
use std::path::Path;

pub use dialect::DialectRules;
pub use parser::parse;
pub use writer::reconstruct;

/// Separator between blocks, used both to split and to join documents
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Marker separating start and end time on a timestamp line
pub const TIME_RANGE_MARKER: &str = "-->";

/// Leading token of a WebVTT document header
pub const VTT_HEADER_TOKEN: &str = "WEBVTT";

/// Structural convention of a subtitle document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Numbered cues: `seq\ntimestamp\ntext...`, no header
    Srt,
    /// Unnumbered cues: `timestamp\ntext...`, optionally preceded by a `WEBVTT` header
    Vtt,
}

impl Dialect {
    /// Rules for this dialect, selected once per document.
    pub fn rules(self) -> &'static dyn DialectRules {
        match self {
            Dialect::Srt => &dialect::SrtRules,
            Dialect::Vtt => &dialect::VttRules,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Srt => "srt",
            Dialect::Vtt => "vtt",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Some(Dialect::Srt),
            "vtt" => Some(Dialect::Vtt),
            _ => None,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Line terminator of a document, detected once before parsing.
///
/// Blocks are always handled with `\n`; CRLF documents are normalized on the
/// way in and restored on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn normalize(text: &str) -> Cow<'_, str> {
        if text.contains("\r\n") {
            Cow::Owned(text.replace("\r\n", "\n"))
        } else {
            Cow::Borrowed(text)
        }
    }

    pub fn restore(self, text: String) -> String {
        match self {
            LineEnding::Lf => text,
            LineEnding::CrLf => text.replace('\n', "\r\n"),
        }
    }
}

/// Cue number of an SRT block, kept together with its source text so the
/// line is written back exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceNumber {
    value: u64,
    source: String,
}

impl SequenceNumber {
    /// Parse a line consisting only of ASCII digits.
    ///
    /// `0` is accepted: some tools number cues from zero, and rejecting it
    /// would drop the line from the rebuilt document.
    pub fn parse(line: &str) -> Option<Self> {
        if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value = line.parse().ok()?;
        Some(Self {
            value,
            source: line.to_string(),
        })
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A cue carrying a timestamp line and the spoken text.
///
/// Only `text` may change during translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueBlock {
    sequence: Option<SequenceNumber>,
    timestamp: String,
    pub text: String,
    original: String,
}

impl DialogueBlock {
    pub fn new(
        sequence: Option<SequenceNumber>,
        timestamp: impl Into<String>,
        text: impl Into<String>,
        original: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            timestamp: timestamp.into(),
            text: text.into(),
            original: original.into(),
        }
    }

    pub fn sequence(&self) -> Option<&SequenceNumber> {
        self.sequence.as_ref()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The chunk this block was parsed from, exactly as it appeared in the document.
    pub fn original(&self) -> &str {
        &self.original
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Document header (WebVTT only), never translated
    Header(String),
    Dialogue(DialogueBlock),
    /// Chunk that did not parse as a cue, preserved verbatim
    Raw(String),
}

impl Block {
    pub fn as_dialogue(&self) -> Option<&DialogueBlock> {
        match self {
            Block::Dialogue(dialogue) => Some(dialogue),
            _ => None,
        }
    }

    pub fn as_dialogue_mut(&mut self) -> Option<&mut DialogueBlock> {
        match self {
            Block::Dialogue(dialogue) => Some(dialogue),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_number_parse() {
        let seq = SequenceNumber::parse("0042").unwrap();
        assert_eq!(seq.value(), 42);
        assert_eq!(seq.source(), "0042");

        assert!(SequenceNumber::parse("").is_none());
        assert!(SequenceNumber::parse("12a").is_none());
        assert!(SequenceNumber::parse(" 1").is_none());
        assert!(SequenceNumber::parse("-1").is_none());
    }

    #[test]
    fn test_zero_based_sequence_is_kept() {
        let seq = SequenceNumber::parse("0").unwrap();
        assert_eq!(seq.value(), 0);
        assert_eq!(seq.source(), "0");
    }

    #[test]
    fn test_line_ending_roundtrip() {
        let crlf = "1\r\n00:00:00,000 --> 00:00:01,000\r\nhi\r\n";
        let ending = LineEnding::detect(crlf);
        assert_eq!(ending, LineEnding::CrLf);

        let normalized = LineEnding::normalize(crlf);
        assert_eq!(normalized, "1\n00:00:00,000 --> 00:00:01,000\nhi\n");
        assert_eq!(ending.restore(normalized.into_owned()), crlf);

        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);
        assert!(matches!(LineEnding::normalize("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(Dialect::from_path("movie.srt"), Some(Dialect::Srt));
        assert_eq!(Dialect::from_path("movie.VTT"), Some(Dialect::Vtt));
        assert_eq!(Dialect::from_path("movie.ass"), None);
        assert_eq!(Dialect::from_path("movie"), None);
    }
}
