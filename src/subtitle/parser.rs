use tracing::debug;

use super::{Block, BLOCK_SEPARATOR, Dialect, DialectRules, DialogueBlock, LineEnding};

/// Chunks shorter than this are never cues
const MIN_CHUNK_LINES: usize = 3;

/// Lines a cue needs from its timestamp onwards: the timestamp and one line of text
const MIN_CUE_LINES: usize = 2;

/// Split a subtitle document into blocks, in document order.
///
/// Empty and whitespace-only chunks are dropped; anything that does not parse
/// as a cue is kept as [`Block::Raw`]. CRLF input is read as LF.
pub fn parse(text: &str, dialect: Dialect) -> Vec<Block> {
    let rules = dialect.rules();
    let text = LineEnding::normalize(text);
    let mut blocks = Vec::new();

    for chunk in text.split(BLOCK_SEPARATOR) {
        if chunk.trim().is_empty() {
            continue;
        }

        if blocks.is_empty() && is_header(chunk, rules) {
            blocks.push(Block::Header(chunk.to_string()));
            continue;
        }

        blocks.push(parse_chunk(chunk, rules));
    }

    blocks
}

fn is_header(chunk: &str, rules: &dyn DialectRules) -> bool {
    rules
        .header_token()
        .is_some_and(|token| chunk.trim().starts_with(token))
}

fn parse_chunk(chunk: &str, rules: &dyn DialectRules) -> Block {
    let lines: Vec<&str> = chunk.trim().split('\n').collect();
    let offset = rules.timestamp_offset(&lines);

    if lines.len() < MIN_CHUNK_LINES || lines.len().saturating_sub(offset) < MIN_CUE_LINES {
        debug!(
            dialect = %rules.dialect(),
            lines = lines.len(),
            "Keeping unparseable subtitle chunk verbatim"
        );
        return Block::Raw(chunk.to_string());
    }

    Block::Dialogue(DialogueBlock::new(
        rules.sequence_number(&lines),
        lines[offset],
        lines[offset + 1..].join("\n"),
        chunk,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\n00:00:00,000 --> 00:00:02,000\nmain kya kar raha hoon\n\n\
                       2\n00:00:02,000 --> 00:00:04,000\nthis is english\nsecond line";

    fn dialogue(block: &Block) -> &DialogueBlock {
        block.as_dialogue().expect("expected a dialogue block")
    }

    #[test]
    fn test_parse_srt_blocks() {
        let blocks = parse(SRT, Dialect::Srt);
        assert_eq!(blocks.len(), 2);

        let first = dialogue(&blocks[0]);
        assert_eq!(first.sequence().map(|s| s.value()), Some(1));
        assert_eq!(first.timestamp(), "00:00:00,000 --> 00:00:02,000");
        assert_eq!(first.text, "main kya kar raha hoon");

        let second = dialogue(&blocks[1]);
        assert_eq!(second.sequence().map(|s| s.source()), Some("2"));
        assert_eq!(second.text, "this is english\nsecond line");
        assert_eq!(
            second.original(),
            "2\n00:00:02,000 --> 00:00:04,000\nthis is english\nsecond line"
        );
    }

    #[test]
    fn test_short_srt_chunk_is_raw() {
        let blocks = parse("1\n00:00:00,000 --> 00:00:02,000", Dialect::Srt);
        assert_eq!(blocks, vec![Block::Raw("1\n00:00:00,000 --> 00:00:02,000".to_string())]);
    }

    #[test]
    fn test_blank_chunks_are_dropped() {
        let text = "\n\n1\n00:00:00,000 --> 00:00:01,000\nhi\n\n   \n\n";
        let blocks = parse(text, Dialect::Srt);
        assert_eq!(blocks.len(), 1);
        assert_eq!(dialogue(&blocks[0]).text, "hi");
    }

    #[test]
    fn test_srt_without_number_has_no_sequence() {
        let blocks = parse("one\n00:00:00,000 --> 00:00:01,000\nhi", Dialect::Srt);
        let block = dialogue(&blocks[0]);
        assert!(block.sequence().is_none());
        assert_eq!(block.timestamp(), "00:00:00,000 --> 00:00:01,000");
    }

    #[test]
    fn test_vtt_header_is_first_block_only() {
        let text = "WEBVTT\n\n00:00.000 --> 00:02.000\nnamaste dosto\nkaise ho\n\nWEBVTT again\nx\ny";
        let blocks = parse(text, Dialect::Vtt);

        assert_eq!(blocks[0], Block::Header("WEBVTT".to_string()));
        assert_eq!(dialogue(&blocks[1]).text, "namaste dosto\nkaise ho");
        // A later chunk starting with the token is ordinary content
        assert!(!matches!(blocks[2], Block::Header(_)));
    }

    #[test]
    fn test_vtt_cue_identifier_is_skipped() {
        let text = "WEBVTT\n\ncue-1\n00:00.000 --> 00:02.000\nshukriya";
        let blocks = parse(text, Dialect::Vtt);
        let cue = dialogue(&blocks[1]);
        assert_eq!(cue.timestamp(), "00:00.000 --> 00:02.000");
        assert_eq!(cue.text, "shukriya");
        assert!(cue.sequence().is_none());
    }

    #[test]
    fn test_vtt_two_line_cue_is_raw() {
        let text = "WEBVTT\n\n00:00.000 --> 00:02.000\nshukriya";
        let blocks = parse(text, Dialect::Vtt);
        assert_eq!(blocks[1], Block::Raw("00:00.000 --> 00:02.000\nshukriya".to_string()));
    }

    #[test]
    fn test_srt_header_token_is_not_special() {
        let blocks = parse("WEBVTT\n\n1\n00:00:00,000 --> 00:00:01,000\nhi", Dialect::Srt);
        assert_eq!(blocks[0], Block::Raw("WEBVTT".to_string()));
    }

    #[test]
    fn test_crlf_srt_keeps_sequence_numbers() {
        let text = "1\r\n00:00:00,000 --> 00:00:02,000\r\nmain kya\r\n\r\n\
                    2\r\n00:00:02,000 --> 00:00:04,000\r\nthis is english\r\n";
        let blocks = parse(text, Dialect::Srt);

        assert_eq!(blocks.len(), 2);
        assert_eq!(dialogue(&blocks[0]).sequence().map(|s| s.source()), Some("1"));
        assert_eq!(dialogue(&blocks[0]).text, "main kya");
        assert_eq!(dialogue(&blocks[1]).timestamp(), "00:00:02,000 --> 00:00:04,000");
        assert_eq!(dialogue(&blocks[1]).text, "this is english");
    }

    #[test]
    fn test_empty_document() {
        assert!(parse("", Dialect::Srt).is_empty());
        assert!(parse("\n\n\n", Dialect::Vtt).is_empty());
    }
}
