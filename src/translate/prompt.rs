use once_cell::sync::Lazy;
use regex::Regex;

/// Token separating subtitle segments in both request and response
pub const SEGMENT_TOKEN: &str = "---SUBTITLE---";

/// System message sent alongside every batch
pub const SYSTEM_MESSAGE: &str =
    "You are a translation assistant. Do not use internet search. Respond only with translations.";

const INSTRUCTIONS: &str = "\
DO NOT use internet search. Use only your internal knowledge for this translation task.

Convert the following subtitle texts to Hinglish (a natural mix of Hindi and English).

CRITICAL RULES:
1. ONLY translate words that are clearly Hindi/Urdu/regional language words to Devanagari script
2. Keep ALL English words in English - do NOT transliterate English words to Devanagari
3. If a word seems like it could be English (even if mispronounced in audio), keep it in English
4. Examples of what to do:
   - \"do you have a peela shawl\" → \"do you have a पीला shawl\"
   - \"main kya talking about\" → \"मैं क्या talking about\"
   - \"it's very sundar\" → \"it's very सुंदर\"
5. Common English words MUST stay in English: why, is, talking, have, do, what, where, when, how, etc.
6. If you're unsure whether a word is Hindi or English, keep it in English
7. Make it sound natural, like how people actually speak Hinglish in conversations
8. Preserve the numbering [1], [2], etc. for each subtitle
9. Separate each translated subtitle with ---SUBTITLE---
10. ONLY return the translated texts with their numbers, nothing else";

static INDEX_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\d+\]\s*").unwrap());

// A blank line inside a segment would split the cue when the document is rebuilt
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Number each text from 1 and join them with the segment token.
pub fn build_batch(texts: &[&str]) -> String {
    let separator = format!("\n{}\n", SEGMENT_TOKEN);
    texts
        .iter()
        .enumerate()
        .map(|(idx, text)| format!("[{}] {}", idx + 1, text))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Full user prompt for a batch of dialogue texts.
pub fn build_prompt(texts: &[&str]) -> String {
    format!(
        "{}\n\nSubtitles to convert:\n{}",
        INSTRUCTIONS,
        build_batch(texts)
    )
}

/// Split a provider reply into translated texts, in reply order.
///
/// `[N]` tags are stripped but not interpreted. Line endings are normalized
/// to `\n` and blank lines inside a segment are collapsed, so every segment
/// stays a single cue body.
pub fn parse_response(response: &str) -> Vec<String> {
    response
        .replace("\r\n", "\n")
        .trim()
        .split(SEGMENT_TOKEN)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let text = INDEX_TAG.replace(part, "");
            BLANK_LINES.replace_all(text.trim(), "\n").into_owned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_batch() {
        let batch = build_batch(&["main kya kar raha hoon", "this is english\nline two"]);
        assert_eq!(
            batch,
            "[1] main kya kar raha hoon\n---SUBTITLE---\n[2] this is english\nline two"
        );
    }

    #[test]
    fn test_prompt_ends_with_batch() {
        let prompt = build_prompt(&["accha"]);
        assert!(prompt.starts_with("DO NOT use internet search."));
        assert!(prompt.ends_with("Subtitles to convert:\n[1] accha"));
    }

    #[test]
    fn test_parse_response_strips_tags() {
        let parsed = parse_response("[1] मैं क्या कर रहा हूँ\n---SUBTITLE---\n[2] this is english");
        assert_eq!(parsed, vec!["मैं क्या कर रहा हूँ", "this is english"]);
    }

    #[test]
    fn test_parse_response_tolerates_missing_tags_and_blank_segments() {
        let parsed = parse_response("\n  accha ---SUBTITLE------SUBTITLE---\n[12]   theek hai \n");
        assert_eq!(parsed, vec!["accha", "theek hai"]);
    }

    #[test]
    fn test_tag_only_segment_becomes_empty_text() {
        assert_eq!(parse_response("[1]\n---SUBTITLE---\n[2] b"), vec!["", "b"]);
    }

    #[test]
    fn test_blank_lines_inside_segment_are_collapsed() {
        let parsed = parse_response("[1] pehli line\n\n \n\ndoosri line\n---SUBTITLE---\n[2] teesri\r\n\r\nchauthi");
        assert_eq!(parsed, vec!["pehli line\ndoosri line", "teesri\nchauthi"]);
    }

    #[test]
    fn test_inner_brackets_are_kept() {
        assert_eq!(parse_response("[3] [music] gaana"), vec!["[music] gaana"]);
        assert_eq!(parse_response("text [4] here"), vec!["text [4] here"]);
    }
}
