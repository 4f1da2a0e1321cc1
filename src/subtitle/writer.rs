use tracing::warn;

use super::{Block, BLOCK_SEPARATOR, Dialect};

/// Reassemble blocks into a document of the given dialect.
pub fn reconstruct(blocks: &[Block], dialect: Dialect) -> String {
    let rules = dialect.rules();
    let mut header = None;
    let mut emitted = Vec::with_capacity(blocks.len());

    for block in blocks {
        match block {
            Block::Header(content) => {
                header = Some(content.as_str());
                if let Some(content) = rules.emit_header(content) {
                    emitted.push(content.to_string());
                }
            }
            Block::Raw(chunk) => emitted.push(chunk.clone()),
            Block::Dialogue(dialogue) => emitted.push(rules.render_dialogue(dialogue)),
        }
    }

    let document = emitted.join(BLOCK_SEPARATOR);

    // The header must lead the document even if blocks were reordered upstream
    match (header, rules.header_token()) {
        (Some(header), Some(token)) if !document.trim_start().starts_with(token) => {
            warn!("Subtitle header was not the first block, moving it to the front");
            format!("{}{}{}", header, BLOCK_SEPARATOR, document)
        }
        _ => document,
    }
}
