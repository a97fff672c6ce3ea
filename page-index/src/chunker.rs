//! Document splitting: paragraph-aware chunks with character bounds and
//! trailing overlap.

use crate::structs::index_config::ChunkConfig;

/// Splits `text` into chunks of at most `cfg.max_chars` characters.
///
/// Paragraph boundaries (blank lines) are preferred split points; a paragraph
/// longer than the limit is split on char boundaries with `cfg.overlap_chars`
/// of trailing context carried into the next piece. Chunks shorter than
/// `cfg.min_chars` are dropped.
pub fn split_into_chunks(text: &str, cfg: &ChunkConfig) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if paragraph.chars().count() > cfg.max_chars {
            flush(&mut chunks, &mut current, cfg);
            split_long_paragraph(paragraph, cfg, &mut chunks);
            continue;
        }

        let need = paragraph.chars().count() + if current.is_empty() { 0 } else { 2 };
        if current.chars().count() + need > cfg.max_chars {
            flush(&mut chunks, &mut current, cfg);
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    flush(&mut chunks, &mut current, cfg);
    chunks
}

fn flush(chunks: &mut Vec<String>, current: &mut String, cfg: &ChunkConfig) {
    let piece = current.trim();
    if piece.chars().count() >= cfg.min_chars {
        chunks.push(piece.to_string());
    }
    current.clear();
}

/// Hard-splits an oversize paragraph on char boundaries with overlap.
fn split_long_paragraph(paragraph: &str, cfg: &ChunkConfig, chunks: &mut Vec<String>) {
    let chars: Vec<char> = paragraph.chars().collect();
    let step = cfg.max_chars.saturating_sub(cfg.overlap_chars).max(1);

    let mut start = 0usize;
    while start < chars.len() {
        let end = (start + cfg.max_chars).min(chars.len());
        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim().to_string();
        if piece.chars().count() >= cfg.min_chars {
            chunks.push(piece);
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(max: usize, min: usize, overlap: usize) -> ChunkConfig {
        ChunkConfig {
            max_chars: max,
            min_chars: min,
            overlap_chars: overlap,
        }
    }

    #[test]
    fn short_text_becomes_one_chunk() {
        let chunks = split_into_chunks("Example Domain. Illustrative examples.", &cfg(1000, 4, 100));
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn paragraphs_pack_up_to_the_limit() {
        let text = "first paragraph here\n\nsecond paragraph here\n\nthird paragraph here";
        let chunks = split_into_chunks(text, &cfg(45, 4, 5));
        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 45));
    }

    #[test]
    fn oversize_paragraph_is_split_with_overlap() {
        let long = "a".repeat(250);
        let chunks = split_into_chunks(&long, &cfg(100, 4, 20));
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
    }

    #[test]
    fn tiny_fragments_are_dropped() {
        let chunks = split_into_chunks("ok", &cfg(100, 10, 5));
        assert!(chunks.is_empty());
    }
}
