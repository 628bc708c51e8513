//! Splitting source documents into retrievable chunks.
//!
//! Paragraphs (blank-line separated) are packed into chunks up to a target
//! size. A paragraph that alone exceeds the target is cut on character
//! boundaries with a small overlap so sentences split across the cut stay
//! findable.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A chunk of text from a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    pub content: String,
    /// Order of this chunk in the source.
    pub order: i32,
}

/// Paragraph-aligned text chunker.
#[derive(Debug, Clone)]
pub struct TextChunker {
    max_chars: usize,
    overlap: usize,
}

fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t\u{3000}]*\n").expect("valid paragraph regex"))
}

impl TextChunker {
    /// Create a chunker. `overlap` is clamped below `max_chars`.
    pub fn new(max_chars: usize, overlap: usize) -> Self {
        let max_chars = max_chars.max(1);
        Self {
            max_chars,
            overlap: overlap.min(max_chars - 1),
        }
    }

    /// Split `text` into chunks, in document order.
    pub fn chunk(&self, text: &str) -> Vec<ContentChunk> {
        let text = text.replace("\r\n", "\n");
        let mut pieces: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for paragraph in paragraph_break().split(&text) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            let len = paragraph.chars().count();

            if len > self.max_chars {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                pieces.extend(self.split_long(paragraph));
                continue;
            }

            // +2 for the blank line joining paragraphs
            if !current.is_empty() && current_len + 2 + len > self.max_chars {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push_str("\n\n");
                current_len += 2;
            }
            current.push_str(paragraph);
            current_len += len;
        }

        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
            .into_iter()
            .enumerate()
            .map(|(i, content)| ContentChunk {
                content,
                order: i as i32,
            })
            .collect()
    }

    fn split_long(&self, paragraph: &str) -> Vec<String> {
        let chars: Vec<char> = paragraph.chars().collect();
        let step = self.max_chars - self.overlap;
        let mut out = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.max_chars).min(chars.len());
            let piece: String = chars[start..end].iter().collect();
            let piece = piece.trim();
            if !piece.is_empty() {
                out.push(piece.to_string());
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packs_short_paragraphs() {
        let chunker = TextChunker::new(30, 0);
        let chunks = chunker.chunk("alpha\n\nbeta\n\ngamma delta epsilon zeta");

        let contents: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["alpha\n\nbeta", "gamma delta epsilon zeta"]);
        assert_eq!(chunks[1].order, 1);
    }

    #[test]
    fn test_long_paragraph_is_split_with_overlap() {
        let chunker = TextChunker::new(10, 3);
        let chunks = chunker.chunk("abcdefghijklmnopqrst");

        assert_eq!(chunks[0].content, "abcdefghij");
        assert_eq!(chunks[1].content, "hijklmnopq");
        assert_eq!(chunks[2].content, "opqrst");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let chunker = TextChunker::new(4, 0);
        let chunks = chunker.chunk("教務處\n\n註冊組");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "教務處");
    }

    #[test]
    fn test_blank_input_and_whitespace_paragraph_breaks() {
        let chunker = TextChunker::new(100, 10);
        assert!(chunker.chunk("  \n\n \r\n").is_empty());

        let chunks = chunker.chunk("one\r\n  \r\ntwo");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "one\n\ntwo");
    }

    #[test]
    fn test_overlap_clamped() {
        let chunker = TextChunker::new(5, 50);
        let chunks = chunker.chunk("abcdefghij");
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.content.chars().count() <= 5));
    }
}
