//! Overlapping fixed-size text chunking

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// Splits normalized text into overlapping character windows
///
/// Successive chunks start `chunk_size - overlap` characters apart, so an
/// answer spanning a chunk boundary is still fully present in at least one
/// chunk. Chunk ends may be pulled back to whitespace; the pullback is capped
/// at the overlap so every character still lands in some chunk.
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
    snap_to_whitespace: bool,
    snap_window: usize,
}

impl TextChunker {
    /// Create a chunker, rejecting a stride that would not advance
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        if config.chunk_size <= config.overlap {
            return Err(Error::invalid_configuration(format!(
                "chunk_size ({}) must be greater than overlap ({})",
                config.chunk_size, config.overlap
            )));
        }

        Ok(Self {
            chunk_size: config.chunk_size,
            overlap: config.overlap,
            snap_to_whitespace: config.snap_to_whitespace,
            snap_window: config.snap_window.min(config.overlap),
        })
    }

    /// Chunk text into an ordered sequence; empty input yields no chunks
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let stride = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut position = 0u32;

        while start < chars.len() {
            let target_end = (start + self.chunk_size).min(chars.len());
            let end = if self.snap_to_whitespace && target_end < chars.len() {
                self.snap_back(&chars, start, target_end)
            } else {
                target_end
            };

            chunks.push(Chunk::new(position, chars[start..end].iter().collect()));
            position += 1;

            if target_end == chars.len() {
                break;
            }
            start += stride;
        }

        chunks
    }

    /// Pull a chunk end back to just after the nearest whitespace
    ///
    /// Looks back at most `snap_window` characters; hard cut when no
    /// whitespace is nearby or the window would empty the chunk.
    fn snap_back(&self, chars: &[char], start: usize, target_end: usize) -> usize {
        let window_start = target_end.saturating_sub(self.snap_window).max(start + 1);

        for end in (window_start..=target_end).rev() {
            if chars[end - 1].is_whitespace() {
                return end;
            }
        }

        target_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_size: usize, overlap: usize, snap: bool) -> TextChunker {
        TextChunker::new(&ChunkingConfig {
            chunk_size,
            overlap,
            snap_to_whitespace: snap,
            snap_window: 32,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunker(500, 50, true).chunk("").is_empty());
    }

    #[test]
    fn test_chunk_size_must_exceed_overlap() {
        let config = ChunkingConfig {
            chunk_size: 50,
            overlap: 50,
            snap_to_whitespace: false,
            snap_window: 0,
        };
        assert!(matches!(
            TextChunker::new(&config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunker(500, 50, true).chunk("short text");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short text");
        assert_eq!(chunks[0].position, 0);
    }

    #[test]
    fn test_full_coverage_without_snapping() {
        let text: String = (0..1237).map(|i| ((b'a' + (i % 26) as u8) as char)).collect();
        let chunks = chunker(100, 20, false).chunk(&text);

        // every character appears in at least one chunk
        let mut covered = vec![false; text.len()];
        let stride = 80;
        for (i, chunk) in chunks.iter().enumerate() {
            let start = i * stride;
            assert_eq!(&text[start..start + chunk.text.len()], chunk.text);
            for flag in covered[start..start + chunk.text.len()].iter_mut() {
                *flag = true;
            }
        }
        assert!(covered.iter().all(|&c| c));

        // count ~= ceil(len / stride)
        let expected = text.len().div_ceil(stride);
        assert!(chunks.len() == expected || chunks.len() == expected - 1);
    }

    #[test]
    fn test_full_coverage_with_snapping() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(40);
        let chunks = chunker(100, 20, true).chunk(&text);

        let stride = 80;
        for (i, chunk) in chunks.iter().enumerate() {
            let start = i * stride;
            // snapped end never retreats past the next chunk's start
            assert!(chunk.text.len() >= 100 - 20 || start + chunk.text.len() == text.len());
            assert_eq!(&text[start..start + chunk.text.len()], chunk.text);
        }
        let last = chunks.last().unwrap();
        assert_eq!(
            (chunks.len() - 1) * stride + last.text.len(),
            text.len(),
            "last chunk must reach the end of the text"
        );
    }

    #[test]
    fn test_snapping_ends_on_whitespace() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let chunks = chunker(20, 8, true).chunk(&text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.text.ends_with(' '),
                "chunk {:?} should end at whitespace",
                chunk.text
            );
        }
    }

    #[test]
    fn test_hard_cut_when_no_whitespace_nearby() {
        let text = "x".repeat(250);
        let chunks = chunker(100, 20, true).chunk(&text);
        assert_eq!(chunks[0].text.len(), 100);
    }

    #[test]
    fn test_positions_are_sequential() {
        let text = "word ".repeat(300);
        let chunks = chunker(100, 20, true).chunk(&text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, i as u32);
            assert_eq!(chunk.id, i as u32);
        }
    }

    #[test]
    fn test_overlap_repeats_boundary_text() {
        let text: String = (0..300).map(|i| ((b'a' + (i % 26) as u8) as char)).collect();
        let chunks = chunker(100, 20, false).chunk(&text);
        let first = &chunks[0].text;
        let second = &chunks[1].text;
        assert_eq!(&first[80..], &second[..20]);
    }
}
