//! Overlapping word-window chunking.
//!
//! Window of `chunk_size` words, advancing by half the window each step, so
//! no phrase spanning a boundary is entirely lost to search. Costs roughly
//! 2x redundant index content; that trade is deliberate.

/// Split `text` into overlapping chunks of at most `chunk_size` words.
/// Deterministic: same input and size always produce the same chunks.
/// Empty chunks are skipped; empty input yields no chunks.
pub fn chunk_transcript(text: &str, chunk_size: usize) -> Vec<String> {
    let stride = (chunk_size / 2).max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::new();

    let mut start = 0;
    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        let chunk = words[start..end].join(" ");
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        start += stride;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(word_count: usize) -> String {
        (0..word_count)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn empty_and_whitespace_inputs_yield_no_chunks() {
        assert!(chunk_transcript("", 1000).is_empty());
        assert!(chunk_transcript("   \n\t ", 1000).is_empty());
    }

    #[test]
    fn short_transcript_is_one_chunk() {
        let chunks = chunk_transcript("Alice will send the report", 1000);
        assert_eq!(chunks, ["Alice will send the report"]);
    }

    #[test]
    fn chunk_count_matches_stride_walk() {
        // W words at stride chunk/2: one chunk per stride step from a start < W.
        for (words, size, expected) in [(2500, 1000, 5), (1000, 1000, 2), (999, 1000, 2), (500, 1000, 1)] {
            let chunks = chunk_transcript(&transcript(words), size);
            assert_eq!(chunks.len(), expected, "W={} size={}", words, size);
        }
    }

    #[test]
    fn chunking_is_deterministic() {
        let t = transcript(3210);
        assert_eq!(chunk_transcript(&t, 1000), chunk_transcript(&t, 1000));
    }

    #[test]
    fn adjacent_chunks_overlap_by_half_window() {
        let chunks = chunk_transcript(&transcript(2500), 1000);
        // Chunk i starts at word 500*i; chunk i+1 repeats its back half.
        let first: Vec<&str> = chunks[0].split(' ').collect();
        let second: Vec<&str> = chunks[1].split(' ').collect();
        assert_eq!(first.len(), 1000);
        assert_eq!(&first[500..], &second[..500]);
    }

    #[test]
    fn no_words_are_skipped() {
        let t = transcript(1234);
        let chunks = chunk_transcript(&t, 100);
        let mut seen = std::collections::HashSet::new();
        for c in &chunks {
            for w in c.split(' ') {
                seen.insert(w.to_string());
            }
        }
        assert_eq!(seen.len(), 1234);
    }
}
