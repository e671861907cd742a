use anyhow::Result;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Chunk {
    pub index: usize,
    pub content: String,
    pub word_count: usize,
}

pub struct TextChunker {
    max_words: usize,
    overlap_words: usize,
}

impl TextChunker {
    pub fn new(max_words: usize, overlap_words: usize) -> Self {
        Self {
            max_words,
            overlap_words,
        }
    }

    /// Split text into fixed-size overlapping windows of whitespace-split
    /// words. The last `overlap_words` of a chunk are repeated at the start
    /// of the next one.
    pub fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        let words: Vec<&str> = text.split_whitespace().collect();

        if words.is_empty() {
            return Ok(Vec::new());
        }

        if self.max_words == 0 || self.overlap_words >= self.max_words {
            anyhow::bail!(
                "Invalid chunking parameters: max_words={}, overlap_words={}",
                self.max_words,
                self.overlap_words
            );
        }

        debug!("Chunking text: {} words", words.len());

        let step = self.max_words - self.overlap_words;
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut index = 0;

        while start < words.len() {
            let end = (start + self.max_words).min(words.len());

            chunks.push(Chunk {
                index,
                content: words[start..end].join(" "),
                word_count: end - start,
            });

            if end >= words.len() {
                break;
            }

            index += 1;
            start += step;
        }

        debug!("Created {} chunks", chunks.len());

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(200, 20);
        assert!(chunker.chunk("").unwrap().is_empty());
        assert!(chunker.chunk("  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn short_text_single_chunk() {
        let chunker = TextChunker::new(200, 20);
        let chunks = chunker.chunk("just a few words").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].content, "just a few words");
        assert_eq!(chunks[0].word_count, 4);
    }

    #[test]
    fn windows_overlap_by_configured_amount() {
        let chunker = TextChunker::new(10, 3);
        let chunks = chunker.chunk(&words(25)).unwrap();

        // step = 7: windows start at 0, 7, 14, 21
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].word_count, 10);
        assert_eq!(chunks[1].word_count, 10);
        assert_eq!(chunks[3].word_count, 4);

        // Last 3 words of chunk 0 are the first 3 of chunk 1
        let tail: Vec<&str> = chunks[0].content.split(' ').skip(7).collect();
        let head: Vec<&str> = chunks[1].content.split(' ').take(3).collect();
        assert_eq!(tail, head);
    }

    #[test]
    fn exact_window_size_is_one_chunk() {
        let chunker = TextChunker::new(10, 3);
        let chunks = chunker.chunk(&words(10)).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn indexes_are_sequential() {
        let chunker = TextChunker::new(5, 1);
        let chunks = chunker.chunk(&words(20)).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn overlap_must_be_smaller_than_window() {
        let chunker = TextChunker::new(5, 5);
        assert!(chunker.chunk("some words here").is_err());
    }
}
