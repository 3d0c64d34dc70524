//! Splits change bodies into segments small enough for a single
//! summarization request.

#[derive(Debug, Clone, PartialEq, Eq)]
/// Contiguous slice of a change body.
pub struct Chunk {
    /// Zero based position among the chunks of the same body.
    pub index: usize,
    pub text: String,
}

impl Chunk {
    /// Number of characters (not bytes) in the chunk.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split `text` into chunks of at most `max_size` characters.
///
/// Chunks are contiguous and non-overlapping, so concatenating them in order
/// reproduces `text` exactly. Boundaries fall between characters, never inside
/// a multi-byte code point. Text no longer than `max_size`, including the
/// empty string, yields a single chunk. A `max_size` of zero is treated as
/// one.
pub fn chunk(text: &str, max_size: usize) -> Vec<Chunk> {
    let max_size = max_size.max(1);

    let mut chunks = vec![];
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_size {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }

    // remainder, or the whole text when it fits in one chunk
    if start < text.len() || chunks.is_empty() {
        chunks.push(&text[start..]);
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk {
            index,
            text: text.to_string(),
        })
        .collect()
}
