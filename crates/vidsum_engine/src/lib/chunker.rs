//! Deterministic transcript chunking.
//!
//! Long transcripts are split into size-bounded windows so each provider
//! call stays well inside the backend's context limit. Neighboring chunks
//! share a tail of words so no sentence loses its context at a boundary.

pub const DEFAULT_CHUNK_SIZE: usize = 7000;
pub const DEFAULT_OVERLAP: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

/// Splits `text` into ordered chunks of at most `chunk_size` characters.
///
/// Words are accumulated greedily; when the next word would push the
/// running length past `chunk_size` the chunk is closed and the next one
/// is seeded with the trailing `overlap / 10` words of the closed chunk.
/// The word-count seed is a coarse stand-in for "overlap characters". A
/// single word longer than `chunk_size` becomes a chunk on its own and is
/// the only case allowed to exceed the bound.
pub fn split(text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let overlap_words = overlap / 10;

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let added = if current.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };

        if !current.is_empty() && current_len + added > chunk_size {
            let seed_start = current.len() - overlap_words.min(current.len());
            let seed = current[seed_start..].to_vec();

            chunks.push(Chunk {
                index: chunks.len(),
                text: current.join(" "),
            });

            current_len = joined_len(&seed);
            current = seed;
        }

        if current.is_empty() {
            current_len = word.len();
        } else {
            current_len += word.len() + 1;
        }
        current.push(word);
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            index: chunks.len(),
            text: current.join(" "),
        });
    }

    chunks
}

fn joined_len(words: &[&str]) -> usize {
    if words.is_empty() {
        return 0;
    }
    words.iter().map(|w| w.len()).sum::<usize>() + words.len() - 1
}
