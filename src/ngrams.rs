//! N-gram extraction
//!
//! Sliding-window substrings of a word. Windows are measured in characters so a
//! multi-byte word never splits inside a code point.

/// Window lengths used for the published index.
pub const DEFAULT_WINDOWS: [usize; 2] = [2, 3];

/// Lazily yield every contiguous substring of each window length.
///
/// Order is length-ascending (in the order `windows` is given), then
/// left-to-right. Repeated substrings within one word are yielded each time
/// they occur; callers that only care about containment dedupe themselves.
pub fn ngrams<'a>(word: &'a str, windows: &'a [usize]) -> impl Iterator<Item = &'a str> + 'a {
    // Byte offset of every char boundary, including the end of the string.
    let boundaries: Vec<usize> = word
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(word.len()))
        .collect();
    let char_count = boundaries.len() - 1;

    windows
        .iter()
        .copied()
        .filter(|&n| n > 0)
        .flat_map(move |n| {
            let starts = if char_count >= n { char_count - n + 1 } else { 0 };
            let boundaries = boundaries.clone();
            (0..starts).map(move |i| &word[boundaries[i]..boundaries[i + n]])
        })
}

/// Extract with [`DEFAULT_WINDOWS`].
pub fn default_ngrams(word: &str) -> impl Iterator<Item = &str> {
    ngrams(word, &DEFAULT_WINDOWS)
}
