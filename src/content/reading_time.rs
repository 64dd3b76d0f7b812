//! Reading time estimate

/// Average reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimated minutes to read `text`, never less than one.
pub fn reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    (words / WORDS_PER_MINUTE).max(1) as u32
}
