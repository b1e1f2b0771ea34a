//! Unicode character cell width calculations.
//!
//! The reference [`MonospaceMeasurer`](crate::measure::MonospaceMeasurer)
//! models text as a grid of fixed-advance character cells. Most characters
//! occupy one cell, CJK characters and many emoji occupy two, and control
//! characters occupy none.

use std::num::NonZeroUsize;
use std::sync::{LazyLock, Mutex};

use lru::LruCache;
use unicode_width::UnicodeWidthChar;

use crate::sync::lock_recover;

/// Minimum string length to cache (shorter strings have minimal overhead).
const CACHE_MIN_LEN: usize = 8;

static CELL_LEN_CACHE: LazyLock<Mutex<LruCache<String, usize>>> =
    LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(1024).expect("non-zero"))));

/// Get the cell width of a single character.
#[must_use]
pub fn get_character_cell_size(c: char) -> usize {
    c.width().unwrap_or(0)
}

#[inline]
fn compute_cell_width(text: &str) -> usize {
    text.chars().map(get_character_cell_size).sum()
}

/// Get the total cell width of a string (cached for longer strings).
#[must_use]
pub fn cell_len(text: &str) -> usize {
    if text.len() < CACHE_MIN_LEN {
        return compute_cell_width(text);
    }

    if let Some(&cached) = lock_recover(&CELL_LEN_CACHE).get(text) {
        return cached;
    }

    let width = compute_cell_width(text);
    lock_recover(&CELL_LEN_CACHE).put(text.to_string(), width);
    width
}

/// Width of the widest single character, i.e. the narrowest box the text
/// fits in when a line break is allowed between every pair of characters.
#[must_use]
pub fn widest_char(text: &str) -> usize {
    text.chars()
        .filter(|c| *c != '\n')
        .map(get_character_cell_size)
        .max()
        .unwrap_or(0)
}

/// Width of the longest explicit line.
#[must_use]
pub fn longest_line(text: &str) -> usize {
    text.split('\n').map(cell_len).max().unwrap_or(0)
}

/// Number of lines `text` occupies when wrapped into `max_cells` columns.
///
/// Lines break at spaces where possible; a word wider than the line is
/// split between characters. Explicit newlines always break. Empty text
/// still occupies one line.
#[must_use]
pub fn wrapped_line_count(text: &str, max_cells: usize) -> usize {
    let max_cells = max_cells.max(1);
    text.split('\n')
        .map(|paragraph| paragraph_line_count(paragraph, max_cells))
        .sum()
}

fn paragraph_line_count(paragraph: &str, max_cells: usize) -> usize {
    let mut lines = 1;
    let mut line_len = 0;

    for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
        let word_len = cell_len(word);
        if line_len > 0 && line_len + 1 + word_len <= max_cells {
            line_len += 1 + word_len;
            continue;
        }
        if line_len > 0 {
            lines += 1;
        }
        if word_len > max_cells {
            let chunks = word_len.div_ceil(max_cells);
            lines += chunks - 1;
            line_len = word_len - (chunks - 1) * max_cells;
        } else {
            line_len = word_len;
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_len_ascii() {
        assert_eq!(cell_len("hello"), 5);
        assert_eq!(cell_len("a much longer string"), 20);
        // second call served from cache
        assert_eq!(cell_len("a much longer string"), 20);
    }

    #[test]
    fn test_cell_len_wide() {
        assert_eq!(cell_len("日本"), 4);
    }

    #[test]
    fn test_widest_char() {
        assert_eq!(widest_char("abc"), 1);
        assert_eq!(widest_char("a日"), 2);
        assert_eq!(widest_char(""), 0);
        assert_eq!(widest_char("\n"), 0);
    }

    #[test]
    fn test_longest_line() {
        assert_eq!(longest_line("ab\nabcd\nc"), 4);
        assert_eq!(longest_line(""), 0);
    }

    #[test]
    fn test_wrapped_line_count_fits() {
        assert_eq!(wrapped_line_count("hello world", 11), 1);
        assert_eq!(wrapped_line_count("", 5), 1);
    }

    #[test]
    fn test_wrapped_line_count_breaks_at_words() {
        assert_eq!(wrapped_line_count("hello world", 10), 2);
        assert_eq!(wrapped_line_count("a b c d", 3), 2);
        assert_eq!(wrapped_line_count("one two three", 5), 3);
    }

    #[test]
    fn test_wrapped_line_count_splits_long_words() {
        assert_eq!(wrapped_line_count("abcdefghij", 4), 3);
        assert_eq!(wrapped_line_count("ab abcdefgh", 4), 3);
        assert_eq!(wrapped_line_count("abc", 0), 3);
    }

    #[test]
    fn test_wrapped_line_count_newlines() {
        assert_eq!(wrapped_line_count("a\nb\nc", 10), 3);
        assert_eq!(wrapped_line_count("a\n\nb", 10), 3);
    }
}
