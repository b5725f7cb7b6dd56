//! Greedy word wrapping for node titles.

use smallvec::{SmallVec, smallvec};

/// Wrapped lines. Most titles fit in one or two.
pub type Lines = SmallVec<[String; 2]>;

/// Wrap `text` into lines of at most `max_chars` characters.
///
/// Words are packed greedily and never split, so a single word longer than
/// `max_chars` sits alone on an over-long line. Always returns at least one
/// line (`[""]` for blank input). Lengths are counted in `char`s.
pub fn wrap_text(text: &str, max_chars: usize) -> Lines {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return smallvec![String::new()];
    };

    let mut lines = Lines::new();
    let mut current = first.to_string();
    let mut current_len = first.chars().count();

    for word in words {
        let word_len = word.chars().count();
        if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    lines.push(current);
    lines
}
