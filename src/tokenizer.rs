use std::str::CharIndices;

use crate::traits::Tokenizer;

/// Minimum term length, in characters.
pub const MIN_TERM_LEN: usize = 4;

/// The default [`Tokenizer`].
///
/// A term is a maximal run of alphanumeric characters, `_` and `-`,
/// lowercased char by char, keeping only term characters. Runs shorter
/// than [`MIN_TERM_LEN`] characters are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn terms<'a>(&'a self, line: &'a str) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(Terms::new(line))
    }
}

/// Iterator over the terms of one line. See [`WordTokenizer`].
pub struct Terms<'a> {
    line: &'a str,
    chars: CharIndices<'a>,
}

impl<'a> Terms<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            chars: line.char_indices(),
        }
    }
}

fn is_term_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

impl Iterator for Terms<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            // Skip separators
            let (start, _) = self.chars.by_ref().find(|&(_, c)| is_term_char(c))?;

            let mut end = self.line.len();
            let mut len = 1;
            for (i, c) in self.chars.by_ref() {
                if !is_term_char(c) {
                    end = i;
                    break;
                }
                len += 1;
            }

            if len >= MIN_TERM_LEN {
                // Lowercasing may expand a char (e.g. 'İ' -> "i\u{307}")
                let term = self.line[start..end]
                    .chars()
                    .flat_map(char::to_lowercase)
                    .filter(|&c| is_term_char(c))
                    .collect();
                return Some(term);
            }
        }
    }
}
