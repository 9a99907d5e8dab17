//! Scripture citation extraction.
//!
//! A single forward scan over the input, trying each start position left to
//! right and taking the first citation that matches there. Matches never
//! overlap: scanning resumes at the end of the previous match.
//!
//! # Grammar
//!
//! ```text
//! citation  = BOUNDARY [numeral WS*] book WS* chapter [sep] [verse] [range] BOUNDARY
//! numeral   = "1" | "2" | "3" | roman WS+        roman = "i" | "ii" | "iii"
//! book      = token (WS+ token){0,3}             token = [A-Za-z.]{2,}
//! chapter   = DIGIT{1,3}                         verse = DIGIT{1,3}
//! sep       = ":" | "." | WS
//! range     = WS* ("-" | "–") WS* [chapter] [sep] [verse]
//! ```
//!
//! Alternatives are tried in priority order with backtracking: the numeral
//! before no numeral, more book tokens before fewer, longer digit runs before
//! shorter, optional parts present before absent. `BOUNDARY` is an ASCII word
//! boundary, so `"John 3:16a"` only matches as far as `"John 3:"`.
//!
//! Short all-letter tokens can collide with abbreviations (`"I am 30"` reads
//! as Amos 30). That is a known precision cost of the grammar and is left as
//! is.

use crate::book;
use crate::passage::{Granularity, PassageReference};
use std::ops::Range;

/// Extract every citation in `text`, in order of appearance.
#[must_use]
pub fn extract_references(text: &str) -> Vec<PassageReference> {
    extract(text).collect()
}

/// Lazily scan `text` for citations.
///
/// Each call starts a fresh scan from the beginning of the text.
#[must_use]
pub fn extract(text: &str) -> References<'_> {
    let (offsets, chars): (Vec<usize>, Vec<char>) = text.char_indices().unzip();
    References {
        text,
        chars,
        offsets,
        cursor: 0,
    }
}

/// Iterator over the citations of one text.
#[derive(Debug, Clone)]
pub struct References<'t> {
    text: &'t str,
    chars: Vec<char>,
    offsets: Vec<usize>,
    cursor: usize,
}

impl Iterator for References<'_> {
    type Item = PassageReference;

    fn next(&mut self) -> Option<Self::Item> {
        let scanner = Scanner { chars: &self.chars };
        while self.cursor < self.chars.len() {
            if let Some(found) = scanner.match_at(self.cursor) {
                self.cursor = found.end;
                return Some(self.build(&found));
            }
            self.cursor += 1;
        }
        None
    }
}

impl References<'_> {
    fn byte_offset(&self, char_index: usize) -> usize {
        self.offsets
            .get(char_index)
            .copied()
            .unwrap_or(self.text.len())
    }

    fn slice(&self, span: &Range<usize>) -> &str {
        &self.text[self.byte_offset(span.start)..self.byte_offset(span.end)]
    }

    fn number(&self, span: &Range<usize>) -> u16 {
        let value = self.chars[span.clone()]
            .iter()
            .filter_map(|c| c.to_digit(10))
            .fold(0_u32, |acc, d| acc * 10 + d);
        u16::try_from(value).unwrap_or(u16::MAX)
    }

    fn build(&self, found: &RawMatch) -> PassageReference {
        let numeral = found.numeral.as_ref().map(|span| self.slice(span));
        let book = book::resolve(self.slice(&found.book), numeral);

        let start_chapter = self.number(&found.start_chapter);
        let start_verse = found.start_verse.as_ref().map(|span| self.number(span));
        let after_dash = found.end_chapter.as_ref().map(|span| self.number(span));
        let end_verse = found.end_verse.as_ref().map(|span| self.number(span));

        // After a start verse, a lone number past the dash is the end verse
        // of the same chapter: "3:1-5" spans verses 1 through 5.
        let (end_chapter, end_verse) = match (start_verse, after_dash, end_verse) {
            (Some(_), Some(verse), None) => (start_chapter, Some(verse)),
            (_, Some(chapter), verse) => (chapter, verse),
            (_, None, verse) => (start_chapter, verse),
        };
        let end_verse = match (start_verse, end_verse) {
            (Some(verse), None) if end_chapter == start_chapter => Some(verse),
            (_, verse) => verse,
        };

        PassageReference {
            book,
            start_chapter,
            start_verse,
            end_chapter,
            end_verse,
            granularity: Granularity::classify(start_chapter, start_verse, end_chapter, end_verse),
            citation_text: self.slice(&(found.start..found.end)).to_string(),
        }
    }
}

/// Character spans of one grammar match.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawMatch {
    start: usize,
    end: usize,
    numeral: Option<Range<usize>>,
    book: Range<usize>,
    start_chapter: Range<usize>,
    start_verse: Option<Range<usize>>,
    end_chapter: Option<Range<usize>>,
    end_verse: Option<Range<usize>>,
}

/// The optional range suffix: where it ends and the groups it captured.
type RangeTail = (usize, Option<Range<usize>>, Option<Range<usize>>);

const MAX_BOOK_TOKENS: usize = 4;
const MAX_DIGITS: usize = 3;

struct Scanner<'c> {
    chars: &'c [char],
}

impl Scanner<'_> {
    fn at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    fn is_word(&self, i: usize) -> bool {
        self.at(i)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    fn is_space(&self, i: usize) -> bool {
        self.at(i).is_some_and(char::is_whitespace)
    }

    fn at_boundary(&self, i: usize) -> bool {
        let before = i > 0 && self.is_word(i - 1);
        before != self.is_word(i)
    }

    fn skip_space(&self, mut i: usize) -> usize {
        while self.is_space(i) {
            i += 1;
        }
        i
    }

    fn run_len(&self, i: usize, pred: impl Fn(char) -> bool) -> usize {
        self.chars
            .get(i..)
            .map_or(0, |rest| rest.iter().take_while(|c| pred(**c)).count())
    }

    fn match_at(&self, start: usize) -> Option<RawMatch> {
        if !self.at_boundary(start) {
            return None;
        }
        for (numeral, book_start) in self.numeral_options(start) {
            for book_end in self.book_options(book_start) {
                let chapter_start = self.skip_space(book_end);
                for chapter in self.digit_options(chapter_start) {
                    for sep_end in self.separator_options(chapter.end) {
                        for verse in self.optional_digits(sep_end) {
                            let verse_end = verse.as_ref().map_or(sep_end, |v| v.end);
                            for (end, end_chapter, end_verse) in self.range_options(verse_end) {
                                if self.at_boundary(end) {
                                    return Some(RawMatch {
                                        start,
                                        end,
                                        numeral,
                                        book: book_start..book_end,
                                        start_chapter: chapter,
                                        start_verse: verse,
                                        end_chapter,
                                        end_verse,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
        None
    }

    /// `(numeral span, position where the book starts)`, numeral first.
    fn numeral_options(&self, start: usize) -> Vec<(Option<Range<usize>>, usize)> {
        let mut out = Vec::with_capacity(2);
        match self.at(start) {
            Some('1'..='3') => {
                out.push((Some(start..start + 1), self.skip_space(start + 1)));
            }
            Some('i' | 'I') => {
                let len = self.run_len(start, |c| c == 'i' || c == 'I');
                // A roman numeral must stand alone, so "Isaiah" is not "I saiah".
                if len <= 3 && self.is_space(start + len) {
                    out.push((Some(start..start + len), self.skip_space(start + len)));
                }
            }
            _ => {}
        }
        out.push((None, start));
        out
    }

    /// End positions of 1 to 4 book tokens, most tokens first.
    fn book_options(&self, start: usize) -> Vec<usize> {
        let is_token_char = |c: char| c.is_ascii_alphabetic() || c == '.';
        let first = self.run_len(start, is_token_char);
        if first < 2 {
            return Vec::new();
        }

        let mut ends = vec![start + first];
        let mut cursor = start + first;
        while ends.len() < MAX_BOOK_TOKENS {
            let next = self.skip_space(cursor);
            if next == cursor {
                break;
            }
            let len = self.run_len(next, is_token_char);
            if len < 2 {
                break;
            }
            cursor = next + len;
            ends.push(cursor);
        }
        ends.reverse();
        ends
    }

    /// Digit runs of 1 to 3 characters at `start`, longest first.
    fn digit_options(&self, start: usize) -> Vec<Range<usize>> {
        let run = self.run_len(start, |c| c.is_ascii_digit()).min(MAX_DIGITS);
        (1..=run).rev().map(|len| start..start + len).collect()
    }

    fn optional_digits(&self, start: usize) -> Vec<Option<Range<usize>>> {
        let mut out: Vec<_> = self.digit_options(start).into_iter().map(Some).collect();
        out.push(None);
        out
    }

    fn separator_options(&self, start: usize) -> Vec<usize> {
        match self.at(start) {
            Some(':' | '.') => vec![start + 1, start],
            Some(c) if c.is_whitespace() => vec![start + 1, start],
            _ => vec![start],
        }
    }

    /// Every way the optional range suffix can match after `start`, ending
    /// with the empty suffix.
    fn range_options(&self, start: usize) -> Vec<RangeTail> {
        let mut out = Vec::new();
        let dash = self.skip_space(start);
        if matches!(self.at(dash), Some('-' | '–')) {
            let after = self.skip_space(dash + 1);
            for chapter in self.optional_digits(after) {
                let chapter_end = chapter.as_ref().map_or(after, |c| c.end);
                for sep_end in self.separator_options(chapter_end) {
                    for verse in self.optional_digits(sep_end) {
                        let end = verse.as_ref().map_or(sep_end, |v| v.end);
                        out.push((end, chapter.clone(), verse));
                    }
                }
            }
        }
        out.push((start, None, None));
        out
    }
}
