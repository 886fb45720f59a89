use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use memchr::memchr_iter;

/// Counters produced by scanning one chunk, or the sum over many chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tally {
    pub lines: u64,
    pub words: u64,
    pub vowels: u64,
    pub punctuation: u64,
}

impl Add for Tally {
    type Output = Tally;

    fn add(mut self, rhs: Tally) -> Tally {
        self += rhs;
        self
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Tally) {
        self.lines += rhs.lines;
        self.words += rhs.words;
        self.vowels += rhs.vowels;
        self.punctuation += rhs.punctuation;
    }
}

impl Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Tally {
        iter.fold(Tally::default(), Add::add)
    }
}

impl<'a> Sum<&'a Tally> for Tally {
    fn sum<I: Iterator<Item = &'a Tally>>(iter: I) -> Tally {
        iter.copied().sum()
    }
}

/// How newline bytes turn into line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineRule {
    /// One line per line-feed (0x0A) byte. Carriage return is ordinary content.
    #[default]
    Feed,
    /// Both 0x0A and 0x0D are line terminators, but a terminator only counts
    /// while the scanner is still at the start of a line: at the very
    /// beginning of the chunk or directly after another terminator.
    /// LF text therefore counts blank lines only; CRLF text counts one per
    /// CRLF pair because the LF follows the CR.
    LineStart,
}

impl FromStr for LineRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feed" => Ok(LineRule::Feed),
            "line-start" => Ok(LineRule::LineStart),
            _ => Err(format!(
                "invalid line rule '{}' (expected 'feed' or 'line-start')",
                s
            )),
        }
    }
}

impl fmt::Display for LineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineRule::Feed => "feed",
            LineRule::LineStart => "line-start",
        })
    }
}

const LF: u8 = 1 << 0;
const CR: u8 = 1 << 1;
const BLANK: u8 = 1 << 2;
const VOWEL: u8 = 1 << 3;
const PUNCT: u8 = 1 << 4;

const VOWELS: &[u8] = b"AEIOUaeiou";
const PUNCTUATION: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Byte class lookup table. Only ASCII bytes carry flags; every byte with
/// no flag (including all of 0x80..=0xFF) is plain word content.
const fn make_class_table() -> [u8; 256] {
    let mut t = [0u8; 256];
    t[b'\n' as usize] = LF;
    t[b'\r' as usize] = CR;
    t[b' ' as usize] = BLANK;
    t[b'\t' as usize] = BLANK;

    let mut i = 0;
    while i < VOWELS.len() {
        t[VOWELS[i] as usize] |= VOWEL;
        i += 1;
    }
    let mut i = 0;
    while i < PUNCTUATION.len() {
        t[PUNCTUATION[i] as usize] |= PUNCT;
        i += 1;
    }
    t
}

/// Precomputed classification: `CLASS_TABLE[byte]` is a set of class flags.
const CLASS_TABLE: [u8; 256] = make_class_table();

#[inline]
pub fn is_vowel(b: u8) -> bool {
    CLASS_TABLE[b as usize] & VOWEL != 0
}

#[inline]
pub fn is_punctuation(b: u8) -> bool {
    CLASS_TABLE[b as usize] & PUNCT != 0
}

/// Scan one chunk in a single forward pass.
///
/// Classification per byte, first match wins:
/// 1. newline: counted per `rule`, never opens or closes a word
/// 2. space or tab: closes the current word
/// 3. anything else: word content, also tested against the vowel and
///    punctuation sets
///
/// A word still open after the last byte is counted. When a word straddles
/// two chunks it is therefore counted once in each, so summed word counts
/// can only exceed the single-pass count.
pub fn scan(chunk: &[u8], rule: LineRule) -> Tally {
    match rule {
        LineRule::Feed => scan_feed(chunk),
        LineRule::LineStart => scan_line_start(chunk),
    }
}

/// Line feeds via SIMD memchr, everything else in one table-driven pass.
fn scan_feed(chunk: &[u8]) -> Tally {
    let mut tally = Tally {
        lines: memchr_iter(b'\n', chunk).count() as u64,
        ..Tally::default()
    };
    let mut in_word = false;

    for &b in chunk {
        let class = CLASS_TABLE[b as usize];
        if class & LF != 0 {
            continue;
        }
        if class & BLANK != 0 {
            tally.words += in_word as u64;
            in_word = false;
            continue;
        }
        in_word = true;
        tally.vowels += (class & VOWEL != 0) as u64;
        tally.punctuation += (class & PUNCT != 0) as u64;
    }

    tally.words += in_word as u64;
    tally
}

fn scan_line_start(chunk: &[u8]) -> Tally {
    let mut tally = Tally::default();
    let mut in_word = false;
    let mut line_start = true;

    for &b in chunk {
        let class = CLASS_TABLE[b as usize];
        if class & (LF | CR) != 0 {
            tally.lines += line_start as u64;
            line_start = true;
            continue;
        }
        line_start = false;
        if class & BLANK != 0 {
            tally.words += in_word as u64;
            in_word = false;
            continue;
        }
        in_word = true;
        tally.vowels += (class & VOWEL != 0) as u64;
        tally.punctuation += (class & PUNCT != 0) as u64;
    }

    tally.words += in_word as u64;
    tally
}
