//! Word-guessing rules (Hangman)
//!
//! Turn-based: no tick loop, one letter per move.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::state::Outcome;

/// A solution word and the hint shown for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordEntry {
    pub word: &'static str,
    pub hint: &'static str,
}

pub const WORDS: &[WordEntry] = &[
    WordEntry {
        word: "PAINTING",
        hint: "Uses colors on a surface.",
    },
    WordEntry {
        word: "JAVASCRIPT",
        hint: "Language of the web.",
    },
    WordEntry {
        word: "PYRAMID",
        hint: "Triangular wonder of Egypt.",
    },
    WordEntry {
        word: "GUITAR",
        hint: "Stringed instrument.",
    },
    WordEntry {
        word: "COMPONENT",
        hint: "Re-usable UI building block.",
    },
];

/// What a single letter did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guess {
    /// Letter is in the word
    Hit,
    /// Letter is not in the word; one more part drawn
    Miss,
    /// Letter was already tried this round
    Repeated,
    /// Not an ASCII letter
    Invalid,
    /// Round already over
    Finished,
}

/// One round of hangman
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HangmanState {
    word: String,
    hint: String,
    /// Every letter tried, hit or miss
    tried: BTreeSet<char>,
    wrong: u8,
    max_wrong: u8,
}

impl HangmanState {
    /// Start a round on a uniformly chosen word
    pub fn new<R: Rng + ?Sized>(rng: &mut R, max_wrong: u8) -> Self {
        // WORDS is a non-empty constant
        let entry = WORDS.choose(rng).copied().unwrap_or(WORDS[0]);
        Self::with_word(entry.word, entry.hint, max_wrong)
    }

    pub fn with_word(word: &str, hint: &str, max_wrong: u8) -> Self {
        Self {
            word: word.to_ascii_uppercase(),
            hint: hint.to_string(),
            tried: BTreeSet::new(),
            wrong: 0,
            max_wrong: max_wrong.max(1),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn wrong(&self) -> u8 {
        self.wrong
    }

    pub fn max_wrong(&self) -> u8 {
        self.max_wrong
    }

    pub fn has_tried(&self, letter: char) -> bool {
        self.tried.contains(&letter.to_ascii_uppercase())
    }

    /// Word with unrevealed letters as `_`, space separated
    pub fn masked(&self) -> String {
        self.word
            .chars()
            .map(|c| if self.tried.contains(&c) { c } else { '_' })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_solved(&self) -> bool {
        self.word.chars().all(|c| self.tried.contains(&c))
    }

    pub fn is_hanged(&self) -> bool {
        self.wrong >= self.max_wrong
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_solved() {
            Some(Outcome::Won)
        } else if self.is_hanged() {
            Some(Outcome::Lost)
        } else {
            None
        }
    }

    /// Try one letter
    pub fn guess(&mut self, letter: char) -> Guess {
        if self.outcome().is_some() {
            return Guess::Finished;
        }
        if !letter.is_ascii_alphabetic() {
            return Guess::Invalid;
        }
        let letter = letter.to_ascii_uppercase();
        if !self.tried.insert(letter) {
            return Guess::Repeated;
        }
        if self.word.contains(letter) {
            Guess::Hit
        } else {
            self.wrong += 1;
            Guess::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_picks_listed_word() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            let round = HangmanState::new(&mut rng, 6);
            assert!(WORDS.iter().any(|e| e.word == round.word() && e.hint == round.hint()));
            assert_eq!(round.wrong(), 0);
        }
    }

    #[test]
    fn test_hits_reveal_every_occurrence() {
        let mut round = HangmanState::with_word("GUITAR", "Stringed instrument.", 6);
        assert_eq!(round.masked(), "_ _ _ _ _ _");
        assert_eq!(round.guess('a'), Guess::Hit);
        assert_eq!(round.masked(), "_ _ _ _ A _");
        assert_eq!(round.guess('A'), Guess::Repeated);
        assert_eq!(round.wrong(), 0);
    }

    #[test]
    fn test_solving_wins() {
        let mut round = HangmanState::with_word("PYRAMID", "", 6);
        for c in "PYRAMID".chars() {
            assert_eq!(round.guess(c), Guess::Hit);
        }
        assert_eq!(round.outcome(), Some(Outcome::Won));
        assert_eq!(round.guess('Z'), Guess::Finished);
        assert_eq!(round.wrong(), 0);
    }

    #[test]
    fn test_six_misses_lose() {
        let mut round = HangmanState::with_word("GUITAR", "", 6);
        for c in ['B', 'C', 'D', 'E', 'F'] {
            assert_eq!(round.guess(c), Guess::Miss);
            assert_eq!(round.outcome(), None);
        }
        assert_eq!(round.guess('H'), Guess::Miss);
        assert_eq!(round.outcome(), Some(Outcome::Lost));
        assert_eq!(round.guess('G'), Guess::Finished);
        assert_eq!(round.wrong(), 6);
    }

    #[test]
    fn test_invalid_letters_cost_nothing() {
        let mut round = HangmanState::with_word("GUITAR", "", 6);
        assert_eq!(round.guess('7'), Guess::Invalid);
        assert_eq!(round.guess('é'), Guess::Invalid);
        assert_eq!(round.wrong(), 0);
    }
}
