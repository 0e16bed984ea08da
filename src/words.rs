use std::fs::File;
use std::io::{BufRead, BufReader};

use rand::seq::SliceRandom;

use crate::session::Difficulty;

/// Server-side word supply, one list per difficulty. A device may still
/// send its own word with a turn command; the bank only fills in when
/// it doesn't.
pub struct WordBank {
    easy: Vec<String>,
    medium: Vec<String>,
    hard: Vec<String>,
}

impl WordBank {
    const EASY_FILE_PATH: &'static str = "words/easy.txt";
    const MEDIUM_FILE_PATH: &'static str = "words/medium.txt";
    const HARD_FILE_PATH: &'static str = "words/hard.txt";

    pub fn load() -> Self {
        let bank = WordBank {
            easy: WordBank::read_words_from_file(WordBank::EASY_FILE_PATH),
            medium: WordBank::read_words_from_file(WordBank::MEDIUM_FILE_PATH),
            hard: WordBank::read_words_from_file(WordBank::HARD_FILE_PATH),
        };
        log::info!(
            "Words loaded. Easy: '{}', Medium: '{}', Hard: '{}'.",
            bank.easy.len(),
            bank.medium.len(),
            bank.hard.len()
        );
        bank
    }

    pub fn new(easy: Vec<String>, medium: Vec<String>, hard: Vec<String>) -> Self {
        WordBank { easy, medium, hard }
    }

    /// Picks a random word of the given difficulty that is not in the
    /// exclude list. When every word has been shown already the bank
    /// starts repeating rather than blocking the game.
    pub fn pick(&self, difficulty: Difficulty, exclude: &[String]) -> Option<String> {
        let words = self.words_for(difficulty);
        let mut rng = rand::thread_rng();
        let unused: Vec<&String> = words
            .iter()
            .filter(|&word| !exclude.contains(word))
            .collect();
        match unused.choose(&mut rng) {
            Some(word) => Some((*word).clone()),
            None => words.choose(&mut rng).cloned(),
        }
    }

    fn words_for(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn read_words_from_file(file_path: &str) -> Vec<String> {
        let file = File::open(file_path).unwrap_or_else(|error| {
            panic!("Could not load words file. File: '{file_path}', Error: '{error}'.")
        });
        BufReader::new(file)
            .lines()
            .map(|line| {
                line.expect("Could not parse one of the word lines.")
                    .trim()
                    .to_lowercase()
            })
            .filter(|word| !word.is_empty())
            .collect()
    }
}
