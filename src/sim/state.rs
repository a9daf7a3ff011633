//! Session-level state shared by every game
//!
//! Which game is open, where its session is in the lifecycle, and how a
//! finished round is reported to the player.

use serde::{Deserialize, Serialize};

/// The three games the hub can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Snake,
    Bricks,
    Hangman,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Snake, GameKind::Bricks, GameKind::Hangman];

    /// Heading shown above the stage
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Snake => "Snake",
            GameKind::Bricks => "Bricks Breaker",
            GameKind::Hangman => "Hangman",
        }
    }

    /// Short identifier used by the home cards (`data-game`)
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::Bricks => "bricks",
            GameKind::Hangman => "hangman",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "snake" => Some(GameKind::Snake),
            "bricks" | "breakout" => Some(GameKind::Bricks),
            "hangman" => Some(GameKind::Hangman),
            _ => None,
        }
    }
}

/// Lifecycle of a session
///
/// `Idle -> Running -> {Won, Lost}`. Restart re-enters `Running` through a
/// fresh `Idle`; nothing else leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Idle,
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl From<Outcome> for GameStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => GameStatus::Won,
            Outcome::Lost => GameStatus::Lost,
        }
    }
}

/// Payload handed to the outcome notifier on terminal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub kind: GameKind,
    pub outcome: Outcome,
    /// Final score, for games that keep one
    pub score: Option<u32>,
    /// Solution word, for the word game
    pub word: Option<String>,
}

impl OutcomeReport {
    pub fn new(kind: GameKind, outcome: Outcome) -> Self {
        Self {
            kind,
            outcome,
            score: None,
            word: None,
        }
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }

    /// Text shown to the player
    pub fn message(&self) -> String {
        match (self.outcome, &self.word) {
            (Outcome::Won, _) => "🏆 You win!".to_string(),
            (Outcome::Lost, Some(word)) => format!("💀 You lost! Word: {word}"),
            (Outcome::Lost, None) => "💀 Game Over".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(GameKind::from_name(" Snake "), Some(GameKind::Snake));
        assert_eq!(GameKind::from_name("tetris"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!GameStatus::Idle.is_terminal());
        assert!(!GameStatus::Running.is_terminal());
        assert!(GameStatus::Won.is_terminal());
        assert!(GameStatus::Lost.is_terminal());
        assert_eq!(GameStatus::from(Outcome::Lost), GameStatus::Lost);
    }

    #[test]
    fn test_report_messages() {
        let won = OutcomeReport::new(GameKind::Bricks, Outcome::Won).with_score(28);
        assert!(won.message().contains("You win"));

        let lost = OutcomeReport::new(GameKind::Snake, Outcome::Lost);
        assert!(lost.message().contains("Game Over"));

        let hanged = OutcomeReport::new(GameKind::Hangman, Outcome::Lost).with_word("GUITAR");
        assert!(hanged.message().ends_with("Word: GUITAR"));
    }
}
