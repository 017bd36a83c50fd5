//! Rock-paper-scissors: round resolution, session scores, capped history.
//!
//! State lives in two files: `rps_statistics.json` (session scores, rounds
//! played and the last few rounds) and `rps_high_score.txt` (a bare integer
//! that survives `rps reset`).

use std::fmt;
use std::str::FromStr;

use chrono::Local;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::Storage;

const ROUND_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// The choice this one defeats.
    pub fn beats(self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Paper => Choice::Rock,
            Choice::Scissors => Choice::Paper,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Choice {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Choice::Rock => "Rock",
            Choice::Paper => "Paper",
            Choice::Scissors => "Scissors",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" | "r" => Ok(Choice::Rock),
            "paper" | "p" => Ok(Choice::Paper),
            "scissors" | "s" => Ok(Choice::Scissors),
            _ => Err(Error::InvalidArgument(format!(
                "invalid choice '{}': must be rock, paper, or scissors",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    pub fn headline(self) -> &'static str {
        match self {
            Outcome::Win => "You Win!",
            Outcome::Loss => "Computer Wins!",
            Outcome::Tie => "It's a Tie!",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
            Outcome::Tie => "Tie",
        };
        f.write_str(label)
    }
}

/// Outcome from the player's side.
pub fn resolve(player: Choice, computer: Choice) -> Outcome {
    if player == computer {
        Outcome::Tie
    } else if player.beats() == computer {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub timestamp: String,
    pub player: Choice,
    pub computer: Choice,
    pub outcome: Outcome,
}

impl RoundRecord {
    pub fn new(player: Choice, computer: Choice) -> Self {
        Self {
            timestamp: Local::now().format(ROUND_TIMESTAMP_FORMAT).to_string(),
            player,
            computer,
            outcome: resolve(player, computer),
        }
    }
}

impl fmt::Display for RoundRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} vs {}: {}",
            self.timestamp, self.player, self.computer, self.outcome
        )
    }
}

impl FromStr for RoundRecord {
    type Err = Error;

    /// Parses the log line form, `12:00:00 - Rock vs Scissors: Win`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let line = s.trim();
        let invalid = || Error::InvalidArgument(format!("invalid round entry '{}'", line));
        let (timestamp, rest) = line.split_once(" - ").ok_or_else(invalid)?;
        let (player, rest) = rest.split_once(" vs ").ok_or_else(invalid)?;
        let (computer, outcome) = rest.split_once(": ").ok_or_else(invalid)?;
        let outcome = match outcome {
            "Win" => Outcome::Win,
            "Loss" => Outcome::Loss,
            "Tie" => Outcome::Tie,
            _ => return Err(invalid()),
        };

        Ok(RoundRecord {
            timestamp: timestamp.to_string(),
            player: player.parse()?,
            computer: computer.parse()?,
            outcome,
        })
    }
}

/// A history entry as stored: a structured record, or an older log line.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRound {
    Record(RoundRecord),
    Line(String),
}

fn deserialize_history<'de, D>(deserializer: D) -> std::result::Result<Vec<RoundRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec::<StoredRound>::deserialize(deserializer)?
        .into_iter()
        .map(|entry| match entry {
            StoredRound::Record(record) => Ok(record),
            StoredRound::Line(line) => line.parse().map_err(serde::de::Error::custom),
        })
        .collect()
}

/// Persisted game state (`rps_statistics.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub player_score: u64,
    #[serde(default)]
    pub computer_score: u64,
    #[serde(default)]
    pub rounds_played: u64,
    #[serde(
        default,
        rename = "game_history",
        deserialize_with = "deserialize_history"
    )]
    pub history: Vec<RoundRecord>,
}

impl GameState {
    /// Apply a finished round, keeping at most `cap` history entries.
    pub fn record(&mut self, round: RoundRecord, cap: usize) {
        match round.outcome {
            Outcome::Win => self.player_score += 1,
            Outcome::Loss => self.computer_score += 1,
            Outcome::Tie => {}
        }
        self.rounds_played += 1;
        self.history.push(round);
        if self.history.len() > cap {
            let overflow = self.history.len() - cap;
            self.history.drain(..overflow);
        }
    }

    /// Player wins as a percentage of rounds played.
    pub fn win_rate(&self) -> f64 {
        if self.rounds_played == 0 {
            return 0.0;
        }
        self.player_score as f64 / self.rounds_played as f64 * 100.0
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            rounds_played: self.rounds_played,
            win_rate: self.win_rate(),
            most_picked: most_picked(&self.history),
            best_streak: best_streak(&self.history),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub rounds_played: u64,
    pub win_rate: f64,
    pub most_picked: Option<Choice>,
    pub best_streak: usize,
}

/// The player's most frequent choice; ties go to whichever appeared first.
pub fn most_picked(history: &[RoundRecord]) -> Option<Choice> {
    let mut counts: Vec<(Choice, usize)> = Vec::with_capacity(Choice::ALL.len());
    for round in history {
        match counts.iter_mut().find(|(choice, _)| *choice == round.player) {
            Some((_, count)) => *count += 1,
            None => counts.push((round.player, 1)),
        }
    }

    counts
        .into_iter()
        .fold(None, |best: Option<(Choice, usize)>, (choice, count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((choice, count)),
        })
        .map(|(choice, _)| choice)
}

/// Longest run of consecutive wins.
pub fn best_streak(history: &[RoundRecord]) -> usize {
    let mut current = 0;
    let mut best = 0;
    for round in history {
        if round.outcome == Outcome::Win {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Result of one played round.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    pub round: RoundRecord,
    pub player_score: u64,
    pub computer_score: u64,
    pub high_score: u64,
    pub new_high_score: bool,
    pub statistics: Statistics,
}

/// Snapshot of the scoreboard without playing.
#[derive(Debug, Clone, Serialize)]
pub struct Scoreboard {
    pub player_score: u64,
    pub computer_score: u64,
    pub high_score: u64,
    pub history: Vec<RoundRecord>,
    pub statistics: Statistics,
}

#[derive(Debug, Clone)]
pub struct RpsStore {
    storage: Storage,
    history_cap: usize,
}

impl RpsStore {
    pub fn new(storage: Storage, history_cap: usize) -> Self {
        Self {
            storage,
            history_cap,
        }
    }

    pub fn scoreboard(&self) -> Result<Scoreboard> {
        let state: GameState = self
            .storage
            .read_json_or_default(&self.storage.rps_stats_file())?;
        let high_score = self
            .storage
            .read_counter(&self.storage.rps_high_score_file())?;
        Ok(Scoreboard {
            player_score: state.player_score,
            computer_score: state.computer_score,
            high_score,
            statistics: state.statistics(),
            history: state.history,
        })
    }

    /// Play one round and persist scores, history and high score.
    pub fn play(&self, player: Choice, computer: Choice) -> Result<PlayReport> {
        let stats_path = self.storage.rps_stats_file();
        let high_score_path = self.storage.rps_high_score_file();
        let cap = self.history_cap;

        self.storage.update_json(&stats_path, |state: &mut GameState| {
            let round = RoundRecord::new(player, computer);
            state.record(round.clone(), cap);

            let mut high_score = self.storage.read_counter(&high_score_path)?;
            let new_high_score = state.player_score > high_score;
            if new_high_score {
                high_score = state.player_score;
                self.storage.write_counter(&high_score_path, high_score)?;
            }

            tracing::debug!(
                player = %player,
                computer = %computer,
                outcome = %round.outcome,
                "round played"
            );

            Ok(PlayReport {
                round,
                player_score: state.player_score,
                computer_score: state.computer_score,
                high_score,
                new_high_score,
                statistics: state.statistics(),
            })
        })
    }

    /// Start a new session. The high score is kept.
    pub fn reset(&self) -> Result<()> {
        self.storage
            .update_json(&self.storage.rps_stats_file(), |state: &mut GameState| {
                *state = GameState::default();
                Ok(())
            })
    }
}
