//! toolbelt rps command implementation
//!
//! Each invocation is one action of a persisted session: `play` records a
//! round, `score` shows the scoreboard, `reset` starts over.

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::rps::{Choice, RpsStore, Statistics};
use crate::storage::Storage;

/// Options for `toolbelt rps play`
pub struct PlayOptions {
    pub choice: String,
    pub against: Option<String>,
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt rps score`
pub struct ScoreOptions {
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt rps reset`
pub struct ResetOptions {
    pub storage: Storage,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct ResetReport {
    reset: bool,
    high_score: u64,
}

fn store(storage: Storage) -> RpsStore {
    let config = Config::load_from_dir(storage.data_dir());
    RpsStore::new(storage, config.rps.history_cap)
}

pub fn run_play(options: PlayOptions) -> Result<()> {
    let player: Choice = options.choice.parse()?;
    let computer = match options.against.as_deref() {
        Some(raw) => raw.parse()?,
        None => Choice::random(&mut rand::rng()),
    };

    let report = store(options.storage).play(player, computer)?;

    let mut human = HumanOutput::new(report.round.outcome.headline());
    human.push_summary("you", player.to_string());
    human.push_summary("computer", computer.to_string());
    human.push_summary(
        "score",
        format!(
            "Player: {} | Computer: {}",
            report.player_score, report.computer_score
        ),
    );
    human.push_summary("high score", report.high_score.to_string());
    if report.new_high_score {
        human.push_detail("New high score!");
    }

    emit_success(options.output, "rps play", &report, Some(&human))
}

pub fn run_score(options: ScoreOptions) -> Result<()> {
    let scoreboard = store(options.storage).scoreboard()?;

    let mut human = HumanOutput::new(format!(
        "Player: {} | Computer: {}",
        scoreboard.player_score, scoreboard.computer_score
    ));
    human.push_summary("high score", scoreboard.high_score.to_string());
    push_statistics(&mut human, &scoreboard.statistics);
    for round in &scoreboard.history {
        human.push_detail(round.to_string());
    }
    if scoreboard.history.is_empty() {
        human.push_next_step("toolbelt rps play <rock|paper|scissors>");
    }

    emit_success(options.output, "rps score", &scoreboard, Some(&human))
}

pub fn run_reset(options: ResetOptions) -> Result<()> {
    let store = store(options.storage);
    store.reset()?;
    let high_score = store.scoreboard()?.high_score;

    let report = ResetReport {
        reset: true,
        high_score,
    };

    let mut human = HumanOutput::new("New game started");
    human.push_summary("high score", high_score.to_string());

    emit_success(options.output, "rps reset", &report, Some(&human))
}

fn push_statistics(human: &mut HumanOutput, statistics: &Statistics) {
    human.push_summary("rounds played", statistics.rounds_played.to_string());
    human.push_summary("win rate", format!("{:.1}%", statistics.win_rate));
    human.push_summary(
        "most picked",
        statistics
            .most_picked
            .map(|choice| choice.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    human.push_summary("best streak", statistics.best_streak.to_string());
}
