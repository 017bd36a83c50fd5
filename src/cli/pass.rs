//! toolbelt pass command implementation
//!
//! Flags override the `[password]` section of `toolbelt.toml`.

use std::collections::BTreeSet;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::password::{
    self, CharClass, HistoryEntry, HistoryStore, PasswordSpec, Strength,
};
use crate::storage::Storage;

/// Options for `toolbelt pass gen`
pub struct GenOptions {
    pub length: Option<String>,
    pub classes: Vec<String>,
    pub avoid_similar: Option<bool>,
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt pass check`
pub struct CheckOptions {
    pub password: String,
    pub output: OutputOptions,
}

/// Options for `toolbelt pass history`
pub struct HistoryOptions {
    pub limit: Option<usize>,
    pub clear: bool,
    pub storage: Storage,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct GenReport {
    password: String,
    length: usize,
    classes: BTreeSet<CharClass>,
    avoid_similar: bool,
    attempts: u32,
    strength: Strength,
    recorded: bool,
}

#[derive(serde::Serialize)]
struct CheckReport {
    strength: Strength,
    feedback: Vec<&'static str>,
}

#[derive(serde::Serialize)]
struct HistoryReport {
    total: usize,
    entries: Vec<HistoryEntry>,
}

#[derive(serde::Serialize)]
struct ClearReport {
    cleared: bool,
}

pub fn run_gen(options: GenOptions) -> Result<()> {
    let config = Config::load_from_dir(options.storage.data_dir());

    let length = match options.length.as_deref() {
        Some(raw) => password::parse_length(raw)?,
        None => config.password.default_length,
    };
    let classes = if options.classes.is_empty() {
        config.password.classes.clone()
    } else {
        options
            .classes
            .iter()
            .map(|raw| raw.parse::<CharClass>())
            .collect::<Result<Vec<_>>>()?
    };
    let avoid_similar = options
        .avoid_similar
        .unwrap_or(config.password.avoid_similar);

    let spec = PasswordSpec::new(length, classes, avoid_similar)?;
    let generated = password::generate(&spec, config.password.max_attempts, &mut rand::rng())?;
    let strength = password::evaluate_strength(&generated.password);

    if config.password.record_history {
        HistoryStore::new(options.storage).record(&HistoryEntry::now(&generated.password))?;
    }

    let mut human = HumanOutput::new(generated.password.clone());
    human.push_summary("strength", strength_label(&strength));
    human.push_summary("length", length.to_string());
    if generated.attempts > 1 {
        human.push_summary("attempts", generated.attempts.to_string());
    }

    let report = GenReport {
        password: generated.password,
        length,
        classes: spec.classes().clone(),
        avoid_similar,
        attempts: generated.attempts,
        strength,
        recorded: config.password.record_history,
    };
    emit_success(options.output, "pass gen", &report, Some(&human))
}

pub fn run_check(options: CheckOptions) -> Result<()> {
    let strength = password::evaluate_strength(&options.password);
    let feedback: Vec<&'static str> = strength.checks.iter().map(|check| check.message()).collect();

    let mut human = HumanOutput::new(format!("Password Strength: {}", strength_label(&strength)));
    for message in &feedback {
        human.push_detail(*message);
    }

    emit_success(
        options.output,
        "pass check",
        &CheckReport { strength, feedback },
        Some(&human),
    )
}

pub fn run_history(options: HistoryOptions) -> Result<()> {
    let store = HistoryStore::new(options.storage.clone());

    if options.clear {
        let cleared = store.clear()?;
        let human = HumanOutput::new(if cleared {
            "Password history cleared"
        } else {
            "Password history already empty"
        });
        return emit_success(
            options.output,
            "pass history",
            &ClearReport { cleared },
            Some(&human),
        );
    }

    let limit = match options.limit {
        Some(limit) => limit,
        None => Config::load_from_dir(options.storage.data_dir())
            .password
            .history_display,
    };
    let all = store.entries()?;
    let entries = password::recent(&all, limit);

    let mut human = HumanOutput::new(format!("Password history ({} total)", all.len()));
    for entry in &entries {
        human.push_detail(entry.to_string());
    }
    if all.is_empty() {
        human.push_next_step("toolbelt pass gen");
    }

    let report = HistoryReport {
        total: all.len(),
        entries,
    };
    emit_success(options.output, "pass history", &report, Some(&human))
}

fn strength_label(strength: &Strength) -> String {
    format!("{} ({}/100)", strength.band, strength.score)
}
