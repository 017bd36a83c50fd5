//! Password generation, strength scoring and history.
//!
//! Generation is rejection sampling: draw `length` characters uniformly (with
//! replacement) from the union of the selected classes, and redraw the whole
//! candidate until every selected class is represented. The loop is bounded
//! by `max_attempts`; running out is reported as a user error
//! rather than spinning forever.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::Local;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::Storage;

pub const MIN_LENGTH: usize = 8;
pub const MAX_LENGTH: usize = 100;

/// Characters stripped by the avoid-similar option
pub const SIMILAR_CHARS: &str = "1lI0O";

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
/// ASCII punctuation
pub const SYMBOLS: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

const HISTORY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [
        CharClass::Uppercase,
        CharClass::Lowercase,
        CharClass::Digit,
        CharClass::Symbol,
    ];

    pub fn alphabet(self) -> &'static str {
        match self {
            CharClass::Uppercase => UPPERCASE,
            CharClass::Lowercase => LOWERCASE,
            CharClass::Digit => DIGITS,
            CharClass::Symbol => SYMBOLS,
        }
    }

    /// Whether `ch` belongs to this class.
    pub fn matches(self, ch: char) -> bool {
        match self {
            CharClass::Uppercase => ch.is_uppercase(),
            CharClass::Lowercase => ch.is_lowercase(),
            CharClass::Digit => ch.is_ascii_digit(),
            CharClass::Symbol => SYMBOLS.contains(ch),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CharClass::Uppercase => "uppercase",
            CharClass::Lowercase => "lowercase",
            CharClass::Digit => "digit",
            CharClass::Symbol => "symbol",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharClass {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upper" | "uppercase" => Ok(CharClass::Uppercase),
            "lower" | "lowercase" => Ok(CharClass::Lowercase),
            "digit" | "digits" | "number" | "numbers" => Ok(CharClass::Digit),
            "symbol" | "symbols" | "special" => Ok(CharClass::Symbol),
            other => Err(Error::InvalidArgument(format!(
                "invalid character class '{other}': must be upper, lower, digit, or symbol"
            ))),
        }
    }
}

/// Parse a user-entered length and check the allowed range.
pub fn parse_length(raw: &str) -> Result<usize> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        Error::InvalidPasswordLength(
            "Please enter a valid number for password length".to_string(),
        )
    })?;
    check_length(value)
}

/// Check that `value` is inside the allowed length range.
pub fn check_length(value: i64) -> Result<usize> {
    if value < MIN_LENGTH as i64 {
        return Err(Error::InvalidPasswordLength(format!(
            "Password length must be at least {MIN_LENGTH} characters"
        )));
    }
    if value > MAX_LENGTH as i64 {
        return Err(Error::InvalidPasswordLength(format!(
            "Password length must not exceed {MAX_LENGTH} characters"
        )));
    }
    Ok(value as usize)
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordSpec {
    length: usize,
    classes: BTreeSet<CharClass>,
    avoid_similar: bool,
}

impl PasswordSpec {
    pub fn new(
        length: usize,
        classes: impl IntoIterator<Item = CharClass>,
        avoid_similar: bool,
    ) -> Result<Self> {
        check_length(i64::try_from(length).unwrap_or(i64::MAX))?;
        let classes: BTreeSet<CharClass> = classes.into_iter().collect();
        if classes.is_empty() {
            return Err(Error::NoCharacterClasses);
        }
        Ok(Self {
            length,
            classes,
            avoid_similar,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn classes(&self) -> &BTreeSet<CharClass> {
        &self.classes
    }

    pub fn avoid_similar(&self) -> bool {
        self.avoid_similar
    }

    /// Union of the selected class alphabets, minus similar characters if
    /// requested.
    pub fn alphabet(&self) -> Vec<char> {
        self.classes
            .iter()
            .flat_map(|class| class.alphabet().chars())
            .filter(|ch| !(self.avoid_similar && SIMILAR_CHARS.contains(*ch)))
            .collect()
    }

    /// Whether `candidate` has at least one character of every selected class.
    pub fn is_satisfied_by(&self, candidate: &str) -> bool {
        !candidate.is_empty()
            && self
                .classes
                .iter()
                .all(|class| candidate.chars().any(|ch| class.matches(ch)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    pub password: String,
    pub attempts: u32,
}

/// Draw candidates until one satisfies `spec`, at most `max_attempts` times.
pub fn generate<R: Rng + ?Sized>(
    spec: &PasswordSpec,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Generated> {
    let alphabet = spec.alphabet();

    // A selected class with nothing left to draw from can never be satisfied.
    if let Some(empty) = spec
        .classes
        .iter()
        .find(|class| !alphabet.iter().any(|ch| class.matches(*ch)))
    {
        return Err(Error::InvalidConfig(format!(
            "character class '{empty}' has no characters left after removing similar characters"
        )));
    }

    for attempt in 1..=max_attempts {
        let candidate: String = (0..spec.length)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();
        if spec.is_satisfied_by(&candidate) {
            tracing::debug!(attempts = attempt, length = spec.length, "password generated");
            return Ok(Generated {
                password: candidate,
                attempts: attempt,
            });
        }
    }

    tracing::warn!(max_attempts, "password generation exhausted its attempts");
    Err(Error::GenerationExhausted {
        attempts: max_attempts,
    })
}

// =============================================================================
// Strength
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StrengthBand {
    Weak,
    Moderate,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl StrengthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => StrengthBand::VeryStrong,
            60..=79 => StrengthBand::Strong,
            40..=59 => StrengthBand::Moderate,
            _ => StrengthBand::Weak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrengthBand::Weak => "Weak",
            StrengthBand::Moderate => "Moderate",
            StrengthBand::Strong => "Strong",
            StrengthBand::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for StrengthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scoring criterion the password met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthCheck {
    GoodLength,
    MinimumLength,
    Uppercase,
    Lowercase,
    Digits,
    Symbols,
}

impl StrengthCheck {
    pub fn message(self) -> &'static str {
        match self {
            StrengthCheck::GoodLength => "Good length",
            StrengthCheck::MinimumLength => "Minimum length met",
            StrengthCheck::Uppercase => "Contains uppercase",
            StrengthCheck::Lowercase => "Contains lowercase",
            StrengthCheck::Digits => "Contains numbers",
            StrengthCheck::Symbols => "Contains symbols",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strength {
    pub score: u8,
    pub band: StrengthBand,
    pub checks: BTreeSet<StrengthCheck>,
}

const GOOD_LENGTH: usize = 12;
const GOOD_LENGTH_POINTS: u32 = 25;
const MINIMUM_LENGTH_POINTS: u32 = 10;
const CLASS_POINTS: u32 = 20;
const ENTROPY_POINTS: f64 = 20.0;
const MAX_SCORE: u32 = 100;

/// Score a password: length bonus, 20 per class present, and a distinctness
/// term, capped at 100.
pub fn evaluate_strength(password: &str) -> Strength {
    let length = password.chars().count();
    let mut score = 0u32;
    let mut checks = BTreeSet::new();

    if length >= GOOD_LENGTH {
        score += GOOD_LENGTH_POINTS;
        checks.insert(StrengthCheck::GoodLength);
    } else if length >= MIN_LENGTH {
        score += MINIMUM_LENGTH_POINTS;
        checks.insert(StrengthCheck::MinimumLength);
    }

    let class_checks = [
        (CharClass::Uppercase, StrengthCheck::Uppercase),
        (CharClass::Lowercase, StrengthCheck::Lowercase),
        (CharClass::Digit, StrengthCheck::Digits),
        (CharClass::Symbol, StrengthCheck::Symbols),
    ];
    for (class, check) in class_checks {
        if password.chars().any(|ch| class.matches(ch)) {
            score += CLASS_POINTS;
            checks.insert(check);
        }
    }

    if length > 0 {
        let distinct = password.chars().collect::<BTreeSet<_>>().len();
        score += (ENTROPY_POINTS * distinct as f64 / length as f64).round() as u32;
    }

    let score = score.min(MAX_SCORE) as u8;
    Strength {
        score,
        band: StrengthBand::from_score(score),
        checks,
    }
}

// =============================================================================
// History
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub password: String,
}

impl HistoryEntry {
    pub fn now(password: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format(HISTORY_TIMESTAMP_FORMAT).to_string(),
            password: password.into(),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.timestamp, self.password)
    }
}

/// The last `limit` entries, newest first.
pub fn recent(entries: &[HistoryEntry], limit: usize) -> Vec<HistoryEntry> {
    entries.iter().rev().take(limit).cloned().collect()
}

/// Unbounded generated-password log backed by a JSONL file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    storage: Storage,
}

impl HistoryStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn record(&self, entry: &HistoryEntry) -> Result<()> {
        self.storage
            .append_jsonl(&self.storage.password_history_file(), entry)
    }

    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        self.storage
            .read_jsonl(&self.storage.password_history_file())
    }

    pub fn clear(&self) -> Result<bool> {
        self.storage
            .truncate(&self.storage.password_history_file())
    }
}
