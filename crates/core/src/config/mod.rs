use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{pacing, AlgorithmKind, Mode, Result, SortVizError};

pub const DEFAULT_SIZE: usize = 50;
/// Random values are drawn from `[RANDOM_MIN, RANDOM_MAX)`.
pub const RANDOM_MIN: i64 = 10;
pub const RANDOM_MAX: i64 = 960;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: Mode,
    pub primary: AlgorithmKind,
    pub secondary: AlgorithmKind,
    pub speed: u8,
    pub sound: bool,
    /// Seeds random data, shuffles and audio sampling when set.
    pub seed: Option<u64>,
    pub source: ArraySource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Single,
            primary: AlgorithmKind::Bubble,
            secondary: AlgorithmKind::Quick,
            speed: pacing::DEFAULT_SPEED,
            sound: false,
            seed: None,
            source: ArraySource::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Where the session's source values come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArraySource {
    Random { size: usize },
    /// Comma separated integers, as typed by a user.
    Manual { values: String },
}

impl Default for ArraySource {
    fn default() -> Self {
        Self::Random { size: DEFAULT_SIZE }
    }
}

impl ArraySource {
    pub fn resolve(&self, rng: &mut impl Rng) -> Result<Vec<i64>> {
        match self {
            Self::Random { size } => Ok(random_values(*size, rng)),
            Self::Manual { values } => parse_manual(values),
        }
    }
}

pub fn random_values(size: usize, rng: &mut impl Rng) -> Vec<i64> {
    (0..size)
        .map(|_| rng.random_range(RANDOM_MIN..RANDOM_MAX))
        .collect()
}

/// Reads the leading integer of every comma separated entry, so `"1.5"`
/// gives 1 and `"12abc"` gives 12. Entries without one are dropped. Fewer
/// than two survivors is not a usable sequence.
pub fn parse_manual(input: &str) -> Result<Vec<i64>> {
    let values: Vec<i64> = input.split(',').filter_map(leading_integer).collect();

    if values.len() < 2 {
        return Err(SortVizError::InvalidInput(
            "manual data needs at least two integers",
        ));
    }
    Ok(values)
}

fn leading_integer(entry: &str) -> Option<i64> {
    let entry = entry.trim();
    let sign = usize::from(entry.starts_with(['+', '-']));
    let digits = entry[sign..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    entry[..sign + digits].parse().ok()
}
