//! Seed resolution.
//!
//! A draw is reproducible from its seed alone, so the seed is resolved once,
//! before any input is read, and then carried unchanged into the report.

use std::fmt;

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Divisor applied to the timestamp before mixing in the random factor.
const TIMESTAMP_DIVISOR: u64 = 20;

/// Exclusive upper bound of the random mixing factor.
const MIX_FACTOR_BOUND: u64 = 100;

/// How the seed was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// Supplied by the user to replay a draw
    Forced,
    /// Derived at run time
    Random,
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedMode::Forced => write!(f, "forced"),
            SeedMode::Random => write!(f, "random"),
        }
    }
}

/// Derivation used in random mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedStrategy {
    /// `ddmmYYYYHHMMSS / 20 * U[0, 100)`, truncated.
    ///
    /// Not a sound entropy source: at most 100 distinct seeds per second,
    /// and a factor of 0 always yields seed 0.
    #[default]
    Timestamp,
    /// Uniform `u64` from the OS-seeded thread generator.
    Entropy,
}

impl fmt::Display for SeedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedStrategy::Timestamp => write!(f, "timestamp"),
            SeedStrategy::Entropy => write!(f, "entropy"),
        }
    }
}

/// Seed fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSeed {
    pub value: u64,
    pub mode: SeedMode,
    /// Strategy used; `None` when forced
    pub strategy: Option<SeedStrategy>,
    /// Wall-clock time the draw was made
    pub drawn_at: NaiveDateTime,
}

impl ResolvedSeed {
    /// Resolve the seed for a run.
    ///
    /// A forced seed is returned unchanged. Otherwise the seed is derived from
    /// `now` and one draw from `aux` according to `strategy`.
    pub fn resolve<R: Rng>(
        forced: Option<u64>,
        strategy: SeedStrategy,
        now: NaiveDateTime,
        aux: &mut R,
    ) -> Self {
        match forced {
            Some(value) => Self {
                value,
                mode: SeedMode::Forced,
                strategy: None,
                drawn_at: now,
            },
            None => {
                let value = match strategy {
                    SeedStrategy::Timestamp => {
                        timestamp_seed(now, aux.gen_range(0..MIX_FACTOR_BOUND))
                    }
                    SeedStrategy::Entropy => aux.gen(),
                };
                Self {
                    value,
                    mode: SeedMode::Random,
                    strategy: Some(strategy),
                    drawn_at: now,
                }
            }
        }
    }
}

/// Numeric `ddmmYYYYHHMMSS` rendering of `now`.
pub fn timestamp_number(now: NaiveDateTime) -> u64 {
    // Every field is zero-padded decimal, so the string always parses.
    now.format("%d%m%Y%H%M%S")
        .to_string()
        .parse()
        .unwrap_or_default()
}

/// Mix the timestamp with `factor`; floor of `stamp / 20 * factor`.
pub fn timestamp_seed(now: NaiveDateTime, factor: u64) -> u64 {
    let stamp = u128::from(timestamp_number(now));
    let mixed = stamp * u128::from(factor) / u128::from(TIMESTAMP_DIVISOR);
    u64::try_from(mixed).unwrap_or(u64::MAX)
}
