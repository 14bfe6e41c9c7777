//! Machine-readable reproducibility record.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Draw, DrawOrder, DrawTree, SeedMode, SeedStrategy, TotalEntry, GENERATOR_NAME};

/// Everything needed to replay and audit a draw.
#[derive(Debug, Serialize)]
pub struct DrawRecord<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub competition: &'a str,
    pub seed: u64,
    pub seed_mode: SeedMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_strategy: Option<SeedStrategy>,
    pub drawn_at: NaiveDateTime,
    pub generator: &'static str,
    pub order: DrawOrder,
    pub inputs: RecordInputs<'a>,
    pub totals: &'a [TotalEntry],
    pub draws: &'a DrawTree,
}

/// Input documents the draw was made from.
#[derive(Debug, Serialize)]
pub struct RecordInputs<'a> {
    pub dances: &'a Path,
    pub competition: &'a Path,
}

impl<'a> DrawRecord<'a> {
    pub fn new(draw: &'a Draw, order: DrawOrder, inputs: RecordInputs<'a>) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            competition: &draw.competition.name,
            seed: draw.seed.value,
            seed_mode: draw.seed.mode,
            seed_strategy: draw.seed.strategy,
            drawn_at: draw.seed.drawn_at,
            generator: GENERATOR_NAME,
            order,
            inputs,
            totals: draw.totals.entries(),
            draws: &draw.drawn,
        }
    }

    pub fn to_json(&self) -> ApplicationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize draw record".to_string(),
            source: Box::new(e),
        })
    }
}
