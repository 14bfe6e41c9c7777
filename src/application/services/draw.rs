//! Draw service
//!
//! Runs the whole pipeline for one competition: load the two input
//! documents, draw with a single seeded sampler, render the report and
//! record, and only then write them to the output directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::application::record::{DrawRecord, RecordInputs};
use crate::application::report::render_report;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    Competition, CountTree, Draw, DrawOrder, ItemTree, ResolvedSeed, Sampler, Totals,
};
use crate::infrastructure::traits::{Clock, FileSystem};

/// Parameters of one draw.
#[derive(Debug, Clone)]
pub struct DrawRequest {
    /// Eligible dances per category
    pub dances: PathBuf,
    /// Requested number of dances per category
    pub competition: PathBuf,
    /// Directory receiving report and record
    pub output_dir: PathBuf,
    /// Competition display name
    pub name: String,
    /// Seed to replay, if any
    pub forced_seed: Option<u64>,
    /// Overrides the configured draw order
    pub order: Option<DrawOrder>,
    /// Overrides the configured record setting
    pub write_record: Option<bool>,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub draw: Draw,
    pub order: DrawOrder,
    pub report_path: PathBuf,
    pub record_path: Option<PathBuf>,
}

/// Service running draws.
pub struct DrawService {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    settings: Arc<Settings>,
}

impl DrawService {
    /// Create a new draw service.
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>, settings: Arc<Settings>) -> Self {
        Self {
            fs,
            clock,
            settings,
        }
    }

    /// Effective draw order for a request.
    pub fn order_for(&self, request: &DrawRequest) -> DrawOrder {
        request.order.unwrap_or(self.settings.draw.order)
    }

    /// Resolve the run's seed from the wall clock and the thread generator.
    pub fn resolve_seed(&self, forced: Option<u64>) -> ResolvedSeed {
        let seed = ResolvedSeed::resolve(
            forced,
            self.settings.draw.seed_strategy,
            self.clock.now(),
            &mut rand::thread_rng(),
        );
        info!("seed {} ({})", seed.value, seed.mode);
        seed
    }

    fn load_json(&self, path: &Path) -> ApplicationResult<Value> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read input", path)?;
        serde_json::from_str(&content).map_err(|e| ApplicationError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the eligible-dances document.
    pub fn load_items(&self, path: &Path) -> ApplicationResult<ItemTree> {
        let value = self.load_json(path)?;
        let items = ItemTree::items_from_json(&value).map_err(|error| {
            ApplicationError::InvalidInput {
                source_file: path.to_path_buf(),
                error,
            }
        })?;
        debug!("load_items: {} categories from {}", items.leaves().len(), path.display());
        Ok(items)
    }

    /// Load the requested-counts document.
    pub fn load_counts(&self, path: &Path) -> ApplicationResult<CountTree> {
        let value = self.load_json(path)?;
        let counts = CountTree::counts_from_json(&value).map_err(|error| {
            ApplicationError::InvalidInput {
                source_file: path.to_path_buf(),
                error,
            }
        })?;
        debug!("load_counts: {} requested from {}", counts.total(), path.display());
        Ok(counts)
    }

    /// Validate both inputs and return the requested totals without writing anything.
    ///
    /// The draw itself is rehearsed with the given seed so that missing
    /// categories and over-draws surface here as well.
    #[instrument(skip(self))]
    pub fn check(&self, request: &DrawRequest, seed: u64) -> ApplicationResult<Totals> {
        let items = self.load_items(&request.dances)?;
        let counts = self.load_counts(&request.competition)?;
        Sampler::new(seed, self.order_for(request)).draw(&items, &counts)?;
        Ok(Totals::from_counts(&counts))
    }

    /// Draw in memory; nothing is written.
    #[instrument(skip(self, seed), fields(seed = seed.value))]
    pub fn draw(&self, request: &DrawRequest, seed: ResolvedSeed) -> ApplicationResult<Draw> {
        let items = self.load_items(&request.dances)?;
        let counts = self.load_counts(&request.competition)?;
        let totals = Totals::from_counts(&counts);
        if !totals.has_draws() {
            warn!("no dances requested in {}", request.competition.display());
        }

        let mut sampler = Sampler::new(seed.value, self.order_for(request));
        let drawn = sampler.draw(&items, &counts)?;

        Ok(Draw {
            competition: Competition::new(request.name.clone()),
            seed,
            totals,
            drawn,
        })
    }

    /// Full run: draw, render, then write report and record.
    ///
    /// Either every output file is written or none is.
    #[instrument(skip(self, seed), fields(seed = seed.value))]
    pub fn run(&self, request: &DrawRequest, seed: ResolvedSeed) -> ApplicationResult<DrawOutcome> {
        if !self.fs.is_dir(&request.output_dir) {
            return Err(ApplicationError::OutputDirMissing(request.output_dir.clone()));
        }

        let order = self.order_for(request);
        let draw = self.draw(request, seed)?;

        let stem = draw
            .competition
            .file_stem(&self.settings.output.file_prefix, draw.seed.value);
        let report_path = request.output_dir.join(format!("{stem}.md"));
        let report = render_report(&draw, &self.settings.report, order);

        let write_record = request
            .write_record
            .unwrap_or(self.settings.output.write_record);
        let record = if write_record {
            let inputs = RecordInputs {
                dances: &request.dances,
                competition: &request.competition,
            };
            let json = DrawRecord::new(&draw, order, inputs).to_json()?;
            Some((request.output_dir.join(format!("{stem}.json")), json))
        } else {
            None
        };

        self.write_output(&report_path, &report)?;
        if let Some((path, json)) = &record {
            if let Err(e) = self.write_output(path, json) {
                // Leave no report behind without its record.
                if let Err(cleanup) = self.fs.remove_file(&report_path) {
                    warn!("could not remove {}: {}", report_path.display(), cleanup);
                }
                return Err(e);
            }
        }

        Ok(DrawOutcome {
            draw,
            order,
            report_path,
            record_path: record.map(|(path, _)| path),
        })
    }

    fn write_output(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        if self.fs.exists(path) {
            warn!("overwriting {}", path.display());
        }
        self.fs
            .write(path, content)
            .with_path_context("write output", path)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}
