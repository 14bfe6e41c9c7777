//! Command execution

use std::io::{self, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{DrawOutcome, DrawRequest};
use crate::cli::args::Cli;
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::SeedMode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Dispatch the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.completions {
        return print_completions(shell);
    }
    if cli.config_template {
        output::info(&Settings::template());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);
    if cli.show_config {
        output::info(&settings.to_toml()?);
        return Ok(());
    }

    let request = build_request(cli)?;
    let container = ServiceContainer::new(settings);

    if cli.dry_run {
        dry_run(&container, &request)
    } else {
        draw(&container, &request)
    }
}

fn build_request(cli: &Cli) -> CliResult<DrawRequest> {
    fn required<T: Clone>(value: &Option<T>, name: &str) -> CliResult<T> {
        value
            .clone()
            .ok_or_else(|| CliError::InvalidArgs(format!("missing {name}")))
    }

    let name: String = required(&cli.competition_name, "COMPETITION_NAME")?;
    if name.trim().is_empty() {
        return Err(CliError::InvalidArgs(
            "COMPETITION_NAME must not be empty".to_string(),
        ));
    }

    Ok(DrawRequest {
        dances: required::<PathBuf>(&cli.dances, "DANCES")?,
        competition: required::<PathBuf>(&cli.competition, "COMPETITION")?,
        output_dir: required::<PathBuf>(&cli.output_folder, "OUTPUT_FOLDER")?,
        name,
        forced_seed: cli.force_seed,
        order: cli.order.map(Into::into),
        write_record: cli.no_record.then_some(false),
    })
}

#[instrument(skip(container))]
fn draw(container: &ServiceContainer, request: &DrawRequest) -> CliResult<()> {
    let service = &container.draw_service;
    let seed = service.resolve_seed(request.forced_seed);
    if seed.mode == SeedMode::Random && seed.value == 0 {
        output::warning("random seed resolved to 0; re-run for a different draw");
    }

    let outcome = service.run(request, seed)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &DrawOutcome) {
    let draw = &outcome.draw;
    output::header(&format!("Dance draw: {}", draw.competition.title()));
    output::action("Seed", &format!("{} ({})", draw.seed.value, draw.seed.mode));
    output::action("Order", &outcome.order);
    output::action(
        "Drawn at",
        &draw.seed.drawn_at.format("%Y-%m-%d %H:%M:%S"),
    );
    if draw.drawn.is_empty() {
        output::warning("no dances were requested");
    } else {
        output::info(&draw.drawn.to_termtree(&draw.competition.title()));
    }
    output::success(&format!("report: {}", outcome.report_path.display()));
    if let Some(record) = &outcome.record_path {
        output::success_detail(&format!("record: {}", record.display()));
    }
}

#[instrument(skip(container))]
fn dry_run(container: &ServiceContainer, request: &DrawRequest) -> CliResult<()> {
    let seed = request.forced_seed.unwrap_or_default();
    let totals = container.draw_service.check(request, seed)?;

    output::header("Requested dances");
    for entry in totals.entries() {
        let indent = "  ".repeat(entry.path.depth().saturating_sub(1));
        let name = entry.path.name().unwrap_or_default();
        output::detail(&format!("{indent}{name}: {}", entry.total));
    }
    output::action("Total", &totals.grand_total());
    output::success("inputs are consistent; nothing written");
    Ok(())
}

fn print_completions(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, name, &mut buf);
    io::stdout()
        .write_all(&buf)
        .map_err(|e| InfraError::io("write completions", e))?;
    Ok(())
}
