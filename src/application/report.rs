//! Markdown report of a draw.
//!
//! The report carries one heading per category level and a numbered list
//! per drawn leaf, followed by the technical details needed to replay it.

use std::fmt::Write as _;

use crate::config::ReportConfig;
use crate::domain::{CategoryTree, Draw, DrawOrder, DrawTree, SeedMode, GENERATOR_NAME};

/// Deepest markdown heading level.
const MAX_HEADING: usize = 6;

/// Render the full report for `draw`.
pub fn render_report(draw: &Draw, report: &ReportConfig, order: DrawOrder) -> String {
    let mut out = String::new();

    if let Some(logo) = &report.logo {
        let _ = writeln!(out, "![Logo]({logo})");
    }
    let _ = writeln!(out, "# {} {}\n", report.heading, draw.competition.title());

    if draw.drawn.is_empty() {
        out.push_str("_No dances were requested._\n\n");
    } else {
        render_node(&draw.drawn, 1, &mut out);
    }

    out.push_str(&render_technical_details(draw, report, order));
    out
}

fn heading(depth: usize) -> String {
    "#".repeat((depth + 1).min(MAX_HEADING))
}

fn render_node(node: &DrawTree, depth: usize, out: &mut String) {
    for (key, child) in node.children() {
        match child {
            CategoryTree::Leaf(items) => {
                let _ = writeln!(out, "{} {}", heading(depth), key);
                for (i, item) in items.iter().enumerate() {
                    let _ = writeln!(out, "{}. {}", i + 1, item);
                }
                out.push('\n');
            }
            CategoryTree::Branch(_) => {
                let _ = writeln!(out, "{} {}\n", heading(depth), key);
                render_node(child, depth + 1, out);
            }
        }
    }
}

fn render_technical_details(draw: &Draw, report: &ReportConfig, order: DrawOrder) -> String {
    let seed = &draw.seed;
    let mode = match (seed.mode, seed.strategy) {
        (SeedMode::Random, Some(strategy)) => format!("{} ({})", seed.mode, strategy),
        _ => seed.mode.to_string(),
    };

    let mut out = String::new();
    out.push_str("# Technical Details\n\n");
    let _ = writeln!(
        out,
        "This draw was performed using {} {}.\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    out.push_str("| Setting | Value |\n|---|---|\n");
    let _ = writeln!(out, "| Draw time | `{}` |", seed.drawn_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "| Randomiser | `{}` |", GENERATOR_NAME);
    let _ = writeln!(out, "| Draw order | `{}` |", order);
    let _ = writeln!(out, "| Seed mode | `{}` |", mode);
    let _ = writeln!(out, "| Randomiser seed | `{}` |", seed.value);
    let _ = writeln!(out, "| Dances drawn | `{}` |", draw.totals.grand_total());

    if let Some(url) = &report.source_url {
        let _ = writeln!(out, "\nThe code for this program can be found at [{url}]({url})");
    }
    out
}
