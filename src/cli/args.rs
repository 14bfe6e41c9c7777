//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};

use crate::domain::DrawOrder;

/// Draw pattern dances for a competition, reproducibly
#[derive(Parser, Debug)]
#[command(name = "dance-draw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON file containing all dances for the current season
    #[arg(value_hint = ValueHint::FilePath, required_unless_present_any = STANDALONE)]
    pub dances: Option<PathBuf>,

    /// JSON file containing the number of dances to draw in each category
    #[arg(value_hint = ValueHint::FilePath, required_unless_present_any = STANDALONE)]
    pub competition: Option<PathBuf>,

    /// Folder to write the draw to (files are named after competition and seed)
    #[arg(value_hint = ValueHint::DirPath, required_unless_present_any = STANDALONE)]
    pub output_folder: Option<PathBuf>,

    /// Name of the competition (quote names containing spaces)
    #[arg(required_unless_present_any = STANDALONE)]
    pub competition_name: Option<String>,

    /// Provide a seed to replicate a given draw
    #[arg(short, long, value_name = "SEED")]
    pub force_seed: Option<u64>,

    /// Listing order of drawn dances (default from config)
    #[arg(short, long, value_enum)]
    pub order: Option<OrderArg>,

    /// Settings file (TOML), layered over the global config
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Validate inputs and show requested totals without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Do not write the JSON reproducibility record
    #[arg(long)]
    pub no_record: bool,

    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print a commented configuration template and exit
    #[arg(long)]
    pub config_template: bool,
}

/// Flags that run without the positional draw arguments.
const STANDALONE: [&str; 3] = ["completions", "show_config", "config_template"];

/// Draw order as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    /// Order produced by the random draw
    Selection,
    /// Order of the eligible dance list
    Original,
}

impl From<OrderArg> for DrawOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Selection => DrawOrder::Selection,
            OrderArg::Original => DrawOrder::Original,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(seed: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from([
            "dance-draw",
            "dances.json",
            "club.json",
            "out",
            "Club Cup",
            "-f",
            seed,
        ])
    }

    #[rstest]
    #[case("abc")]
    #[case("-1")]
    #[case("4.2")]
    #[case("18446744073709551616")]
    fn given_non_integer_forced_seed_when_parsing_then_usage_error(#[case] seed: &str) {
        let err = parse(seed).unwrap_err();
        // main exits with USAGE for errors printed to stderr
        assert!(err.use_stderr(), "{err}");
    }

    #[test]
    fn given_integer_forced_seed_when_parsing_then_accepted() {
        assert_eq!(parse("18446744073709551615").unwrap().force_seed, Some(u64::MAX));
    }

    #[test]
    fn given_standalone_flag_when_parsing_then_positionals_are_optional() {
        let cli = Cli::try_parse_from(["dance-draw", "--config-template"]).unwrap();
        assert!(cli.config_template);
        assert!(cli.dances.is_none());
    }

    #[test]
    fn given_missing_positionals_when_parsing_then_usage_error() {
        let err = Cli::try_parse_from(["dance-draw", "dances.json"]).unwrap_err();
        assert!(err.use_stderr());
    }
}
