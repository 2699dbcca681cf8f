pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::focus::FocusArgs;
use commands::gaps::GapsArgs;
use commands::impact::ImpactArgs;
use commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "partnerfit",
    about = "Partnerfit operator CLI",
    long_about = "Inspect configuration, load the sample catalog, and query partner recommendations, \
                  maturity gaps, market impact and the ecosystem dashboard.",
    after_help = "Examples:\n  partnerfit seed\n  partnerfit recommend --store store-fashion-001 --limit 3\n  \
                  partnerfit focus --store store-home-003 --stage navigation,analytics"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Load the sample stores and partners into the configured storage")]
    Seed,
    #[command(about = "Rank partners for a store by final score")]
    Recommend(RecommendArgs),
    #[command(about = "Estimate a store's maturity per commerce stage and list its gaps")]
    Gaps(GapsArgs),
    #[command(about = "Group a store's recommendations by commerce stage")]
    Focus(FocusArgs),
    #[command(about = "Measure how many stores a partner is a potential match for")]
    Impact(ImpactArgs),
    #[command(about = "Summarize stores and partners across the ecosystem")]
    Dashboard,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Seed => commands::seed::run(),
        Command::Recommend(args) => commands::recommend::run(args),
        Command::Gaps(args) => commands::gaps::run(args),
        Command::Focus(args) => commands::focus::run(args),
        Command::Impact(args) => commands::impact::run(args),
        Command::Dashboard => commands::dashboard::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use partnerfit_core::domain::taxonomy::CommerceStage;

    use super::{Cli, Command};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn focus_accepts_comma_separated_stages() {
        let cli = Cli::try_parse_from([
            "partnerfit",
            "focus",
            "--store",
            "store-home-003",
            "--stage",
            "navigation,analytics",
        ])
        .expect("valid arguments");

        let Command::Focus(args) = cli.command else {
            panic!("expected focus command");
        };
        assert_eq!(args.stages, vec![CommerceStage::Navigation, CommerceStage::Analytics]);
    }

    #[test]
    fn unknown_stage_is_rejected_by_the_parser() {
        let parsed =
            Cli::try_parse_from(["partnerfit", "focus", "--store", "s", "--stage", "teleport"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn recommend_flags_are_optional() {
        let cli = Cli::try_parse_from(["partnerfit", "recommend", "--store", "s"])
            .expect("valid arguments");
        let Command::Recommend(args) = cli.command else {
            panic!("expected recommend command");
        };
        assert_eq!(args.limit, None);
        assert_eq!(args.min_score, None);
    }
}
