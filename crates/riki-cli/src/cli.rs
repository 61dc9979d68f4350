use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use riki_diff::DiffStrategy;

#[derive(Parser)]
#[command(
    name = "riki",
    about = "Riki page history: compare page versions and serve edit history",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the changes between two versions of a page
    Diff(DiffArgs),
    /// Start the page history server
    Serve(ServeArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    Auto,
    Table,
    Myers,
}

impl From<StrategyArg> for DiffStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => DiffStrategy::Auto,
            StrategyArg::Table => DiffStrategy::Table,
            StrategyArg::Myers => DiffStrategy::Myers,
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// The earlier version
    pub old: PathBuf,
    /// The later version
    pub new: PathBuf,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
    #[arg(long, default_value = "auto")]
    pub strategy: StrategyArg,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address, overriding the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Snapshot directory, overriding the config file
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_diff_with_defaults() {
        let cli = Cli::try_parse_from(["riki", "diff", "a.txt", "b.txt"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Command::Diff(args) => {
                assert_eq!(args.old, PathBuf::from("a.txt"));
                assert_eq!(args.format, OutputFormat::Text);
                assert_eq!(args.strategy, StrategyArg::Auto);
            }
            Command::Serve(_) => panic!("expected diff"),
        }
    }

    #[test]
    fn parses_diff_options() {
        let cli = Cli::try_parse_from([
            "riki", "diff", "a", "b", "--format", "json", "--strategy", "myers", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Diff(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(DiffStrategy::from(args.strategy), DiffStrategy::Myers);
            }
            Command::Serve(_) => panic!("expected diff"),
        }
    }

    #[test]
    fn parses_serve() {
        let cli = Cli::try_parse_from(["riki", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
                assert!(args.config.is_none());
            }
            Command::Diff(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["riki", "diff", "a", "b", "--format", "xml"]).is_err());
    }

    #[test]
    fn rejects_bad_bind_address() {
        assert!(Cli::try_parse_from(["riki", "serve", "--bind", "nowhere"]).is_err());
    }
}
