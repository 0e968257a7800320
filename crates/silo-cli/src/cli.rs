use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use silo_types::{ChecksumType, Range};

#[derive(Parser)]
#[command(name = "silo", about = "Silo content-addressed object node", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the object node
    Serve(ServeArgs),
    /// Print the default node configuration
    Config,
    /// Hash ranges of a local file the way the node answers range-hash calls
    Hash(HashArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Path to the node configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashArgs {
    pub file: PathBuf,
    /// Checksum algorithm: sha256 or tz
    #[arg(short = 't', long = "type", default_value = "sha256")]
    pub kind: ChecksumType,
    /// Hex salt, repeated from the start of every range
    #[arg(long)]
    pub salt: Option<String>,
    /// Range as offset:length; repeatable. Defaults to the whole file.
    #[arg(short, long = "range")]
    pub ranges: Vec<Range>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hash_with_ranges() {
        let cli = Cli::try_parse_from([
            "silo", "hash", "data.bin", "--type", "tz", "--salt", "abcd", "-r", "0:4", "-r", "8:8",
        ])
        .unwrap();
        let Command::Hash(args) = cli.command else {
            panic!("expected hash");
        };
        assert_eq!(args.kind, ChecksumType::TillichZemor);
        assert_eq!(args.salt.as_deref(), Some("abcd"));
        assert_eq!(args.ranges, vec![Range::new(0, 4), Range::new(8, 8)]);
    }

    #[test]
    fn parse_serve_verbose() {
        let cli = Cli::try_parse_from(["silo", "-v", "serve", "--config", "node.toml"]).unwrap();
        assert!(cli.verbose);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.config, Some(PathBuf::from("node.toml")));
    }

    #[test]
    fn bad_range_rejected() {
        assert!(Cli::try_parse_from(["silo", "hash", "f", "-r", "4"]).is_err());
    }
}
