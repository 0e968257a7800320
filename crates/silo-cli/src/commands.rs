use anyhow::Context;
use colored::Colorize;
use silo_object::RangeHasher;
use silo_server::{NodeConfig, SiloServer};
use silo_types::Range;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Config => cmd_config(),
        Command::Hash(args) => cmd_hash(args, &cli.format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => NodeConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => NodeConfig::default(),
    };
    println!(
        "{} silo node on {} ({} storage, epoch {})",
        "▶".green().bold(),
        config.server.bind_addr.to_string().bold(),
        config.storage.backend.name().cyan(),
        config.network.epoch
    );
    let server = SiloServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    print!("{}", NodeConfig::default().to_toml()?);
    Ok(())
}

fn cmd_hash(args: HashArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let data = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let salt = match &args.salt {
        Some(s) => hex::decode(s).context("salt must be hex")?,
        None => Vec::new(),
    };
    let ranges = if args.ranges.is_empty() {
        vec![Range::new(0, data.len() as u64)]
    } else {
        args.ranges
    };

    let digests = RangeHasher::new(args.kind).hash_ranges(&data, &ranges, &salt)?;
    match format {
        OutputFormat::Text => {
            for (range, digest) in ranges.iter().zip(&digests) {
                println!("{}  {}", range.to_string().yellow(), hex::encode(digest));
            }
        }
        OutputFormat::Json => {
            let out: Vec<_> = ranges
                .iter()
                .zip(&digests)
                .map(|(range, digest)| {
                    serde_json::json!({
                        "range": range.to_string(),
                        "checksum": args.kind.name(),
                        "digest": hex::encode(digest),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
