//! # gnocco
//!
//! Command-line front end: resolve one name through the cache and the
//! configured resolution mode, optionally restoring and writing the cache
//! checkpoint around the lookup.

mod bootstrap;

use anyhow::Context;
use bootstrap::{init_logging, load_config};
use clap::Parser;
use gnocco_application::use_cases::AnswerQueryUseCase;
use gnocco_domain::{CliOverrides, DnsQuery, RecordType};
use gnocco_infrastructure::dns::cache::{CacheSink, DnsCache};
use gnocco_infrastructure::dns::resolver::ResolverBuilder;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "gnocco")]
#[command(version)]
#[command(about = "Caching stub and iterative DNS resolver")]
struct Cli {
    /// Name to resolve
    name: Option<String>,

    /// Record type: A, AAAA, CNAME, NS, MX, TXT, PTR, SOA or SRV
    #[arg(default_value = "A")]
    record_type: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Forward to upstream resolvers instead of iterating from the root
    #[arg(long)]
    stub: bool,

    /// Upstream resolver for stub mode (repeatable)
    #[arg(short = 'n', long = "nameserver")]
    nameservers: Vec<String>,

    /// Root hints file for iterative mode
    #[arg(long)]
    root_hints: Option<String>,

    /// Log level: trace, debug, info, warn or error
    #[arg(short, long)]
    log_level: Option<String>,

    /// Cache checkpoint restored at start and written at exit
    #[arg(long)]
    checkpoint: Option<String>,

    /// Print the cache contents after the lookup
    #[arg(long)]
    dump_cache: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            iterative: self.stub.then_some(false),
            nameservers: self.nameservers.clone(),
            root_hints: self.root_hints.clone(),
            log_level: self.log_level.clone(),
            checkpoint: self.checkpoint.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.overrides())?;
    init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting gnocco");

    let cache = Arc::new(DnsCache::new(&config.cache));
    let checkpoint = config.cache.checkpoint.as_ref().map(PathBuf::from);
    if let Some(path) = checkpoint.as_deref().filter(|p| p.exists()) {
        if let Err(e) = cache.load_from(path) {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable cache checkpoint");
        }
    }

    let resolver = ResolverBuilder::new(cache.clone())
        .with_config(config.resolver.clone())
        .build()
        .context("failed to build resolver")?;
    let answer_query = AnswerQueryUseCase::new(cache.clone(), Arc::new(resolver), config.handler.max_jobs);

    let mut status = ExitCode::SUCCESS;
    if let Some(name) = &cli.name {
        let record_type: RecordType = cli.record_type.parse().map_err(anyhow::Error::msg)?;
        let query = DnsQuery::new(name, record_type);
        let local = IpAddr::V4(Ipv4Addr::LOCALHOST);

        match answer_query.execute(local, &query).await {
            Ok(resolution) => {
                println!(
                    ";; {} ({}{})",
                    query,
                    if resolution.cache_hit { "cache" } else { "resolved" },
                    resolution
                        .upstream_server
                        .as_deref()
                        .map(|s| format!(" via {}", s))
                        .unwrap_or_default()
                );
                for record in resolution.records.iter() {
                    println!("{}", record);
                }
            }
            Err(e) => {
                eprintln!("{}: {}", query, e);
                status = ExitCode::FAILURE;
            }
        }
    }

    if cli.dump_cache {
        cache.dump_to(&CacheSink::Console)?;
    }
    if let Some(path) = checkpoint {
        write_checkpoint(&cache, &path);
    }

    Ok(status)
}

fn write_checkpoint(cache: &DnsCache, path: &Path) {
    if let Err(e) = cache.dump_to(&CacheSink::File(path.to_path_buf())) {
        warn!(path = %path.display(), error = %e, "Failed to write cache checkpoint");
    }
}
