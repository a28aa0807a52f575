use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use foafhub::crawl::Crawler;
use foafhub::graph::{write_ntriples, write_rdfxml, Vocabulary};
use foafhub::platform::{GitHubConnector, Quota};
use foafhub::{Config, EntityKind, EntityRef};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Ntriples,
    Rdfxml,
}

#[derive(Parser, Debug)]
#[command(name = "foafhub")]
#[command(about = "Crawl the GitHub social graph around a seed entity and write it as RDF")]
struct Args {
    /// Login of an account or organization, or owner/name of a repository
    #[arg(short, long)]
    seed: String,

    /// Kind of the seed entity (account, organization, repository)
    #[arg(short, long, default_value = "account")]
    kind: EntityKind,

    /// Output file
    #[arg(short, long, default_value = "graph.nt")]
    output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Format::Ntriples)]
    format: Format,

    /// Config file (defaults to FOAFHUB_CONFIG or ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override crawl.max_iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Override every per-relation fan-out limit
    #[arg(long)]
    fan_out: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    log::info!("Starting foafhub v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref())?;
    let mut limits = config.crawl_limits();
    if let Some(max_iterations) = args.max_iterations {
        anyhow::ensure!(max_iterations > 0, "--max-iterations must be greater than 0");
        limits.max_iterations = max_iterations;
    }
    if let Some(fan_out) = args.fan_out {
        limits.max_following = fan_out;
        limits.max_repos = fan_out;
        limits.max_organizations = fan_out;
        limits.max_members = fan_out;
        limits.max_contributors = fan_out;
    }

    let token = config.github_token();
    if token.is_none() {
        log::warn!(
            "{} not set; crawling unauthenticated with a much smaller quota",
            config.github.token_env
        );
    }

    let connector = GitHubConnector::new(config.github.clone(), token);
    let mut crawler = Crawler::connect(
        Box::new(connector),
        Vocabulary::new(config.namespaces.clone()),
        limits,
        config.rate_pacer(),
    )
    .await
    .context("Failed to connect to the GitHub API")?;

    print_quota("before crawl", crawler.quota());

    let seed = EntityRef::new(args.kind, args.seed);
    log::info!("Crawling from {}", seed);
    let outcome = crawler.crawl(seed).await?;

    print_quota("after crawl", crawler.quota());

    let report = &outcome.report;
    println!(
        "Described {} entities ({} iterations, {} closed), discovered {}, {} triples",
        report.described, report.iterations, report.queue_size, report.discovered, report.triples
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} entities:", report.skipped.len());
        for skipped in &report.skipped {
            println!("  [{}] {}: {}", skipped.phase, skipped.entity, skipped.reason);
        }
    }
    if report.reconnects > 0 || report.cooldowns > 0 {
        println!("Reconnects: {}, cooldowns: {}", report.reconnects, report.cooldowns);
    }

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    match args.format {
        Format::Ntriples => write_ntriples(&outcome.graph, &mut out)?,
        Format::Rdfxml => write_rdfxml(&outcome.graph, &mut out)?,
    }
    out.flush()?;
    log::info!("Wrote {} triples to {}", outcome.graph.len(), args.output.display());

    Ok(())
}

/// Explicit path, then `Config::load` if a config is present, else defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        let _ = dotenv::dotenv();
        return Config::load_from(path);
    }
    if std::env::var_os("FOAFHUB_CONFIG").is_some() || Path::new("config.toml").exists() {
        return Config::load();
    }
    let _ = dotenv::dotenv();
    log::info!("No config.toml found, using defaults");
    Ok(Config::default())
}

fn print_quota(label: &str, quota: Quota) {
    match quota.reset_at {
        Some(reset) => println!(
            "Quota {}: {}/{} requests left, resets at {}",
            label,
            quota.remaining,
            quota.limit,
            reset.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => println!("Quota {}: {}/{} requests left", label, quota.remaining, quota.limit),
    }
}
