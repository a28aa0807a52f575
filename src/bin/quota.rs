use anyhow::{Context, Result};
use foafhub::platform::GitHubConnector;
use foafhub::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "warn")
    ).init();

    let _ = dotenv::dotenv();
    let config = if std::path::Path::new("config.toml").exists() || std::env::var_os("FOAFHUB_CONFIG").is_some() {
        Config::load()?
    } else {
        Config::default()
    };

    let authenticated = config.github_token().is_some();
    let client = GitHubConnector::new(config.github.clone(), config.github_token()).client()?;
    let quota = client
        .rate_limit()
        .await
        .context("Failed to query /rate_limit")?;

    println!("GitHub API: {}", config.github.api_url);
    println!("Authenticated: {}", if authenticated { "yes" } else { "no" });
    println!("Remaining: {}/{}", quota.remaining, quota.limit);
    if let Some(reset) = quota.reset_at {
        let wait = reset - chrono::Utc::now();
        println!(
            "Resets at: {} (in {} min)",
            reset.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S"),
            wait.num_minutes().max(0)
        );
    }

    Ok(())
}
