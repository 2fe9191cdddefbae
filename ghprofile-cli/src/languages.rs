use std::sync::Arc;

use clap::{Arg, Command};
use ghprofile_core::github::validate_username;
use ghprofile_core::{Context, GitHubClient, LanguageService, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("ghprofile-languages")
        .version("0.1.0")
        .about("Language usage breakdown across a user's repositories")
        .author("GhProfile Team")
        .arg(Arg::new("username").required(true).help("GitHub username"))
        .get_matches();

    // Initialize context from environment
    let ctx = Context::from_env()?;
    ctx.init_tracing();

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    let username = validate_username(
        matches
            .get_one::<String>("username")
            .map(String::as_str)
            .unwrap_or_default(),
    )?;

    let start_time = std::time::Instant::now();
    let client = GitHubClient::new(&ctx)?;
    let service = LanguageService::new(Arc::new(client));

    let distribution = service.get_language_distribution(username).await?;

    info!("Language distribution for {} computed in {:?}", username, start_time.elapsed());
    println!("{}", serde_json::to_string_pretty(&distribution)?);

    Ok(())
}
