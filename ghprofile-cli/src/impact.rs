use std::sync::Arc;

use clap::{Arg, ArgGroup, Command};
use ghprofile_core::github::validate_username;
use ghprofile_core::{Context, GitHubClient, ProfileService, Result, ScoringService};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("ghprofile-impact")
        .version("0.1.0")
        .about("Impact score from a user's recent GitHub events")
        .author("GhProfile Team")
        .arg(Arg::new("username").help("GitHub username to fetch events for"))
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .value_name("EVENTS_JSON")
                .help("Score events from a JSON file instead of the GitHub API"),
        )
        .group(
            ArgGroup::new("source")
                .args(["username", "file"])
                .required(true),
        )
        .get_matches();

    // Initialize context from environment
    let ctx = Context::from_env()?;
    ctx.init_tracing();

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    let score = if let Some(path) = matches.get_one::<String>("file") {
        let data = std::fs::read_to_string(path)?;
        let events: serde_json::Value = serde_json::from_str(&data)?;
        let score = ScoringService::new().calculate_impact_score_value(&events);
        info!("Scored events from {}", path);
        score
    } else {
        let username = validate_username(
            matches
                .get_one::<String>("username")
                .map(String::as_str)
                .unwrap_or_default(),
        )?;
        let profiles = ProfileService::new(Arc::new(GitHubClient::new(&ctx)?));
        profiles.impact_score(username).await?
    };

    println!("{}", score);

    Ok(())
}
