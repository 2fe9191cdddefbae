use std::sync::Arc;

use clap::{value_parser, Arg, ArgAction, Command};
use ghprofile_core::github::is_valid_username;
use ghprofile_core::{Context, GitHubClient, LeaderboardService, ProfileService, Result};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("ghprofile-leaderboard")
        .version("0.1.0")
        .about("Rank GitHub users by impact score")
        .author("GhProfile Team")
        .arg(
            Arg::new("users")
                .action(ArgAction::Append)
                .help("Usernames to rank, defaults to the GHPROFILE_USERS_YAML list"),
        )
        .arg(
            Arg::new("top")
                .long("top")
                .short('n')
                .value_parser(value_parser!(usize))
                .help("Number of entries to print"),
        )
        .get_matches();

    // Initialize context from environment
    let ctx = Context::from_env()?;
    ctx.init_tracing();

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    let requested: Vec<String> = match matches.get_many::<String>("users") {
        Some(users) => users.cloned().collect(),
        None => {
            info!("Reading users from {}", ctx.users_yaml);
            ctx.load_users()?
        }
    };

    let users: Vec<String> = requested
        .into_iter()
        .filter(|user| {
            let valid = is_valid_username(user);
            if !valid {
                warn!("Ignoring invalid username: {}", user);
            }
            valid
        })
        .collect();

    let top = matches.get_one::<usize>("top").copied().unwrap_or(ctx.top_limit);

    let start_time = std::time::Instant::now();
    let profiles = ProfileService::new(Arc::new(GitHubClient::new(&ctx)?));
    let mut board = LeaderboardService::new();
    let ranked = profiles.rank(&users, &mut board).await;

    info!("Ranked {} of {} users in {:?}", ranked.len(), users.len(), start_time.elapsed());
    println!("{}", serde_json::to_string_pretty(&board.get_top(top))?);

    Ok(())
}
