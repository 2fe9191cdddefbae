use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Command;
use ghprofile_core::constants::OK;
use ghprofile_core::github::validate_username;
use ghprofile_core::{
    Context, GhProfileError, GitHubClient, LeaderboardService, ProfileService, Result, SharedLeaderboard,
};
use serde::Deserialize;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::Filter;

#[derive(Clone)]
struct AppState {
    profiles: Arc<ProfileService>,
    board: SharedLeaderboard,
    top_limit: usize,
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
}

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

#[tokio::main]
async fn main() -> Result<()> {
    let _matches = Command::new("ghprofile-api")
        .version("0.1.0")
        .about("GhProfile HTTP API server")
        .author("GhProfile Team")
        .get_matches();

    // Initialize context from environment
    let ctx = Context::from_env()?;
    ctx.init_tracing();

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    let addr: SocketAddr = format!("{}:{}", ctx.api_host, ctx.api_port).parse()?;

    let state = AppState {
        profiles: Arc::new(ProfileService::new(Arc::new(GitHubClient::new(&ctx)?))),
        board: LeaderboardService::shared(),
        top_limit: ctx.top_limit,
    };

    let health = warp::path!("api" / "v1" / "health")
        .and(warp::get())
        .map(|| {
            warp::reply::json(&serde_json::json!({
                "status": OK,
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now()
            }))
        });

    let languages = warp::path!("api" / "v1" / "languages" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(languages_handler);

    let score = warp::path!("api" / "v1" / "score" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(score_handler);

    let profile = warp::path!("api" / "v1" / "profile" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(profile_handler);

    let leaderboard = warp::path!("api" / "v1" / "leaderboard")
        .and(warp::get())
        .and(warp::query::<LeaderboardQuery>())
        .and(with_state(state))
        .and_then(leaderboard_handler);

    let routes = health.or(languages).or(score).or(profile).or(leaderboard);

    info!("API endpoints:");
    info!("  GET /api/v1/health - Health check");
    info!("  GET /api/v1/languages/{{user}} - Language distribution");
    info!("  GET /api/v1/score/{{user}} - Impact score, updates the leaderboard");
    info!("  GET /api/v1/profile/{{user}} - Languages and impact score, updates the leaderboard");
    info!("  GET /api/v1/leaderboard?limit=N - Top users");
    info!("GhProfile API server listening on {}", addr);

    warp::serve(routes).run(addr).await;

    Ok(())
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn reply(body: serde_json::Value, status: StatusCode) -> JsonReply {
    warp::reply::with_status(warp::reply::json(&body), status)
}

fn error_reply(what: &str, username: &str, err: GhProfileError) -> JsonReply {
    error!("{} for {} failed: {}", what, username, err);
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    reply(serde_json::json!({ "error": err.to_string() }), status)
}

async fn languages_handler(username: String, state: AppState) -> std::result::Result<JsonReply, Infallible> {
    let result = match validate_username(&username) {
        Ok(username) => state.profiles.languages().get_language_distribution(username).await,
        Err(err) => Err(err),
    };

    Ok(match result {
        Ok(distribution) => reply(
            serde_json::json!({ "username": username, "languages": distribution }),
            StatusCode::OK,
        ),
        Err(err) => error_reply("Language distribution", &username, err),
    })
}

async fn score_handler(username: String, state: AppState) -> std::result::Result<JsonReply, Infallible> {
    let result = match validate_username(&username) {
        Ok(username) => state.profiles.impact_score(username).await,
        Err(err) => Err(err),
    };

    Ok(match result {
        Ok(score) => {
            let entry = state.board.write().await.add_or_update(&username, score);
            reply(serde_json::json!(entry), StatusCode::OK)
        }
        Err(err) => error_reply("Impact score", &username, err),
    })
}

async fn profile_handler(username: String, state: AppState) -> std::result::Result<JsonReply, Infallible> {
    let result = match validate_username(&username) {
        Ok(username) => state.profiles.profile(username).await,
        Err(err) => Err(err),
    };

    Ok(match result {
        Ok(profile) => {
            state
                .board
                .write()
                .await
                .add_or_update(&profile.username, profile.impact_score);
            reply(serde_json::json!(profile), StatusCode::OK)
        }
        Err(err) => error_reply("Profile", &username, err),
    })
}

async fn leaderboard_handler(
    query: LeaderboardQuery,
    state: AppState,
) -> std::result::Result<JsonReply, Infallible> {
    let board = state.board.read().await;
    let top = board.get_top(query.limit.unwrap_or(state.top_limit));
    Ok(reply(
        serde_json::json!({ "size": board.size(), "entries": top }),
        StatusCode::OK,
    ))
}
