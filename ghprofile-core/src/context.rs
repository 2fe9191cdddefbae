use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::constants::{
    DEFAULT_API_PORT, DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TOP_LIMIT,
    DEFAULT_USERS_YAML, DEFAULT_USER_AGENT, LOCALHOST, MAX_PER_PAGE,
};

/// Environment context packed in structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    // From GHPROFILE_API_URL, default https://api.github.com
    pub api_url: String,

    // From GHPROFILE_GITHUB_OAUTH, empty means unauthenticated requests
    #[serde(skip_serializing)]
    pub github_oauth: String,

    // From GHPROFILE_USER_AGENT, GitHub rejects requests without one
    pub user_agent: String,

    // From GHPROFILE_HTTP_TIMEOUT, seconds, default 30
    pub http_timeout_secs: u64,

    // From GHPROFILE_REPOS_PER_PAGE / GHPROFILE_EVENTS_PER_PAGE, 1..=100, default 100
    pub repos_per_page: u32,
    pub events_per_page: u32,

    // From GHPROFILE_INCLUDE_FORKS, count forked repositories in language stats? default false
    pub include_forks: bool,

    // From GHPROFILE_TOP, default leaderboard size for the CLI and API, default 10
    pub top_limit: usize,

    // From GHPROFILE_USERS_YAML, leaderboard users list, default "users.yaml"
    pub users_yaml: String,

    // API server bind configuration
    pub api_host: String, // From GHPROFILE_API_HOST, default "127.0.0.1"
    pub api_port: u16,    // From GHPROFILE_API_PORT, default 8080

    // From GHPROFILE_DEBUG Debug level: 0-no, 1-debug, 2-trace, default 0
    pub debug: i32,

    // From GHPROFILE_CTXOUT output all context data (this struct), default false
    pub ctx_out: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            api_url: DEFAULT_API_URL.to_string(),
            github_oauth: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            repos_per_page: MAX_PER_PAGE,
            events_per_page: MAX_PER_PAGE,
            include_forks: false,
            top_limit: DEFAULT_TOP_LIMIT,
            users_yaml: DEFAULT_USERS_YAML.to_string(),
            api_host: LOCALHOST.to_string(),
            api_port: DEFAULT_API_PORT,
            debug: 0,
            ctx_out: false,
        }
    }
}

/// Leaderboard users file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersFile {
    #[serde(default)]
    pub users: Vec<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load context from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build context from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ctx = Self::default();

        if let Some(api_url) = lookup("GHPROFILE_API_URL") {
            ctx.api_url = api_url;
        }
        url::Url::parse(&ctx.api_url)
            .with_context(|| format!("invalid GHPROFILE_API_URL: {}", ctx.api_url))?;

        if let Some(github_oauth) = lookup("GHPROFILE_GITHUB_OAUTH") {
            ctx.github_oauth = github_oauth.trim().to_string();
        }

        if let Some(user_agent) = lookup("GHPROFILE_USER_AGENT") {
            ctx.user_agent = user_agent;
        }

        if let Some(timeout) = lookup("GHPROFILE_HTTP_TIMEOUT") {
            ctx.http_timeout_secs = timeout.parse().unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        }

        if let Some(per_page) = lookup("GHPROFILE_REPOS_PER_PAGE") {
            ctx.repos_per_page = parse_per_page(&per_page);
        }

        if let Some(per_page) = lookup("GHPROFILE_EVENTS_PER_PAGE") {
            ctx.events_per_page = parse_per_page(&per_page);
        }

        if let Some(top) = lookup("GHPROFILE_TOP") {
            ctx.top_limit = top.parse().unwrap_or(DEFAULT_TOP_LIMIT);
        }

        if let Some(users_yaml) = lookup("GHPROFILE_USERS_YAML") {
            ctx.users_yaml = users_yaml;
        }

        if let Some(api_host) = lookup("GHPROFILE_API_HOST") {
            ctx.api_host = api_host;
        }

        if let Some(api_port) = lookup("GHPROFILE_API_PORT") {
            ctx.api_port = api_port.parse().unwrap_or(DEFAULT_API_PORT);
        }

        if let Some(debug) = lookup("GHPROFILE_DEBUG") {
            ctx.debug = debug.parse().unwrap_or(0);
        }

        // Boolean flags from environment
        ctx.include_forks = lookup("GHPROFILE_INCLUDE_FORKS").is_some();
        ctx.ctx_out = lookup("GHPROFILE_CTXOUT").is_some();

        Ok(ctx)
    }

    /// Read the leaderboard users list from `users_yaml`
    pub fn load_users(&self) -> crate::Result<Vec<String>> {
        let data = std::fs::read_to_string(&self.users_yaml)?;
        let file: UsersFile = serde_yaml::from_str(&data)?;
        Ok(file
            .users
            .into_iter()
            .map(|user| user.trim().to_string())
            .filter(|user| !user.is_empty())
            .collect())
    }

    /// Log filter used when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        match self.debug {
            d if d >= 2 => "trace",
            1 => "debug",
            _ => "info",
        }
    }

    /// Install the global tracing subscriber
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level()));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn parse_per_page(value: &str) -> u32 {
    value
        .parse::<u32>()
        .map(|n| n.clamp(1, MAX_PER_PAGE))
        .unwrap_or(MAX_PER_PAGE)
}
