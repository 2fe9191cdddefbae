// Constants used throughout the GhProfile system

// GitHub API defaults
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "ghprofile-rust/1.0";
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const MAX_PER_PAGE: u32 = 100;

// Event type tags as sent by the GitHub events API
pub const PUSH_EVENT: &str = "PushEvent";
pub const PULL_REQUEST_EVENT: &str = "PullRequestEvent";
pub const PULL_REQUEST_REVIEW_EVENT: &str = "PullRequestReviewEvent";
pub const OPENED: &str = "opened";

// Impact points per event
pub const PUSH_POINTS: u64 = 1;
pub const PR_MERGED_POINTS: u64 = 10;
pub const PR_OPENED_POINTS: u64 = 5;
pub const PR_REVIEW_POINTS: u64 = 3;

// Leaderboard
pub const DEFAULT_TOP_LIMIT: usize = 10;

// Files and server
pub const DEFAULT_USERS_YAML: &str = "users.yaml";
pub const LOCALHOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 8080;
pub const OK: &str = "ok";
