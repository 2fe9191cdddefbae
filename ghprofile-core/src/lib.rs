//! GhProfile Core Library
//!
//! Computes a contributor's activity profile from GitHub data: language usage
//! across repositories, an impact score from recent events, and a leaderboard
//! ranking users by that score. The GitHub API sits behind the
//! [`GitHubSource`] trait so the services can run against any backend.

pub mod constants;
pub mod context;
pub mod error;
pub mod events;
pub mod github;
pub mod language;
pub mod leaderboard;
pub mod profile;
pub mod scoring;
pub mod stubs;

// Re-export commonly used items
pub use context::Context;
pub use error::{GhProfileError, Result};
pub use events::{Event, EventKind};
pub use github::{GitHubClient, GitHubSource, LanguageByteMap, Repository};
pub use language::{LanguageDistribution, LanguageService, LanguageTotals};
pub use leaderboard::{LeaderboardEntry, LeaderboardService, SharedLeaderboard};
pub use profile::{ContributorProfile, ProfileService};
pub use scoring::ScoringService;
