//! Contributor profile: language distribution plus impact score, and
//! leaderboard ranking for a set of users.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::github::GitHubSource;
use crate::language::{LanguageDistribution, LanguageService};
use crate::leaderboard::{LeaderboardEntry, LeaderboardService};
use crate::scoring::ScoringService;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorProfile {
    pub username: String,
    pub languages: LanguageDistribution,
    pub impact_score: u64,
}

/// Wires the GitHub source to the language, scoring and leaderboard services
#[derive(Clone)]
pub struct ProfileService {
    source: Arc<dyn GitHubSource>,
    languages: LanguageService,
    scoring: ScoringService,
}

impl ProfileService {
    pub fn new(source: Arc<dyn GitHubSource>) -> Self {
        Self {
            languages: LanguageService::new(source.clone()),
            scoring: ScoringService::new(),
            source,
        }
    }

    pub fn languages(&self) -> &LanguageService {
        &self.languages
    }

    pub async fn impact_score(&self, username: &str) -> Result<u64> {
        let events = self.source.get_user_events(username).await?;
        let score = self.scoring.calculate_impact_score(&events);
        info!("{}: {} events, impact score {}", username, events.len(), score);
        Ok(score)
    }

    /// Languages and events are fetched concurrently. Failing to read events
    /// scores 0; failing to list repositories is an error.
    pub async fn profile(&self, username: &str) -> Result<ContributorProfile> {
        let (languages, impact_score) = tokio::join!(
            self.languages.get_language_distribution(username),
            self.impact_score(username)
        );

        let impact_score = impact_score.unwrap_or_else(|err| {
            warn!("Events of {} unavailable, scoring 0: {}", username, err);
            0
        });

        Ok(ContributorProfile {
            username: username.to_string(),
            languages: languages?,
            impact_score,
        })
    }

    /// Score every user and upsert them into `board`. Users whose events
    /// cannot be fetched are left out. Returns the entries written, in the
    /// order of `users`.
    pub async fn rank(&self, users: &[String], board: &mut LeaderboardService) -> Vec<LeaderboardEntry> {
        let scores = join_all(users.iter().map(|user| self.impact_score(user))).await;

        users
            .iter()
            .zip(scores)
            .filter_map(|(user, score)| match score {
                Ok(score) => Some(board.add_or_update(user, score)),
                Err(err) => {
                    warn!("Skipping {} in leaderboard: {}", user, err);
                    None
                }
            })
            .collect()
    }
}
