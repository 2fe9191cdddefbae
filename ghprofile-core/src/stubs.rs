//! In-memory stub implementation of GitHubSource.
//!
//! Serves canned repositories, language maps and events, and counts calls so
//! tests can check what the services asked for.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::events::Event;
use crate::github::{GitHubSource, LanguageByteMap, Repository};
use crate::{GhProfileError, Result};

#[derive(Debug, Default)]
pub struct StubGitHub {
    repos: Option<Vec<Repository>>,
    // keyed by repository name, missing names fail
    languages: HashMap<String, LanguageByteMap>,
    // keyed by username, missing users fail
    events: HashMap<String, Vec<Event>>,
    delay: Option<Duration>,
    repo_calls: AtomicUsize,
    language_calls: AtomicUsize,
    event_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositories returned for every user
    pub fn with_repos(mut self, repos: Option<Vec<Repository>>) -> Self {
        self.repos = repos;
        self
    }

    pub fn with_languages(mut self, repo: &str, pairs: &[(&str, u64)]) -> Self {
        let map = pairs.iter().map(|(lang, bytes)| (lang.to_string(), *bytes)).collect();
        self.languages.insert(repo.to_string(), map);
        self
    }

    pub fn with_events(mut self, username: &str, events: Vec<Event>) -> Self {
        self.events.insert(username.to_string(), events);
        self
    }

    /// Sleep this long in every language fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn repo_calls(&self) -> usize {
        self.repo_calls.load(Ordering::SeqCst)
    }

    pub fn language_calls(&self) -> usize {
        self.language_calls.load(Ordering::SeqCst)
    }

    pub fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }

    /// Most language fetches that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitHubSource for StubGitHub {
    async fn get_user_repos(&self, _username: &str) -> Result<Option<Vec<Repository>>> {
        self.repo_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.repos.clone())
    }

    async fn get_repo_languages(&self, repo: &Repository) -> Result<LanguageByteMap> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.languages
            .get(&repo.name)
            .cloned()
            .ok_or_else(|| GhProfileError::GitHub(format!("stub has no languages for {}", repo.name)))
    }

    async fn get_user_events(&self, username: &str) -> Result<Vec<Event>> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        self.events
            .get(username)
            .cloned()
            .ok_or_else(|| GhProfileError::GitHub(format!("stub has no events for {}", username)))
    }
}
