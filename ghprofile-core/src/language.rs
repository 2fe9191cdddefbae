//! Language usage across a user's repositories
//!
//! Per-repository byte counts are summed into [`LanguageTotals`] and turned
//! into a [`LanguageDistribution`] of two-decimal percentage strings.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, warn};

use crate::github::{GitHubSource, LanguageByteMap};
use crate::Result;

/// Bytes per language across repositories, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct LanguageTotals {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl LanguageTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `bytes` to `language`, starting from 0 when unseen
    pub fn add(&mut self, language: &str, bytes: u64) {
        match self.index.get(language) {
            Some(&pos) => self.entries[pos].1 = self.entries[pos].1.saturating_add(bytes),
            None => {
                self.index.insert(language.to_string(), self.entries.len());
                self.entries.push((language.to_string(), bytes));
            }
        }
    }

    pub fn get(&self, language: &str) -> Option<u64> {
        self.index.get(language).map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, bytes)| *bytes).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(lang, bytes)| (lang.as_str(), *bytes))
    }
}

// Key order is not significant for equality.
impl PartialEq for LanguageTotals {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(lang, bytes)| other.get(lang) == Some(bytes))
    }
}

impl Eq for LanguageTotals {}

impl<'a> FromIterator<(&'a str, u64)> for LanguageTotals {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut totals = Self::new();
        for (lang, bytes) in iter {
            totals.add(lang, bytes);
        }
        totals
    }
}

impl Serialize for LanguageTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (lang, bytes) in self.iter() {
            map.serialize_entry(lang, &bytes)?;
        }
        map.end()
    }
}

/// Language to percentage string such as `"70.00%"`
#[derive(Debug, Clone, Default)]
pub struct LanguageDistribution {
    entries: Vec<(String, String)>,
}

impl LanguageDistribution {
    pub fn get(&self, language: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, pct)| pct.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(lang, pct)| (lang.as_str(), pct.as_str()))
    }
}

impl PartialEq for LanguageDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(lang, pct)| other.get(lang) == Some(pct))
    }
}

impl Eq for LanguageDistribution {}

impl<'a> FromIterator<(&'a str, &'a str)> for LanguageDistribution {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(lang, pct)| (lang.to_string(), pct.to_string()))
                .collect(),
        }
    }
}

impl Serialize for LanguageDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (lang, pct) in self.iter() {
            map.serialize_entry(lang, pct)?;
        }
        map.end()
    }
}

/// `100 * part / total` with two decimals, halves rounded up. Integer math
/// keeps ties such as 1/800 = 0.125% exact.
fn format_percentage(part: u64, total: u64) -> String {
    let (part, total) = (u128::from(part), u128::from(total));
    let hundredths = (part * 10_000 * 2 + total) / (2 * total);
    format!("{}.{:02}%", hundredths / 100, hundredths % 100)
}

/// Language aggregation for a user's repositories
#[derive(Clone)]
pub struct LanguageService {
    source: Arc<dyn GitHubSource>,
}

impl LanguageService {
    pub fn new(source: Arc<dyn GitHubSource>) -> Self {
        Self { source }
    }

    /// Sum byte counts over all present maps; `None` entries are skipped.
    pub fn aggregate_languages(maps: &[Option<LanguageByteMap>]) -> LanguageTotals {
        let mut totals = LanguageTotals::new();
        for map in maps.iter().flatten() {
            for (lang, bytes) in map.iter() {
                totals.add(lang, bytes);
            }
        }
        totals
    }

    /// Percentages with two decimals; empty when there is nothing to divide by.
    pub fn calculate_percentages(totals: &LanguageTotals) -> LanguageDistribution {
        let grand_total = totals.total();
        if grand_total == 0 {
            return LanguageDistribution::default();
        }

        let entries = totals
            .iter()
            .map(|(lang, bytes)| (lang.to_string(), format_percentage(bytes, grand_total)))
            .collect();
        LanguageDistribution { entries }
    }

    /// Fetch every repository's languages concurrently and build the
    /// distribution. A failed repository is skipped, not fatal.
    pub async fn get_language_distribution(&self, username: &str) -> Result<LanguageDistribution> {
        let repos = match self.source.get_user_repos(username).await? {
            Some(repos) if !repos.is_empty() => repos,
            _ => {
                info!("No repositories for {}", username);
                return Ok(LanguageDistribution::default());
            }
        };

        debug!("Fetching languages for {} repositories of {}", repos.len(), username);
        let results = join_all(repos.iter().map(|repo| self.source.get_repo_languages(repo))).await;

        let mut maps = Vec::with_capacity(results.len());
        for (repo, result) in repos.iter().zip(results) {
            match result {
                Ok(map) => maps.push(Some(map)),
                Err(err) => warn!("Skipping languages of {}: {}", repo.full_name(), err),
            }
        }

        let totals = Self::aggregate_languages(&maps);
        Ok(Self::calculate_percentages(&totals))
    }
}
