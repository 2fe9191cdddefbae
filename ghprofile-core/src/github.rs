//! GitHub access: the collaborator trait the services depend on and its
//! `reqwest` implementation.

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info};
use url::Url;

use crate::constants::GITHUB_ACCEPT;
use crate::events::Event;
use crate::{Context, GhProfileError, Result};

/// Bytes of code per language for one repository, in the order GitHub
/// lists them (largest first)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageByteMap(Vec<(String, u64)>);

impl LanguageByteMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(lang, bytes)| (lang.as_str(), *bytes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for LanguageByteMap {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for LanguageByteMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (lang, bytes) in self.iter() {
            map.serialize_entry(lang, &bytes)?;
        }
        map.end()
    }
}

struct LanguageByteMapVisitor;

impl<'de> Visitor<'de> for LanguageByteMapVisitor {
    type Value = LanguageByteMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of language names to byte counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((lang, bytes)) = access.next_entry::<String, u64>()? {
            entries.push((lang, bytes));
        }
        Ok(LanguageByteMap(entries))
    }
}

impl<'de> Deserialize<'de> for LanguageByteMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(LanguageByteMapVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// Repository descriptor from `/users/{user}/repos`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub language: Option<String>,
}

impl Repository {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            owner: Owner {
                login: owner.to_string(),
            },
            full_name: Some(format!("{}/{}", owner, name)),
            fork: false,
            language: None,
        }
    }

    pub fn full_name(&self) -> String {
        self.full_name
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.owner.login, self.name))
    }
}

/// GitHub data the profile services consume
#[async_trait]
pub trait GitHubSource: Send + Sync {
    /// Repositories owned by `username`, `None` when the user does not exist.
    async fn get_user_repos(&self, username: &str) -> Result<Option<Vec<Repository>>>;

    /// Language byte counts of a single repository.
    async fn get_repo_languages(&self, repo: &Repository) -> Result<LanguageByteMap>;

    /// Recent public activity of `username`.
    async fn get_user_events(&self, username: &str) -> Result<Vec<Event>>;
}

/// GitHub usernames: alphanumerics and single inner hyphens, at most 39 chars
pub fn is_valid_username(username: &str) -> bool {
    static USERNAME: OnceLock<Regex> = OnceLock::new();
    let re = USERNAME.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9])*$").expect("username pattern")
    });
    username.len() <= 39 && re.is_match(username)
}

/// `username` if GitHub would accept it
pub fn validate_username(username: &str) -> Result<&str> {
    if is_valid_username(username) {
        Ok(username)
    } else {
        Err(GhProfileError::InvalidUsername(username.to_string()))
    }
}

/// REST client for api.github.com
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base: Url,
    repos_per_page: u32,
    events_per_page: u32,
    include_forks: bool,
}

impl GitHubClient {
    pub fn new(ctx: &Context) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_str(&ctx.user_agent)?);
        if !ctx.github_oauth.is_empty() && ctx.github_oauth != "-" {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token {}", ctx.github_oauth))?,
            );
        } else {
            info!("No GitHub OAuth token set, using unauthenticated requests");
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(ctx.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base: Url::parse(&ctx.api_url)?,
            repos_per_page: ctx.repos_per_page,
            events_per_page: ctx.events_per_page,
            include_forks: ctx.include_forks,
        })
    }

    /// Join path segments onto the API base, percent-encoding each one
    fn endpoint(&self, segments: &[&str], per_page: Option<u32>) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GhProfileError::Config(format!("API URL cannot be a base: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        if let Some(per_page) = per_page {
            url.query_pairs_mut()
                .append_pair("per_page", &per_page.to_string());
        }
        Ok(url)
    }

    /// GET a JSON document, `None` on 404
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GhProfileError::GitHub(format!("{} returned {}", url, status)));
        }
        Ok(Some(response.json::<T>().await?))
    }
}

#[async_trait]
impl GitHubSource for GitHubClient {
    async fn get_user_repos(&self, username: &str) -> Result<Option<Vec<Repository>>> {
        let url = self.endpoint(&["users", username, "repos"], Some(self.repos_per_page))?;
        let repos: Option<Vec<Repository>> = self.get_json(url).await?;
        Ok(repos.map(|repos| {
            repos
                .into_iter()
                .filter(|repo| self.include_forks || !repo.fork)
                .collect()
        }))
    }

    async fn get_repo_languages(&self, repo: &Repository) -> Result<LanguageByteMap> {
        let url = self.endpoint(&["repos", repo.owner.login.as_str(), repo.name.as_str(), "languages"], None)?;
        self.get_json(url)
            .await?
            .ok_or_else(|| GhProfileError::RepositoryNotFound(repo.full_name()))
    }

    async fn get_user_events(&self, username: &str) -> Result<Vec<Event>> {
        let url = self.endpoint(
            &["users", username, "events", "public"],
            Some(self.events_per_page),
        )?;
        Ok(self.get_json(url).await?.unwrap_or_default())
    }
}
