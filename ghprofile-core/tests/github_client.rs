//! GitHubClient against a local fake of the GitHub REST API.

use std::sync::Arc;

use ghprofile_core::{Context, GhProfileError, GitHubClient, GitHubSource, LanguageService, Repository};
use warp::http::StatusCode;
use warp::Filter;

const OCTOCAT_REPOS: &str = r#"[
    {"id": 1, "name": "app", "owner": {"login": "octocat"}, "full_name": "octocat/app", "fork": false},
    {"id": 2, "name": "gone", "owner": {"login": "octocat"}, "full_name": "octocat/gone", "fork": false},
    {"id": 3, "name": "forked", "owner": {"login": "octocat"}, "full_name": "octocat/forked", "fork": true}
]"#;

// Not alphabetical, GitHub sorts by bytes.
const APP_LANGUAGES: &str = r#"{"TypeScript": 900, "CSS": 70, "HTML": 30}"#;

const OCTOCAT_EVENTS: &str = r#"[
    {"id": "1", "type": "PushEvent", "payload": {"size": 1}, "created_at": "2024-01-15T10:30:00Z"},
    {"id": "2", "type": "PullRequestEvent", "payload": {"action": "closed", "pull_request": {"merged": true}}}
]"#;

const NOT_FOUND: &str = r#"{"message": "Not Found"}"#;

/// Serve a fake GitHub on an ephemeral port and return its base URL
fn spawn_fake_github() -> String {
    let repos = warp::path!("users" / String / "repos").map(|user: String| match user.as_str() {
        "octocat" => warp::reply::with_status(OCTOCAT_REPOS, StatusCode::OK),
        "limited" => warp::reply::with_status(
            r#"{"message": "API rate limit exceeded"}"#,
            StatusCode::FORBIDDEN,
        ),
        _ => warp::reply::with_status(NOT_FOUND, StatusCode::NOT_FOUND),
    });

    let languages = warp::path!("repos" / String / String / "languages").map(
        |_owner: String, name: String| match name.as_str() {
            "app" | "forked" => warp::reply::with_status(APP_LANGUAGES, StatusCode::OK),
            _ => warp::reply::with_status(NOT_FOUND, StatusCode::NOT_FOUND),
        },
    );

    let events = warp::path!("users" / String / "events" / "public").map(|user: String| {
        match user.as_str() {
            "octocat" => warp::reply::with_status(OCTOCAT_EVENTS, StatusCode::OK),
            _ => warp::reply::with_status(NOT_FOUND, StatusCode::NOT_FOUND),
        }
    });

    let routes = warp::get().and(repos.or(languages).or(events));
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{}", addr)
}

fn client(api_url: String, include_forks: bool) -> GitHubClient {
    let ctx = Context {
        api_url,
        include_forks,
        ..Context::default()
    };
    GitHubClient::new(&ctx).unwrap()
}

fn names(repos: &[Repository]) -> Vec<&str> {
    repos.iter().map(|repo| repo.name.as_str()).collect()
}

#[tokio::test]
async fn unknown_user_has_no_repositories() {
    let client = client(spawn_fake_github(), false);
    assert_eq!(client.get_user_repos("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn forks_are_dropped_unless_included() {
    let base = spawn_fake_github();

    let repos = client(base.clone(), false).get_user_repos("octocat").await.unwrap().unwrap();
    assert_eq!(names(&repos), vec!["app", "gone"]);

    let repos = client(base, true).get_user_repos("octocat").await.unwrap().unwrap();
    assert_eq!(names(&repos), vec!["app", "gone", "forked"]);
}

#[tokio::test]
async fn error_status_is_github_error() {
    let client = client(spawn_fake_github(), false);
    match client.get_user_repos("limited").await {
        Err(GhProfileError::GitHub(msg)) => assert!(msg.contains("403"), "message was {}", msg),
        other => panic!("expected GitHub error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_repository_languages_is_an_error() {
    let client = client(spawn_fake_github(), false);
    let result = client.get_repo_languages(&Repository::new("octocat", "gone")).await;
    match result {
        Err(GhProfileError::RepositoryNotFound(repo)) => assert_eq!(repo, "octocat/gone"),
        other => panic!("expected RepositoryNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn languages_keep_github_order() {
    let client = client(spawn_fake_github(), false);
    let languages = client
        .get_repo_languages(&Repository::new("octocat", "app"))
        .await
        .unwrap();
    let order: Vec<(&str, u64)> = languages.iter().collect();
    assert_eq!(order, vec![("TypeScript", 900), ("CSS", 70), ("HTML", 30)]);
}

#[tokio::test]
async fn events_decode_and_unknown_user_is_empty() {
    let client = client(spawn_fake_github(), false);

    let events = client.get_user_events("octocat").await.unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[1].is_merged());

    assert!(client.get_user_events("ghost").await.unwrap().is_empty());
}

#[tokio::test]
async fn distribution_over_http_skips_missing_repository() {
    let service = LanguageService::new(Arc::new(client(spawn_fake_github(), false)));

    let dist = service.get_language_distribution("octocat").await.unwrap();

    assert_eq!(
        serde_json::to_string(&dist).unwrap(),
        r#"{"TypeScript":"90.00%","CSS":"7.00%","HTML":"3.00%"}"#
    );
}
