//! Integration tests for the profile services against the in-memory GitHub stub.

use std::sync::Arc;
use std::time::Duration;

use ghprofile_core::stubs::StubGitHub;
use ghprofile_core::{Event, LanguageService, LeaderboardService, ProfileService, Repository};

fn repos(names: &[&str]) -> Vec<Repository> {
    names.iter().map(|name| Repository::new("octocat", name)).collect()
}

#[tokio::test]
async fn distribution_across_repositories() {
    let stub = Arc::new(
        StubGitHub::new()
            .with_repos(Some(repos(&["web", "cli"])))
            .with_languages("web", &[("JavaScript", 6000), ("TypeScript", 3000)])
            .with_languages("cli", &[("JavaScript", 1000)]),
    );
    let service = LanguageService::new(stub.clone());

    let dist = service.get_language_distribution("octocat").await.unwrap();

    assert_eq!(dist.len(), 2);
    assert_eq!(dist.get("JavaScript"), Some("70.00%"));
    assert_eq!(dist.get("TypeScript"), Some("30.00%"));
    assert_eq!(stub.language_calls(), 2);
}

#[tokio::test]
async fn no_repositories_means_no_language_calls() {
    for repos in [None, Some(Vec::new())] {
        let stub = Arc::new(StubGitHub::new().with_repos(repos));
        let service = LanguageService::new(stub.clone());

        let dist = service.get_language_distribution("ghost").await.unwrap();

        assert!(dist.is_empty());
        assert_eq!(stub.repo_calls(), 1);
        assert_eq!(stub.language_calls(), 0);
    }
}

#[tokio::test]
async fn failed_repository_is_skipped() {
    // "broken" has no languages in the stub, so its fetch fails
    let stub = Arc::new(
        StubGitHub::new()
            .with_repos(Some(repos(&["rust-app", "broken", "scripts"])))
            .with_languages("rust-app", &[("Rust", 9999)])
            .with_languages("scripts", &[("Shell", 1)]),
    );
    let service = LanguageService::new(stub.clone());

    let dist = service.get_language_distribution("octocat").await.unwrap();

    assert_eq!(stub.language_calls(), 3);
    assert_eq!(dist.len(), 2);
    assert_eq!(dist.get("Rust"), Some("99.99%"));
    assert_eq!(dist.get("Shell"), Some("0.01%"));
}

#[tokio::test]
async fn all_repositories_failing_gives_empty_distribution() {
    let stub = Arc::new(StubGitHub::new().with_repos(Some(repos(&["a", "b"]))));
    let service = LanguageService::new(stub);

    let dist = service.get_language_distribution("octocat").await.unwrap();
    assert!(dist.is_empty());
}

#[tokio::test]
async fn language_fetches_run_concurrently() {
    let names: Vec<String> = (0..8).map(|i| format!("repo{}", i)).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut stub = StubGitHub::new()
        .with_repos(Some(repos(&name_refs)))
        .with_delay(Duration::from_millis(20));
    for name in &name_refs {
        stub = stub.with_languages(name, &[("Rust", 10)]);
    }
    let stub = Arc::new(stub);
    let service = LanguageService::new(stub.clone());

    let dist = service.get_language_distribution("octocat").await.unwrap();

    assert_eq!(dist.get("Rust"), Some("100.00%"));
    assert_eq!(stub.language_calls(), 8);
    // every fetch was started before the first one finished
    assert_eq!(stub.peak_in_flight(), 8);
}

#[tokio::test]
async fn profile_combines_languages_and_score() {
    let stub = Arc::new(
        StubGitHub::new()
            .with_repos(Some(repos(&["core"])))
            .with_languages("core", &[("Rust", 100)])
            .with_events(
                "octocat",
                vec![
                    Event::of_type("PushEvent"),
                    Event::of_type("PushEvent"),
                    Event::pull_request(Some("opened"), false),
                    Event::of_type("PullRequestReviewEvent"),
                    Event::pull_request(Some("closed"), true),
                ],
            ),
    );
    let profiles = ProfileService::new(stub);

    let profile = profiles.profile("octocat").await.unwrap();

    assert_eq!(profile.username, "octocat");
    assert_eq!(profile.impact_score, 20);
    assert_eq!(profile.languages.get("Rust"), Some("100.00%"));
}

#[tokio::test]
async fn profile_scores_zero_when_events_fail() {
    let stub = Arc::new(
        StubGitHub::new()
            .with_repos(Some(repos(&["core"])))
            .with_languages("core", &[("Go", 5)]),
    );
    let profiles = ProfileService::new(stub.clone());

    let profile = profiles.profile("nobody").await.unwrap();

    assert_eq!(profile.impact_score, 0);
    assert_eq!(profile.languages.get("Go"), Some("100.00%"));
    assert_eq!(stub.event_calls(), 1);
}

#[tokio::test]
async fn rank_fills_leaderboard() {
    let stub = Arc::new(
        StubGitHub::new()
            .with_events("alice", vec![Event::pull_request(None, true)])
            .with_events("bob", vec![Event::of_type("PushEvent"); 3])
            .with_events("carol", vec![Event::of_type("PullRequestReviewEvent"); 2]),
    );
    let profiles = ProfileService::new(stub);
    let mut board = LeaderboardService::new();
    board.add_or_update("bob", 100);

    let users: Vec<String> = ["alice", "bob", "carol", "ghost"].iter().map(|u| u.to_string()).collect();
    let written = profiles.rank(&users, &mut board).await;

    assert_eq!(written.len(), 3);
    assert_eq!(board.size(), 3);
    assert_eq!(board.get_score("bob"), 3);
    assert_eq!(board.get_score("ghost"), 0);

    let top: Vec<(String, u64)> = board
        .get_top(None)
        .into_iter()
        .map(|e| (e.username, e.score))
        .collect();
    assert_eq!(
        top,
        vec![
            ("alice".to_string(), 10),
            ("carol".to_string(), 6),
            ("bob".to_string(), 3)
        ]
    );
}
