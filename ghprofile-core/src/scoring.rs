//! Impact score from a user's event history

use serde_json::Value;
use tracing::debug;

use crate::constants::{
    OPENED, PR_MERGED_POINTS, PR_OPENED_POINTS, PR_REVIEW_POINTS, PUSH_POINTS,
};
use crate::events::{Event, EventKind};

/// Rule based event scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringService;

impl ScoringService {
    pub fn new() -> Self {
        Self
    }

    /// Points a single event contributes. A merged pull request scores the
    /// merge bonus whatever its action says.
    pub fn event_points(event: &Event) -> u64 {
        match event.kind() {
            EventKind::Push => PUSH_POINTS,
            EventKind::PullRequest { merged: true, .. } => PR_MERGED_POINTS,
            EventKind::PullRequest { action, .. } if action.as_deref() == Some(OPENED) => {
                PR_OPENED_POINTS
            }
            EventKind::PullRequest { .. } => 0,
            EventKind::PullRequestReview => PR_REVIEW_POINTS,
            EventKind::Other(_) | EventKind::Unknown => 0,
        }
    }

    pub fn calculate_impact_score(&self, events: &[Event]) -> u64 {
        events.iter().map(Self::event_points).sum()
    }

    /// Score raw JSON. Anything but an array scores 0, elements that do not
    /// decode as events count as untyped.
    pub fn calculate_impact_score_value(&self, events: &Value) -> u64 {
        let Some(items) = events.as_array() else {
            debug!("impact score input is not an array, scoring 0");
            return 0;
        };

        items
            .iter()
            .filter_map(|item| serde_json::from_value::<Event>(item.clone()).ok())
            .map(|event| Self::event_points(&event))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn push() -> Event {
        Event::of_type("PushEvent")
    }

    fn review() -> Event {
        Event::of_type("PullRequestReviewEvent")
    }

    #[test]
    fn empty_list_scores_zero() {
        assert_eq!(ScoringService::new().calculate_impact_score(&[]), 0);
    }

    #[test]
    fn non_array_input_scores_zero() {
        let scorer = ScoringService::new();
        assert_eq!(scorer.calculate_impact_score_value(&Value::Null), 0);
        assert_eq!(scorer.calculate_impact_score_value(&json!({"type": "PushEvent"})), 0);
        assert_eq!(scorer.calculate_impact_score_value(&json!("PushEvent")), 0);
        assert_eq!(scorer.calculate_impact_score_value(&json!(42)), 0);
    }

    #[test]
    fn merged_pull_request_beats_action() {
        assert_eq!(ScoringService::event_points(&Event::pull_request(Some("opened"), true)), 10);
        assert_eq!(ScoringService::event_points(&Event::pull_request(Some("closed"), true)), 10);
        assert_eq!(ScoringService::event_points(&Event::pull_request(None, true)), 10);
    }

    #[test]
    fn unmerged_pull_request_depends_on_action() {
        assert_eq!(ScoringService::event_points(&Event::pull_request(Some("opened"), false)), 5);
        assert_eq!(ScoringService::event_points(&Event::pull_request(Some("closed"), false)), 0);
        assert_eq!(ScoringService::event_points(&Event::pull_request(Some("reopened"), false)), 0);
        assert_eq!(ScoringService::event_points(&Event::pull_request(None, false)), 0);
        assert_eq!(ScoringService::event_points(&Event::of_type("PullRequestEvent")), 0);
    }

    #[test]
    fn mixed_events_sum() {
        let events = vec![
            push(),
            push(),
            Event::pull_request(Some("opened"), false),
            review(),
            Event::pull_request(Some("closed"), true),
        ];
        assert_eq!(ScoringService::new().calculate_impact_score(&events), 20);
    }

    #[test]
    fn unknown_and_untyped_events_are_ignored() {
        let events = vec![Event::default(), Event::of_type("WatchEvent"), Event::of_type("ForkEvent"), push()];
        assert_eq!(ScoringService::new().calculate_impact_score(&events), 1);
    }

    #[test]
    fn raw_json_events_tolerate_missing_fields() {
        let events = json!([
            {"type": "PushEvent"},
            {"type": "PullRequestEvent"},
            {"type": "PullRequestEvent", "payload": null},
            {"type": "PullRequestEvent", "payload": {"action": "opened"}},
            {"type": "PullRequestEvent", "payload": {"pull_request": {"merged": true}}},
            {"type": "PullRequestReviewEvent", "payload": {"action": "created"}},
            {"payload": {"action": "opened"}},
            null,
            "garbage",
            {"type": 7}
        ]);
        assert_eq!(ScoringService::new().calculate_impact_score_value(&events), 1 + 5 + 10 + 3);
    }
}
