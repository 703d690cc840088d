use std::fs;

use review_core::ReviewConfig;
use review_page::{load_page_str, Action, ActionReport, ReviewSession};
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture is readable")
}

#[test]
fn scripted_session_matches_golden() {
    let page = load_page_str(&read_fixture("review_page.json")).expect("page fixture loads");
    let script: Vec<Action> =
        serde_json::from_str(&read_fixture("review_script.json")).expect("script is valid");

    let mut session = ReviewSession::new(page, &ReviewConfig::default());
    let reports = session.replay(&script).expect("script replays");
    assert_eq!(reports.len(), script.len());

    let actual = serde_json::to_value(session.snapshot()).expect("snapshot serializes");
    let expected: Value =
        serde_json::from_str(&read_fixture("review_snapshot.json")).expect("golden is valid");

    assert_eq!(actual, expected);
}

#[test]
fn scripted_session_reports() {
    let page = load_page_str(&read_fixture("review_page.json")).expect("page fixture loads");
    let script: Vec<Action> =
        serde_json::from_str(&read_fixture("review_script.json")).expect("script is valid");

    let mut session = ReviewSession::new(page, &ReviewConfig::default());
    let reports = session.replay(&script).expect("script replays");

    assert_eq!(
        reports[2],
        ActionReport::Rejected {
            message: "Please enter a value".into()
        }
    );
    assert!(matches!(reports[7], ActionReport::Committed(_)));
    assert_eq!(reports[21], ActionReport::NothingToEdit);
    match &reports[22] {
        ActionReport::Navigate(intent) => {
            assert_eq!(intent.url, "https://jira.example.com/TICKET-123")
        }
        other => panic!("expected navigation, got {other:?}"),
    }
    assert!(!session.dialog().visible);
}
