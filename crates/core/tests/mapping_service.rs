//! Mapping generation over fake source and lookup adapters.

mod support;

use std::sync::Arc;
use std::time::Duration;

use dunkstats_common::testing::MockClock;
use dunkstats_common::Clock;
use dunkstats_core::{
    PfpMappingService, RetryPolicy, RetryingFetcher, SourceDirectory,
};
use dunkstats_domain::constants::NO_IMAGE_FILENAME;
use dunkstats_domain::{DunkbinUser, DunkstatsError, FetchOutcome};
use support::{Harness, ScriptedLookup, StaticSource, Step};

fn dunkbin(id: &str, login: Option<&str>) -> DunkbinUser {
    DunkbinUser { id: id.into(), login: login.map(str::to_string), display_name: None }
}

fn service(source: StaticSource, lookup: ScriptedLookup, clock: &MockClock) -> PfpMappingService {
    let harness = Harness::new(lookup);
    PfpMappingService::new(
        Arc::new(source) as Arc<dyn SourceDirectory>,
        RetryingFetcher::new(RetryPolicy::default(), Arc::new(clock.clone()) as Arc<dyn Clock>),
        harness.orchestrator,
    )
}

#[tokio::test]
async fn builds_entries_for_every_source_user() {
    let source = StaticSource::new(vec![
        dunkbin("10", Some("Alpha")),
        dunkbin("11", Some("beta")),
        dunkbin("12", None),
    ]);
    let lookup = ScriptedLookup::new()
        .script("Alpha", vec![Step::SuccessWithout(vec!["beta".to_string()])]);
    let clock = MockClock::new();

    let (mapping, report) = service(source, lookup, &clock).generate().await.unwrap();

    assert_eq!(mapping.metadata.total_users, 3);
    assert_eq!(mapping.metadata.users_with_pfp, 1);
    assert_eq!(mapping.metadata.users_without_pfp, 2);
    assert_eq!(mapping.metadata.unresolved_logins, 1);
    assert_eq!(report.unresolved_count, 1);

    assert_eq!(mapping.users["10"].pfp_filename, "10.png");
    assert_eq!(mapping.users["11"].pfp_filename, NO_IMAGE_FILENAME);
    assert_eq!(mapping.users["12"].username, "unknown");
}

#[tokio::test]
async fn source_server_errors_are_retried() {
    let source = StaticSource::new(vec![dunkbin("1", Some("one"))])
        .with_steps(vec![FetchOutcome::ServerError { status: 502 }]);
    let clock = MockClock::new();

    let (mapping, _) = service(source, ScriptedLookup::new(), &clock).generate().await.unwrap();

    assert_eq!(mapping.metadata.users_with_pfp, 1);
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(2_000)]);
}

#[tokio::test]
async fn source_rejection_is_fatal() {
    let source = StaticSource::new(Vec::new())
        .with_steps(vec![FetchOutcome::ClientError { status: 401 }]);
    let clock = MockClock::new();

    let err = service(source, ScriptedLookup::new(), &clock).generate().await.unwrap_err();

    assert!(matches!(err, DunkstatsError::MalformedRequest(_)));
}
