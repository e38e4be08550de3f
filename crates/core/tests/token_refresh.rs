//! Single-flight token refresh across concurrent callers.

mod support;

use std::sync::Arc;

use dunkstats_core::{CredentialSink, TokenEndpoint, TokenRefresher, TokenStore};
use dunkstats_domain::{Credential, DunkstatsError, Result, TokenGrant};
use support::{seeded_store, CountingTokenEndpoint, RecordingSink};
use tokio::sync::Notify;

#[tokio::test]
async fn concurrent_refreshes_share_one_exchange() {
    let endpoint = Arc::new(CountingTokenEndpoint::new());
    let refresher = TokenRefresher::new(seeded_store(), Arc::clone(&endpoint) as Arc<dyn TokenEndpoint>);

    let (first, second) = tokio::join!(refresher.refresh(), refresher.refresh());

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(endpoint.exchanges(), 1);
    assert_eq!(first, second);
    assert_eq!(refresher.store().current(), Some(first));
}

/// Runs three refreshes that all join before the held exchange is released.
async fn refresh_three_times(
    refresher: &TokenRefresher,
    gate: &Notify,
) -> (Result<Credential>, Result<Credential>, Result<Credential>) {
    let release = async {
        // Every caller has been polled once by the time this resumes.
        tokio::task::yield_now().await;
        gate.notify_one();
    };
    let (first, second, third, ()) =
        tokio::join!(refresher.refresh(), refresher.refresh(), refresher.refresh(), release);
    (first, second, third)
}

#[tokio::test]
async fn three_concurrent_callers_share_one_credential() {
    let gate = Arc::new(Notify::new());
    let endpoint = Arc::new(CountingTokenEndpoint::new().gated(Arc::clone(&gate)));
    let refresher = TokenRefresher::new(seeded_store(), Arc::clone(&endpoint) as Arc<dyn TokenEndpoint>);

    let (first, second, third) = refresh_three_times(&refresher, &gate).await;

    assert_eq!(endpoint.exchanges(), 1);
    assert_eq!(refresher.store().refreshes_started(), 1);
    let first = first.unwrap();
    assert_eq!(first.access_token, "access-1");
    assert_eq!(second.unwrap(), first);
    assert_eq!(third.unwrap(), first);
}

#[tokio::test]
async fn concurrent_callers_observe_the_same_failure() {
    let gate = Arc::new(Notify::new());
    let endpoint = Arc::new(
        CountingTokenEndpoint::failing(DunkstatsError::Auth(
            "token endpoint returned 400: {\"message\":\"Invalid refresh token\"}".into(),
        ))
        .gated(Arc::clone(&gate)),
    );
    let refresher = TokenRefresher::new(seeded_store(), Arc::clone(&endpoint) as Arc<dyn TokenEndpoint>);

    let (first, second, third) = refresh_three_times(&refresher, &gate).await;

    assert_eq!(endpoint.exchanges(), 1);
    let first = first.unwrap_err();
    assert_eq!(second.unwrap_err(), first);
    assert_eq!(third.unwrap_err(), first);
    assert_eq!(refresher.store().current().unwrap().access_token, "access-0");
}

#[tokio::test]
async fn completed_flight_allows_next_refresh() {
    let endpoint = Arc::new(CountingTokenEndpoint::new());
    let refresher = TokenRefresher::new(seeded_store(), Arc::clone(&endpoint) as Arc<dyn TokenEndpoint>);

    let first = refresher.refresh().await.unwrap();
    let second = refresher.refresh().await.unwrap();

    assert_eq!(endpoint.exchanges(), 2);
    assert_ne!(first.access_token, second.access_token);
    assert_eq!(
        endpoint.grants(),
        vec![TokenGrant::RefreshToken("refresh-0".into()), TokenGrant::RefreshToken("refresh-1".into())]
    );
}

#[tokio::test]
async fn sink_receives_each_refreshed_credential_once() {
    let endpoint = Arc::new(CountingTokenEndpoint::new());
    let sink = Arc::new(RecordingSink::default());
    let refresher = TokenRefresher::new(seeded_store(), Arc::clone(&endpoint) as Arc<dyn TokenEndpoint>)
        .with_sink(Arc::clone(&sink) as Arc<dyn CredentialSink>);

    let (credential, _) = tokio::join!(refresher.refresh(), refresher.refresh());

    assert_eq!(sink.received(), vec![credential.unwrap()]);
}

#[tokio::test]
async fn client_credentials_bootstrap_empty_store() {
    let endpoint = Arc::new(CountingTokenEndpoint::new());
    let refresher = TokenRefresher::new(
        Arc::new(TokenStore::new(None)),
        Arc::clone(&endpoint) as Arc<dyn TokenEndpoint>,
    )
    .with_client_credentials(true);

    let credential: Credential = refresher.ensure_credential().await.unwrap();

    assert_eq!(credential.access_token, "access-1");
    assert_eq!(endpoint.grants(), vec![TokenGrant::ClientCredentials]);
}
