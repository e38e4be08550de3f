//! Shared test helpers for `dunkstats-core` integration tests.
//!
//! In-memory fakes for every core port so the fetch pipeline can be driven
//! without a network or real time.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dunkstats_common::testing::MockClock;
use dunkstats_core::{
    BatchOrchestrator, CredentialSink, SourceDirectory, TokenEndpoint, TokenRefresher, TokenStore,
    UserLookup,
};
use dunkstats_domain::{
    Credential, DunkbinUser, DunkstatsError, FetchConfig, FetchOutcome, Result, TokenGrant,
    TokenResponse, TwitchUser,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Scripted response of one lookup call.
#[derive(Debug, Clone)]
pub enum Step {
    /// Return a record with a profile image for every requested login.
    Success,
    /// Return records for all requested logins except the listed ones.
    SuccessWithout(Vec<String>),
    RateLimited(Option<u64>),
    AuthExpired(u16),
    ServerError(u16),
    ClientError(u16),
    Network(&'static str),
}

/// One recorded lookup call.
#[derive(Debug, Clone)]
pub struct LookupCall {
    pub logins: Vec<String>,
    pub access_token: String,
}

/// `UserLookup` fake scripted per chunk.
///
/// Chunks are identified by their first login. Once a chunk's script is
/// exhausted every further call succeeds.
#[derive(Default)]
pub struct ScriptedLookup {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<LookupCall>>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the responses for the chunk starting with `first_login`.
    pub fn script(self, first_login: &str, steps: Vec<Step>) -> Self {
        self.scripts.lock().insert(first_login.to_string(), steps.into());
        self
    }

    pub fn calls(&self) -> Vec<LookupCall> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, first_login: &str) -> usize {
        self.calls.lock().iter().filter(|call| call.logins.first().map(String::as_str) == Some(first_login)).count()
    }
}

#[async_trait]
impl UserLookup for ScriptedLookup {
    async fn lookup_users(
        &self,
        logins: &[String],
        credential: &Credential,
    ) -> FetchOutcome<Vec<TwitchUser>> {
        self.calls.lock().push(LookupCall {
            logins: logins.to_vec(),
            access_token: credential.access_token.clone(),
        });

        let step = logins
            .first()
            .and_then(|first| self.scripts.lock().get_mut(first).and_then(VecDeque::pop_front))
            .unwrap_or(Step::Success);

        match step {
            Step::Success => FetchOutcome::Success(logins.iter().map(|l| twitch_user(l)).collect()),
            Step::SuccessWithout(skip) => FetchOutcome::Success(
                logins.iter().filter(|l| !skip.contains(l)).map(|l| twitch_user(l)).collect(),
            ),
            Step::RateLimited(retry_after_secs) => FetchOutcome::RateLimited { retry_after_secs },
            Step::AuthExpired(status) => FetchOutcome::AuthExpired { status },
            Step::ServerError(status) => FetchOutcome::ServerError { status },
            Step::ClientError(status) => FetchOutcome::ClientError { status },
            Step::Network(message) => FetchOutcome::NetworkError { message: message.to_string() },
        }
    }
}

/// Twitch record with a profile image derived from the login.
pub fn twitch_user(login: &str) -> TwitchUser {
    serde_json::from_value(serde_json::json!({
        "id": format!("tw-{login}"),
        "login": login.to_lowercase(),
        "display_name": login,
        "profile_image_url": format!("https://static-cdn.example/{login}.png"),
    }))
    .expect("valid twitch user")
}

/// `user000`, `user001`, ... for `n` logins.
pub fn logins(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("user{i:03}")).collect()
}

/// Token endpoint that counts exchanges.
///
/// Every exchange yields once before answering so concurrent callers can
/// pile up behind a pending refresh. With a gate, the exchange also waits
/// until the gate is notified.
#[derive(Default)]
pub struct CountingTokenEndpoint {
    exchanges: AtomicUsize,
    grants: Mutex<Vec<TokenGrant>>,
    failure: Option<DunkstatsError>,
    gate: Option<Arc<Notify>>,
}

impl CountingTokenEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: DunkstatsError) -> Self {
        Self { failure: Some(error), ..Self::default() }
    }

    /// Hold every exchange until `gate` is notified.
    #[must_use]
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn grants(&self) -> Vec<TokenGrant> {
        self.grants.lock().clone()
    }
}

#[async_trait]
impl TokenEndpoint for CountingTokenEndpoint {
    async fn exchange(&self, grant: &TokenGrant) -> Result<TokenResponse> {
        let n = self.exchanges.fetch_add(1, Ordering::SeqCst) + 1;
        self.grants.lock().push(grant.clone());
        tokio::task::yield_now().await;
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(TokenResponse {
            access_token: format!("access-{n}"),
            refresh_token: Some(format!("refresh-{n}")),
            expires_in: Some(14_400),
            token_type: Some("bearer".into()),
        })
    }
}

/// Sink that records every credential it receives.
#[derive(Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Credential>>,
}

impl RecordingSink {
    pub fn received(&self) -> Vec<Credential> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl CredentialSink for RecordingSink {
    async fn on_credential_refreshed(&self, credential: &Credential) -> Result<()> {
        self.received.lock().push(credential.clone());
        Ok(())
    }
}

/// Fixed Dunkbin export.
pub struct StaticSource {
    steps: Mutex<VecDeque<FetchOutcome<Vec<DunkbinUser>>>>,
    users: Vec<DunkbinUser>,
}

impl StaticSource {
    pub fn new(users: Vec<DunkbinUser>) -> Self {
        Self { steps: Mutex::new(VecDeque::new()), users }
    }

    /// Answer the first calls with `steps` before returning the users.
    pub fn with_steps(self, steps: Vec<FetchOutcome<Vec<DunkbinUser>>>) -> Self {
        *self.steps.lock() = steps.into();
        self
    }
}

#[async_trait]
impl SourceDirectory for StaticSource {
    async fn fetch_users(&self) -> FetchOutcome<Vec<DunkbinUser>> {
        let scripted = self.steps.lock().pop_front();
        scripted.unwrap_or_else(|| FetchOutcome::Success(self.users.clone()))
    }
}

/// Store seeded with a valid credential and a refresh token.
pub fn seeded_store() -> Arc<TokenStore> {
    Arc::new(TokenStore::new(Some(Credential::new("access-0", Some("refresh-0".into())))))
}

/// Fully wired orchestrator over fakes.
pub struct Harness {
    pub lookup: Arc<ScriptedLookup>,
    pub endpoint: Arc<CountingTokenEndpoint>,
    pub clock: MockClock,
    pub orchestrator: BatchOrchestrator,
}

impl Harness {
    pub fn new(lookup: ScriptedLookup) -> Self {
        Self::with_parts(lookup, CountingTokenEndpoint::new(), seeded_store(), FetchConfig::default())
    }

    pub fn with_parts(
        lookup: ScriptedLookup,
        endpoint: CountingTokenEndpoint,
        store: Arc<TokenStore>,
        config: FetchConfig,
    ) -> Self {
        let lookup = Arc::new(lookup);
        let endpoint = Arc::new(endpoint);
        let clock = MockClock::new();
        let refresher = TokenRefresher::new(store, Arc::clone(&endpoint) as Arc<dyn TokenEndpoint>);
        let orchestrator = BatchOrchestrator::new(
            Arc::clone(&lookup) as Arc<dyn UserLookup>,
            refresher,
            Arc::new(clock.clone()),
            &config,
        );
        Self { lookup, endpoint, clock, orchestrator }
    }
}
