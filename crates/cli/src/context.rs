//! Application context - dependency wiring

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use dunkstats_common::{Clock, SystemClock};
use dunkstats_core::{
    BatchOrchestrator, CredentialSink, NoopCredentialSink, PfpMappingService, ResponseClassifier,
    RetryPolicy, RetryingFetcher, SourceDirectory, TokenEndpoint, TokenRefresher, TokenStore,
    UserLookup,
};
use dunkstats_domain::{Config, Credential};
use dunkstats_infra::{
    DunkbinClient, EnvFileCredentialSink, HelixUserClient, HttpClient, MappingWriter,
    TwitchTokenClient,
};

/// Application context - holds the wired services.
pub struct AppContext {
    /// Effective configuration after file, environment and flags.
    pub config: Config,
    /// Token store shared by the refresher and the orchestrator.
    pub store: Arc<TokenStore>,
    /// Mapping generation pipeline.
    pub service: PfpMappingService,
    /// Artifact writer.
    pub writer: MappingWriter,
}

impl AppContext {
    /// Wire adapters and services for `config`.
    ///
    /// Refreshed tokens are written to `env_file` when given.
    ///
    /// # Errors
    /// Fails when the HTTP client cannot be built.
    pub fn new(config: Config, env_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.fetch.http_timeout())
            .build()
            .context("failed to build HTTP client")?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let store = Arc::new(TokenStore::new(initial_credential(&config)));
        let endpoint = TwitchTokenClient::new(
            http.clone(),
            &config.twitch.token_url,
            &config.twitch.client_id,
            config.twitch.client_secret.clone(),
        );
        let sink: Arc<dyn CredentialSink> = match env_file {
            Some(path) => Arc::new(EnvFileCredentialSink::new(path)),
            None => Arc::new(NoopCredentialSink),
        };
        let allow_client_credentials = endpoint.has_client_secret();
        let refresher =
            TokenRefresher::new(Arc::clone(&store), Arc::new(endpoint) as Arc<dyn TokenEndpoint>)
                .with_sink(sink)
                .with_client_credentials(allow_client_credentials)
                .with_refresh_threshold(config.fetch.refresh_threshold_secs);

        let lookup = HelixUserClient::new(
            http.clone(),
            &config.twitch.helix_users_url,
            &config.twitch.client_id,
            ResponseClassifier::from_config(&config.fetch),
        );
        let orchestrator = BatchOrchestrator::new(
            Arc::new(lookup) as Arc<dyn UserLookup>,
            refresher,
            Arc::clone(&clock),
            &config.fetch,
        );

        let source = DunkbinClient::new(
            http,
            &config.dunkbin.users_url,
            &config.dunkbin.username,
            &config.dunkbin.password,
        );
        let service = PfpMappingService::new(
            Arc::new(source) as Arc<dyn SourceDirectory>,
            RetryingFetcher::new(RetryPolicy::from_config(&config.fetch), clock),
            orchestrator,
        );

        let writer = MappingWriter::from_config(&config.output);

        Ok(Self { config, store, service, writer })
    }
}

/// Credential seeded from configuration.
///
/// A refresh token without an access token yields a credential with an empty
/// access token, which is refreshed before first use.
fn initial_credential(config: &Config) -> Option<Credential> {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
    let access_token = non_empty(&config.twitch.access_token);
    let refresh_token = non_empty(&config.twitch.refresh_token);

    match (access_token, refresh_token) {
        (None, None) => None,
        (access_token, refresh_token) => {
            Some(Credential::new(access_token.unwrap_or_default(), refresh_token))
        }
    }
}
