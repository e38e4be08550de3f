//! Profile-picture mapping service
//!
//! Joins the Dunkbin user export with the Twitch profile images resolved by
//! the batch orchestrator. Images are referenced, never downloaded.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dunkstats_domain::constants::{
    MAPPING_DESCRIPTION, MAPPING_GENERATOR, NO_IMAGE_FILENAME, NO_IMAGE_REASON, UNKNOWN_USERNAME,
};
use dunkstats_domain::{
    DunkbinUser, FetchReport, MappingMetadata, PfpMapping, Result, TwitchUser, UserPfpEntry,
};
use tracing::{debug, info};

use crate::fetch::{BatchOrchestrator, RetryingFetcher, SourceDirectory};

/// Generates the [`PfpMapping`] artifact.
pub struct PfpMappingService {
    source: Arc<dyn SourceDirectory>,
    source_fetcher: RetryingFetcher,
    orchestrator: BatchOrchestrator,
}

impl std::fmt::Debug for PfpMappingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PfpMappingService")
            .field("source_fetcher", &self.source_fetcher)
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}

impl PfpMappingService {
    /// `source_fetcher` drives the Dunkbin export request; it never
    /// refreshes credentials.
    pub fn new(
        source: Arc<dyn SourceDirectory>,
        source_fetcher: RetryingFetcher,
        orchestrator: BatchOrchestrator,
    ) -> Self {
        Self { source, source_fetcher, orchestrator }
    }

    /// Fetch source users, resolve their Twitch records and build the
    /// mapping.
    ///
    /// # Errors
    /// Fails when the source export cannot be fetched or no Twitch
    /// credential can be obtained. Individual lookup chunks that fail only
    /// reduce the number of users with a picture.
    pub async fn generate(&self) -> Result<(PfpMapping, FetchReport)> {
        let source = self.source.as_ref();
        let users = self
            .source_fetcher
            .fetch_resource("dunkbin_users", move || source.fetch_users())
            .await?;
        info!(users = users.len(), "fetched source users");

        let logins: Vec<String> =
            users.iter().filter_map(DunkbinUser::login).map(str::to_string).collect();
        let report = self.orchestrator.fetch_all(&logins).await?;
        info!(
            resolved = report.records.len(),
            requested = logins.len(),
            "fetched Twitch users"
        );

        let mapping = build_mapping(&users, &report, Utc::now());
        info!(
            total = mapping.metadata.total_users,
            with_pfp = mapping.metadata.users_with_pfp,
            without_pfp = mapping.metadata.users_without_pfp,
            "profile picture mapping built"
        );
        Ok((mapping, report))
    }
}

/// Build the mapping for `users` from the images found in `report`.
pub fn build_mapping(users: &[DunkbinUser], report: &FetchReport, generated: DateTime<Utc>) -> PfpMapping {
    let images = profile_images(&report.records);

    let mut entries = BTreeMap::new();
    let mut with_pfp = 0;

    for user in users {
        let image = user.login().and_then(|login| images.get(&login.to_lowercase()));
        if image.is_some() {
            with_pfp += 1;
        } else {
            debug!(user = %user.id, login = user.login().unwrap_or(UNKNOWN_USERNAME), "no profile image");
        }

        let username = user.login().unwrap_or(UNKNOWN_USERNAME).to_string();
        let display_name = user
            .display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&username)
            .to_string();

        entries.insert(
            user.id.clone(),
            UserPfpEntry {
                username,
                display_name,
                pfp_filename: if image.is_some() {
                    format!("{}.png", user.id)
                } else {
                    NO_IMAGE_FILENAME.to_string()
                },
                has_custom_pfp: image.is_some(),
                twitch_profile_url: image.map(|url| (*url).to_string()),
                last_updated: generated,
                reason: image.is_none().then(|| NO_IMAGE_REASON.to_string()),
            },
        );
    }

    PfpMapping {
        metadata: MappingMetadata {
            generated,
            total_users: users.len(),
            users_with_pfp: with_pfp,
            users_without_pfp: users.len() - with_pfp,
            unresolved_logins: report.unresolved_count,
            generator: MAPPING_GENERATOR.to_string(),
            description: MAPPING_DESCRIPTION.to_string(),
        },
        users: entries,
    }
}

fn profile_images(records: &[TwitchUser]) -> HashMap<String, &str> {
    records
        .iter()
        .filter_map(|record| record.profile_image().map(|url| (record.key(), url)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dunkbin(id: &str, login: Option<&str>, display_name: Option<&str>) -> DunkbinUser {
        DunkbinUser {
            id: id.to_string(),
            login: login.map(str::to_string),
            display_name: display_name.map(str::to_string),
        }
    }

    fn twitch(login: &str, image: &str) -> TwitchUser {
        serde_json::from_value(serde_json::json!({
            "id": "99",
            "login": login,
            "profile_image_url": image,
        }))
        .unwrap()
    }

    #[test]
    fn users_with_images_get_id_filename() {
        let users = vec![dunkbin("1", Some("Dunker"), Some("The Dunker"))];
        let report = FetchReport {
            records: vec![twitch("dunker", "https://cdn/x.png")],
            ..FetchReport::default()
        };

        let mapping = build_mapping(&users, &report, Utc::now());
        let entry = &mapping.users["1"];

        assert_eq!(entry.pfp_filename, "1.png");
        assert!(entry.has_custom_pfp);
        assert_eq!(entry.twitch_profile_url.as_deref(), Some("https://cdn/x.png"));
        assert_eq!(entry.display_name, "The Dunker");
        assert_eq!(entry.reason, None);
        assert_eq!(mapping.metadata.users_with_pfp, 1);
    }

    #[test]
    fn users_without_images_are_marked() {
        let users = vec![dunkbin("2", Some("quiet"), None), dunkbin("3", None, None)];
        let report = FetchReport {
            records: vec![twitch("quiet", "")],
            unresolved_count: 1,
            ..FetchReport::default()
        };

        let mapping = build_mapping(&users, &report, Utc::now());

        let quiet = &mapping.users["2"];
        assert_eq!(quiet.pfp_filename, NO_IMAGE_FILENAME);
        assert_eq!(quiet.reason.as_deref(), Some(NO_IMAGE_REASON));
        assert_eq!(quiet.display_name, "quiet");

        let anonymous = &mapping.users["3"];
        assert_eq!(anonymous.username, UNKNOWN_USERNAME);
        assert_eq!(anonymous.display_name, UNKNOWN_USERNAME);

        assert_eq!(mapping.metadata.total_users, 2);
        assert_eq!(mapping.metadata.users_without_pfp, 2);
        assert_eq!(mapping.metadata.unresolved_logins, 1);
    }
}
