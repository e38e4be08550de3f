//! Domain types and models

pub mod credential;
pub mod dunkbin;
pub mod fetch;
pub mod mapping;
pub mod twitch;

pub use credential::{Credential, TokenGrant, TokenResponse};
pub use dunkbin::DunkbinUser;
pub use fetch::{BatchFailure, BatchRequest, FetchOutcome, FetchReport, NextAction};
pub use mapping::{MappingMetadata, PfpMapping, UserPfpEntry};
pub use twitch::{HelixUsersResponse, TwitchUser};
