//! Twitch adapters
//!
//! - [`helix`]: bulk user lookup (`GET /helix/users`)
//! - [`oauth`]: token endpoint (`POST /oauth2/token`)

pub mod helix;
pub mod oauth;

pub use helix::HelixUserClient;
pub use oauth::TwitchTokenClient;
