//! Application constants
//!
//! Defaults for the fetch pipeline and the well-known endpoints it talks to.

// Batch fetch defaults
pub const DEFAULT_CHUNK_SIZE: usize = 100;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 200;
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 2_000;
pub const DEFAULT_BACKOFF_CAP_MS: u64 = 10_000;
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Twitch
pub const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const TWITCH_HELIX_USERS_URL: &str = "https://api.twitch.tv/helix/users";

// Dunkbin
pub const DUNKBIN_USERS_URL: &str = "https://dunkbin.com/export/users";

// Mapping artifact
pub const DEFAULT_MAPPING_PATH: &str = "./src/data/pfp_map.json";
pub const NO_IMAGE_FILENAME: &str = "no_image_available.png";
pub const NO_IMAGE_REASON: &str = "No Twitch profile image available";
pub const UNKNOWN_USERNAME: &str = "unknown";
pub const MAPPING_GENERATOR: &str = "dunkstats-pfp";
pub const MAPPING_DESCRIPTION: &str = "Profile picture mapping without image downloads";
