use serde::{Deserialize, Serialize};

/// Configuration for the users_info module (`modules.users_info` in the app config)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersInfoConfig {
    /// Base URL the HTTP gateway talks to.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for UsersInfoConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8087".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}
