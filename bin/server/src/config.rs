//! Centralized server configuration.
//!
//! Strongly-typed configuration loaded once at startup via the `config`
//! crate from environment variables (`__` separator, e.g.
//! `OIDC__CLIENT_ID`). Every component receives its slice of this as a
//! plain value; there is no global configuration state.

use newsroom_access::{RoleDirectory, RoleSet};
use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Where the browser is sent after login, callback, and logout.
    #[serde(default = "default_landing_url")]
    pub landing_url: String,

    /// Directory containing the built front-end bundle.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// OIDC identity provider configuration.
    pub oidc: OidcConfig,

    /// Role allow-list configuration.
    #[serde(default)]
    pub roles: RoleConfig,

    /// News search API proxy configuration.
    pub news: NewsConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_landing_url() -> String {
    "/".to_string()
}

fn default_static_dir() -> String {
    "dist".to_string()
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session duration in minutes.
    #[serde(default = "default_session_duration_minutes")]
    pub duration_minutes: i64,

    /// Interval between expired-session sweeps, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_session_duration_minutes() -> i64 {
    480
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_session_duration_minutes(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

/// Configuration for the OIDC identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct OidcConfig {
    /// The OIDC issuer URL, used for provider discovery.
    pub issuer_url: String,
    /// The OAuth2 client ID registered with the provider.
    pub client_id: String,
    /// The OAuth2 client secret.
    pub client_secret: String,
    /// The redirect URI registered for the callback.
    pub redirect_uri: String,
    /// OAuth2 scopes to request, comma-separated.
    #[serde(default = "default_scopes")]
    pub scopes: String,
}

fn default_scopes() -> String {
    "openid,email,profile".to_string()
}

impl OidcConfig {
    /// Returns the scopes to request, parsed from the comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// The email allow-list granting elevated roles.
///
/// Everyone else authenticates with an empty role set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleConfig {
    /// Comma-separated emails granted the moderator role.
    #[serde(default)]
    pub moderators: String,

    /// Comma-separated emails granted admin (implies moderator).
    #[serde(default)]
    pub admins: String,
}

impl RoleConfig {
    /// Builds the role directory from the configured allow-lists.
    ///
    /// An email in both lists gets the admin set (the stronger grant).
    #[must_use]
    pub fn directory(&self) -> RoleDirectory {
        let mut directory = RoleDirectory::new();
        for email in split_list(&self.moderators) {
            directory.assign(email, RoleSet::moderator());
        }
        for email in split_list(&self.admins) {
            directory.assign(email, RoleSet::admin());
        }
        directory
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Configuration for the news search API proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// API key held server-side; never exposed to the browser.
    pub api_key: String,
    /// Search endpoint URL.
    #[serde(default = "default_news_endpoint")]
    pub endpoint: String,
    /// Free-text search query.
    #[serde(default)]
    pub query: String,
    /// Optional filtered query expression.
    #[serde(default)]
    pub filter: Option<String>,
    /// Sort order.
    #[serde(default = "default_news_sort")]
    pub sort: String,
}

fn default_news_endpoint() -> String {
    "https://api.nytimes.com/svc/search/v2/articlesearch.json".to_string()
}

fn default_news_sort() -> String {
    "newest".to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.duration_minutes, 480);
        assert_eq!(config.cleanup_interval_seconds, 300);
        assert!(config.secure_cookies);
    }

    #[test]
    fn oidc_scopes_parse_comma_separated() {
        let config = OidcConfig {
            issuer_url: "https://auth.example.com".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://app.example.com/api/auth/callback".to_string(),
            scopes: "openid, email ,profile".to_string(),
        };
        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
    }

    #[test]
    fn role_config_builds_directory() {
        let config = RoleConfig {
            moderators: "mod@example.com, second@example.com".to_string(),
            admins: "admin@example.com".to_string(),
        };
        let directory = config.directory();

        assert!(directory.resolve("mod@example.com").is_moderator());
        assert!(!directory.resolve("mod@example.com").is_admin());
        assert!(directory.resolve("admin@example.com").is_admin());
        assert!(directory.resolve("reader@example.com").is_empty());
    }

    #[test]
    fn admin_list_wins_over_moderator_list() {
        let config = RoleConfig {
            moderators: "both@example.com".to_string(),
            admins: "both@example.com".to_string(),
        };
        assert!(config.directory().resolve("both@example.com").is_admin());
    }

    #[test]
    fn empty_role_config_grants_nothing() {
        let directory = RoleConfig::default().directory();
        assert!(directory.is_empty());
        assert!(directory.resolve("anyone@example.com").is_empty());
    }
}
