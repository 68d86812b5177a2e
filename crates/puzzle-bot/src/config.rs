//! Bot configuration from environment variables

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::error::BotError;

/// OAuth 1.0a user-context credentials for the posting account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_key_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_key_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Where puzzles come from and how they are rendered. Needs no credentials.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Lichess puzzle CSV
    pub dataset_path: PathBuf,

    /// Skip the first CSV row
    pub dataset_has_headers: bool,

    /// Staging directory for the rendered files
    pub work_dir: PathBuf,

    /// Rasterization multiplier applied to the board's pixel size
    pub render_scale: f32,
}

impl RenderSettings {
    pub fn load() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dataset_path = lookup("PUZZLE_CSV_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("lichess_puzzles.csv"));

        let dataset_has_headers = lookup("PUZZLE_CSV_HAS_HEADERS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let work_dir = lookup("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let render_scale = lookup("RENDER_SCALE")
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(3.0);
        if !(render_scale.is_finite() && render_scale > 0.0) {
            return Err(BotError::Config(format!(
                "RENDER_SCALE must be positive, got {render_scale}"
            )));
        }

        Ok(Self {
            dataset_path,
            dataset_has_headers,
            work_dir,
            render_scale,
        })
    }
}

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub credentials: Credentials,

    pub render: RenderSettings,

    /// Where posted images are kept
    pub archive_dir: PathBuf,

    /// Base URL for account and post endpoints
    pub api_base: String,

    /// Base URL for media uploads
    pub upload_base: String,

    pub http_timeout_secs: u64,
}

impl BotConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| BotError::Config(format!("{key} not set")))
        };

        let credentials = Credentials {
            api_key: required("TWITTER_API_KEY")?,
            api_key_secret: required("TWITTER_API_KEY_SECRET")?,
            access_token: required("TWITTER_ACCESS_TOKEN")?,
            access_token_secret: required("TWITTER_ACCESS_TOKEN_SECRET")?,
        };

        let render = RenderSettings::from_lookup(&lookup)?;

        // Relative archive paths live under the working directory
        let archive_dir = lookup("ARCHIVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("posted_chess_puzzles"));
        let archive_dir = if archive_dir.is_relative() {
            render.work_dir.join(archive_dir)
        } else {
            archive_dir
        };

        let api_base = lookup("TWITTER_API_BASE")
            .unwrap_or_else(|| "https://api.twitter.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let upload_base = lookup("TWITTER_UPLOAD_BASE")
            .unwrap_or_else(|| "https://upload.twitter.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let http_timeout_secs = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Ok(Self {
            credentials,
            render,
            archive_dir,
            api_base,
            upload_base,
            http_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const CREDS: [(&str, &str); 4] = [
        ("TWITTER_API_KEY", "key"),
        ("TWITTER_API_KEY_SECRET", "key-secret"),
        ("TWITTER_ACCESS_TOKEN", "token"),
        ("TWITTER_ACCESS_TOKEN_SECRET", "token-secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&CREDS)).unwrap();
        assert_eq!(config.render.dataset_path, PathBuf::from("lichess_puzzles.csv"));
        assert!(!config.render.dataset_has_headers);
        assert_eq!(config.render.work_dir, PathBuf::from("."));
        assert_eq!(config.archive_dir, PathBuf::from("./posted_chess_puzzles"));
        assert_eq!(config.render.render_scale, 3.0);
        assert_eq!(config.api_base, "https://api.twitter.com");
        assert_eq!(config.upload_base, "https://upload.twitter.com");
        assert_eq!(config.http_timeout_secs, 60);
        assert_eq!(config.credentials.access_token, "token");
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        let err = BotConfig::from_lookup(lookup_from(&CREDS[..3])).unwrap_err();
        match err {
            BotError::Config(msg) => assert!(msg.contains("TWITTER_ACCESS_TOKEN_SECRET")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_credential_rejected() {
        let mut pairs = CREDS.to_vec();
        pairs[0] = ("TWITTER_API_KEY", "   ");
        assert!(matches!(
            BotConfig::from_lookup(lookup_from(&pairs)),
            Err(BotError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = CREDS.to_vec();
        pairs.extend([
            ("PUZZLE_CSV_PATH", "/data/puzzles.csv"),
            ("PUZZLE_CSV_HAS_HEADERS", "true"),
            ("WORK_DIR", "/tmp/bot"),
            ("ARCHIVE_DIR", "/srv/archive"),
            ("RENDER_SCALE", "1.5"),
            ("TWITTER_API_BASE", "http://127.0.0.1:9000/"),
        ]);
        let config = BotConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.render.dataset_path, PathBuf::from("/data/puzzles.csv"));
        assert!(config.render.dataset_has_headers);
        assert_eq!(config.archive_dir, PathBuf::from("/srv/archive"));
        assert_eq!(config.render.render_scale, 1.5);
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("RENDER_SCALE", "0"));
        assert!(matches!(
            BotConfig::from_lookup(lookup_from(&pairs)),
            Err(BotError::Config(_))
        ));
    }

    #[test]
    fn test_render_settings_need_no_credentials() {
        let settings = RenderSettings::from_lookup(lookup_from(&[("WORK_DIR", "/tmp/preview")])).unwrap();
        assert_eq!(settings.work_dir, PathBuf::from("/tmp/preview"));
        assert_eq!(settings.render_scale, 3.0);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = BotConfig::from_lookup(lookup_from(&CREDS)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("token-secret"));
        assert!(!rendered.contains("key-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
