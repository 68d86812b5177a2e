use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::clients::oauth::OAuthSigner;
use crate::config::BotConfig;
use crate::error::BotError;

/// The authenticated account.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id_str: String,
    pub screen_name: String,
}

#[derive(Debug, Deserialize)]
struct MediaUpload {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    id: String,
}

/// Client for the three X/Twitter calls the bot needs.
pub struct TwitterClient {
    client: Client,
    signer: OAuthSigner,
    api_base: String,
    upload_base: String,
}

impl TwitterClient {
    pub fn new(config: &BotConfig) -> Result<Self, BotError> {
        let client = Client::builder()
            .user_agent("ChessPuzzleBot/1.0")
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            signer: OAuthSigner::new(config.credentials.clone()),
            api_base: config.api_base.clone(),
            upload_base: config.upload_base.clone(),
        })
    }

    /// Check the credentials against the account endpoint.
    pub async fn verify_credentials(&self) -> Result<Account, BotError> {
        let url = format!("{}/1.1/account/verify_credentials.json", self.api_base);
        let auth = self.signer.authorization_header("GET", &url, &[])?;

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BotError::Auth(format!("HTTP {status}: {body}")));
        }

        resp.json::<Account>()
            .await
            .map_err(|e| BotError::Response(format!("verify_credentials: {e}")))
    }

    /// Upload an image and return its media id.
    pub async fn upload_media(&self, path: &Path) -> Result<String, BotError> {
        let url = format!("{}/1.1/media/upload.json", self.upload_base);

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "puzzle.png".to_string());
        debug!(file = %file_name, bytes = bytes.len(), "Uploading media");

        let part = Part::bytes(bytes).file_name(file_name).mime_str("image/png")?;
        let form = Form::new().part("media", part);
        let auth = self.signer.authorization_header("POST", &url, &[])?;

        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await?;

        let upload: MediaUpload = parse_json(resp, "media/upload").await?;
        Ok(upload.media_id_string)
    }

    /// Publish a post with the given media attached. Returns the post id.
    pub async fn create_post(&self, text: &str, media_ids: &[String]) -> Result<String, BotError> {
        let url = format!("{}/2/tweets", self.api_base);
        let auth = self.signer.authorization_header("POST", &url, &[])?;

        let body = json!({
            "text": text,
            "media": { "media_ids": media_ids },
        });

        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await?;

        let created: CreatedPost = parse_json(resp, "tweets").await?;
        Ok(created.data.id)
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    resp: Response,
    endpoint: &str,
) -> Result<T, BotError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(BotError::Api {
            status: status.as_u16(),
            body,
        });
    }

    resp.json::<T>()
        .await
        .map_err(|e| BotError::Response(format!("{endpoint}: {e}")))
}
