use std::{error, fmt};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::FrontendConfig;

pub const IMGBB_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

/// A picture picked by the user, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new<S: Into<String>>(name: S, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[derive(Debug)]
pub enum UploadError {
    MissingApiKey,
    Transport(reqwest::Error),
    Rejected(String),
}

impl error::Error for UploadError {}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UploadError::MissingApiKey => write!(f, "no ImgBB API key configured"),
            UploadError::Transport(e) => write!(f, "upload failed: {}", e),
            UploadError::Rejected(message) => f.write_str(message),
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        UploadError::Transport(e)
    }
}

/// Somewhere pictures can be uploaded to, yielding a public URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct ImgBbResponse {
    #[serde(default)]
    success: bool,
    data: Option<ImgBbData>,
    error: Option<ImgBbError>,
}

#[derive(Debug, Deserialize)]
struct ImgBbData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ImgBbError {
    message: String,
}

impl ImgBbResponse {
    fn into_url(self) -> Result<String, UploadError> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data.url),
            (_, _, Some(error)) => Err(UploadError::Rejected(error.message)),
            _ => Err(UploadError::Rejected("ImgBB sent no image URL".to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImgBb {
    client: reqwest::Client,
    upload_url: String,
    api_key: Option<String>,
    expiration: u32,
}

impl ImgBb {
    pub fn new(api_key: Option<String>, expiration: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: IMGBB_UPLOAD_URL.to_owned(),
            api_key,
            expiration,
        }
    }

    pub fn from_config(config: &FrontendConfig) -> Self {
        Self::new(config.imgbb_api_key.clone(), config.imgbb_expiration)
    }
}

#[async_trait]
impl ImageHost for ImgBb {
    async fn upload(&self, file: &ImageFile) -> Result<String, UploadError> {
        let api_key = self.api_key.as_ref().ok_or(UploadError::MissingApiKey)?;
        let form = Form::new()
            .part(
                "image",
                Part::bytes(file.bytes.clone()).file_name(file.name.clone()),
            )
            .text("key", api_key.clone())
            .text("expiration", self.expiration.to_string());

        log::debug!("uploading {} ({} bytes)", file.name, file.bytes.len());
        let response: ImgBbResponse = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;
        response.into_url()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Result<String, UploadError> {
        serde_json::from_value::<ImgBbResponse>(value).unwrap().into_url()
    }

    #[test]
    fn url_is_taken_from_data() {
        let url = parse(json!({
            "success": true,
            "status": 200,
            "data": { "id": "abc", "url": "https://i.ibb.co/abc/pier.png" },
        }))
        .unwrap();
        assert_eq!(url, "https://i.ibb.co/abc/pier.png");
    }

    #[test]
    fn rejection_carries_message() {
        let error = parse(json!({
            "status_code": 400,
            "error": { "message": "Invalid API v1 key.", "code": 100 },
        }))
        .unwrap_err();
        assert_eq!(error.to_string(), "Invalid API v1 key.");
    }

    #[tokio::test]
    async fn missing_key_fails_before_sending() {
        let host = ImgBb::new(None, 600);
        let error = host
            .upload(&ImageFile::new("pier.png", vec![0x89, 0x50]))
            .await
            .unwrap_err();
        assert!(matches!(error, UploadError::MissingApiKey));
    }
}
