use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::config::CloudinaryConfig;
use crate::error::AppError;

/// What kind of remote asset an operation targets. The provider keys its
/// upload and destroy endpoints by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    fn resource_type(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        kind: AssetKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedAsset, AppError>;

    async fn destroy(&self, kind: AssetKind, public_id: &str) -> Result<(), AppError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

/// Cloudinary-backed media storage. Requests are authenticated with the
/// account's api key plus a SHA-1 signature over the sorted parameters and
/// the api secret.
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Media(format!("Failed to build http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn sign(&self, params_to_sign: &str) -> String {
        let mut hasher = sha1_smol::Sha1::new();
        hasher.update(params_to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hasher.digest().to_string()
    }

    fn endpoint(&self, kind: AssetKind, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/{}/{}",
            self.config.cloud_name,
            kind.resource_type(),
            action
        )
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(
        &self,
        kind: AssetKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedAsset, AppError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&format!("timestamp={timestamp}"));

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint(kind, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Media(format!("Upload request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Media(format!("Upload rejected {status}: {body}")));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Media(format!("Failed to parse upload response: {e}")))?;

        Ok(UploadedAsset {
            url: parsed.secure_url,
            public_id: parsed.public_id,
        })
    }

    async fn destroy(&self, kind: AssetKind, public_id: &str) -> Result<(), AppError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&format!("public_id={public_id}&timestamp={timestamp}"));

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Media(format!("Destroy request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Media(format!("Destroy rejected {status}: {body}")));
        }

        Ok(())
    }
}

/// Media store that accepts every call without touching the network.
pub struct NoopMediaStore;

#[async_trait]
impl MediaStore for NoopMediaStore {
    async fn upload(
        &self,
        _kind: AssetKind,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadedAsset, AppError> {
        Ok(UploadedAsset {
            url: format!("noop://{file_name}"),
            public_id: format!("noop/{file_name}"),
        })
    }

    async fn destroy(&self, _kind: AssetKind, _public_id: &str) -> Result<(), AppError> {
        Ok(())
    }
}
