use std::env;

use crate::error::AppError;

/// Identity provider settings. `project_id` doubles as the expected JWT
/// audience; the issuer is derived from it.
#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    pub project_id: String,
}

impl FirebaseConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let project_id = env::var("FIREBASE_PROJECT_ID")
            .map_err(|_| AppError::Validation("FIREBASE_PROJECT_ID is not set".to_string()))?;

        Ok(Self { project_id })
    }

    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

#[derive(Clone, Debug)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let cloud_name = env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| AppError::Validation("CLOUDINARY_CLOUD_NAME is not set".to_string()))?;
        let api_key = env::var("CLOUDINARY_API_KEY")
            .map_err(|_| AppError::Validation("CLOUDINARY_API_KEY is not set".to_string()))?;
        let api_secret = env::var("CLOUDINARY_API_SECRET")
            .map_err(|_| AppError::Validation("CLOUDINARY_API_SECRET is not set".to_string()))?;

        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
        })
    }
}

/// Shared secret carried by the payment provider webhook in the
/// `x-webhook-secret` header.
#[derive(Clone, Debug)]
pub struct WebhookConfig {
    pub secret: String,
}

impl WebhookConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let secret = env::var("PAYMENT_WEBHOOK_SECRET")
            .map_err(|_| AppError::Validation("PAYMENT_WEBHOOK_SECRET is not set".to_string()))?;

        Ok(Self { secret })
    }
}
