use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;

use super::{ImageStore, StoredImage, object_key};
use crate::error::{Error, Result};

/// Uploads images to an S3 bucket
#[derive(Debug, Clone)]
pub struct S3Store {
    client: S3Client,
    bucket: String,
    prefix: String,
    public_base_url: String,
}

impl S3Store {
    /// Connect using the default AWS credential chain
    pub async fn connect(
        bucket: String,
        prefix: String,
        region: Option<String>,
        public_base_url: String,
    ) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let shared = loader.load().await;

        Self::new(S3Client::new(&shared), bucket, prefix, public_base_url)
    }

    pub fn new(client: S3Client, bucket: String, prefix: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for S3Store {
    async fn store(&self, title: &str, png_base64: &str) -> Result<StoredImage> {
        let bytes = general_purpose::STANDARD
            .decode(png_base64)
            .map_err(|e| Error::Storage(format!("Image payload is not valid base64: {}", e)))?;

        let key = object_key(&self.prefix, Utc::now(), title);
        log::info!("Uploading badge image to s3://{}/{}", self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("image/png")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Failed to write to S3: {}", e)))?;

        Ok(StoredImage {
            reference: format!("{}/{}", self.public_base_url, key),
            key: Some(key),
        })
    }
}
