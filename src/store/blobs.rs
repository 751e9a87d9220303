//! Blob Storage
//!
//! Durable storage for generated binary payloads (podcast audio). The store
//! is a black-box capability: callers hand over bytes and get back a public
//! URL. Keys are `{folder}/{uuid}{extension}`; the public URL is the
//! deterministic `https://{bucket}.s3.{region}.amazonaws.com/{key}` template.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{Error, Result};

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads `bytes` under a freshly generated key in `folder` and
    /// returns the public URL.
    async fn upload(
        &self,
        folder: &str,
        extension: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;

    /// Removes the object a previously returned URL points at.
    async fn delete(&self, url: &str) -> Result<()>;
}

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
}

impl S3BlobStore {
    pub async fn new(bucket: String, region: String) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket,
            region,
        }
    }

    fn url_prefix(&self) -> String {
        format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        folder: &str,
        extension: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let key = format!("{}/{}{}", folder, uuid::Uuid::new_v4(), extension);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|err| Error::Upstream(format!("blob upload failed: {}", err)))?;

        tracing::info!("Uploaded blob {} to bucket {}", key, self.bucket);
        Ok(format!("{}{}", self.url_prefix(), key))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let prefix = self.url_prefix();
        let key = url.strip_prefix(&prefix).ok_or_else(|| {
            Error::Validation(format!("blob URL does not belong to this store: {}", url))
        })?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| Error::Upstream(format!("blob delete failed: {}", err)))?;

        tracing::info!("Deleted blob {} from bucket {}", key, self.bucket);
        Ok(())
    }
}
