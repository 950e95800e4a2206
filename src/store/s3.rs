//! S3 backend over aws-sdk-s3: retrying single-PUT writes with Content-MD5,
//! byte-range reads, and delimiter listing.

use crate::error::BackendError;
use crate::store::client::{Listing, ObjectBackend, ObjectMeta};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use std::time::SystemTime;
use tokio::time::{Duration, sleep, timeout};

/// S3 backend tuning.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    /// Optional custom endpoint (MinIO and friends).
    pub endpoint_url: Option<String>,
    pub max_retries: u32,
    /// Initial retry delay in milliseconds, doubled per attempt.
    pub initial_retry_delay_ms: u64,
    /// Per-call timeout.
    pub timeout: Duration,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
            max_retries: 3,
            initial_retry_delay_ms: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct S3Backend {
    client: aws_sdk_s3::Client,
    bucket: String,
    config: S3Config,
}

impl S3Backend {
    /// Build a backend for one bucket. Credentials come from the environment
    /// (AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY).
    pub async fn new(bucket: impl Into<String>, config: S3Config) -> Result<Self, BackendError> {
        let mut loader = aws_config::ConfigLoader::default()
            .credentials_provider(
                aws_config::environment::EnvironmentVariableCredentialsProvider::new(),
            )
            .region(aws_config::Region::new(config.region.clone()));
        if let Some(url) = &config.endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let conf = loader.load().await;
        let client = aws_sdk_s3::Client::new(&conf);
        Ok(Self {
            client,
            bucket: bucket.into(),
            config,
        })
    }

    fn md5_base64(data: &[u8]) -> String {
        let sum = md5::compute(data);
        B64.encode(sum.0)
    }

    /// Retry `operation` with exponential backoff, bounding each attempt by
    /// the configured per-call timeout.
    async fn execute_with_retry<T, F, Fut, E>(
        &self,
        operation: F,
        operation_name: &'static str,
    ) -> Result<T, BackendError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        let mut attempt = 0;
        let max_retries = self.config.max_retries;
        loop {
            attempt += 1;
            let outcome = match timeout(self.config.timeout, operation()).await {
                Ok(res) => res.map_err(|e| format!("{e}")),
                Err(_) => Err(format!("timed out after {:?}", self.config.timeout)),
            };
            match outcome {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if attempt > max_retries {
                        return Err(Box::new(std::io::Error::other(format!(
                            "{operation_name} failed after {max_retries} attempts: {e}"
                        ))));
                    }
                    let delay_ms = self.config.initial_retry_delay_ms * 2u64.pow(attempt - 1);
                    log::warn!("{operation_name} attempt {attempt} failed: {e}; retrying");
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    fn datetime_to_system_time(dt: &aws_sdk_s3::primitives::DateTime) -> Option<SystemTime> {
        let secs = u64::try_from(dt.secs()).ok()?;
        SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs, dt.subsec_nanos()))
    }
}

#[async_trait]
impl ObjectBackend for S3Backend {
    async fn put_object(&self, key: &str, data: &[u8]) -> Result<(), BackendError> {
        let checksum = Self::md5_base64(data);
        self.execute_with_retry(
            || async {
                self.client
                    .put_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .body(data.to_owned().into())
                    .content_md5(checksum.clone())
                    .send()
                    .await
            },
            "put_object",
        )
        .await?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let resp = timeout(
            self.config.timeout,
            self.client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send(),
        )
        .await
        .map_err(|_| std::io::Error::other("get_object timed out"))?;
        match resp {
            Ok(o) => {
                let body = o.body.collect().await?.into_bytes();
                Ok(Some(body.to_vec()))
            }
            Err(e) => {
                // NoSuchKey means the key is absent; anything else is a real failure.
                let msg = format!("{e}");
                if msg.contains("NoSuchKey") {
                    Ok(None)
                } else {
                    Err(Box::new(e))
                }
            }
        }
    }

    async fn get_object_range(
        &self,
        key: &str,
        offset: u64,
        len: usize,
    ) -> Result<Option<Vec<u8>>, BackendError> {
        if len == 0 {
            return Ok(Some(Vec::new()));
        }
        let range = format!("bytes={}-{}", offset, offset + len as u64 - 1);
        let resp = timeout(
            self.config.timeout,
            self.client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .range(range)
                .send(),
        )
        .await
        .map_err(|_| std::io::Error::other("get_object_range timed out"))?;
        match resp {
            Ok(o) => {
                let body = o.body.collect().await?.into_bytes();
                Ok(Some(body.to_vec()))
            }
            Err(e) => {
                let msg = format!("{e}");
                if msg.contains("NoSuchKey") {
                    Ok(None)
                } else if msg.contains("InvalidRange") {
                    // Read starting at/after EOF: empty result, not an error.
                    Ok(Some(Vec::new()))
                } else {
                    Err(Box::new(e))
                }
            }
        }
    }

    async fn delete_object(&self, key: &str) -> Result<(), BackendError> {
        self.execute_with_retry(
            || async {
                self.client
                    .delete_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .send()
                    .await
            },
            "delete_object",
        )
        .await?;
        Ok(())
    }

    async fn list_objects(&self, prefix: &str, delimiter: &str) -> Result<Listing, BackendError> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .delimiter(delimiter);
        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }
        let resp = self
            .execute_with_retry(|| req.clone().send(), "list_objects")
            .await?;

        let common_prefixes = resp
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(|s| s.to_string()))
            .collect();
        let objects = resp
            .contents()
            .iter()
            .filter_map(|o| {
                let key = o.key()?.to_string();
                Some(ObjectMeta {
                    key,
                    size: o.size().unwrap_or(0).max(0) as u64,
                    last_modified: o.last_modified().and_then(Self::datetime_to_system_time),
                })
            })
            .collect();
        Ok(Listing {
            common_prefixes,
            objects,
        })
    }
}
