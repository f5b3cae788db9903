//! Upload of the cached file to an S3-compatible bucket (Aliyun OSS, MinIO, S3).
//!
//! The aws-sdk-s3 client is async; [`OssUploader`] owns a current-thread tokio
//! runtime and blocks on each request so the rest of the tool stays sequential.

use crate::config::Remote2OssConfig;
use crate::error::UploadError;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{
    BehaviorVersion, Credentials, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;

/// Stores a local file under a key, replacing any existing object.
pub trait Uploader {
    fn upload(&self, key: &str, local_path: &Path) -> Result<(), UploadError>;
}

pub struct OssUploader {
    client: aws_sdk_s3::Client,
    bucket: String,
    runtime: tokio::runtime::Runtime,
}

impl OssUploader {
    pub fn new(cfg: &Remote2OssConfig) -> Result<Self, UploadError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(UploadError::Runtime)?;

        let conf = s3_config(cfg);
        let client = {
            let _guard = runtime.enter();
            aws_sdk_s3::Client::from_conf(conf)
        };

        Ok(OssUploader {
            client,
            bucket: cfg.oss_bucket.trim().to_string(),
            runtime,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl Uploader for OssUploader {
    fn upload(&self, key: &str, local_path: &Path) -> Result<(), UploadError> {
        let content_type = content_type(local_path);
        self.runtime.block_on(async {
            let body = ByteStream::from_path(local_path)
                .await
                .map_err(|e| UploadError::Body {
                    path: local_path.to_path_buf(),
                    message: e.to_string(),
                })?;

            let mut request = self
                .client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .body(body);
            if let Some(ct) = content_type {
                request = request.content_type(ct);
            }
            request.send().await.map_err(|e| UploadError::Put {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;
            Ok::<(), UploadError>(())
        })?;
        tracing::debug!("uploaded {} to {}/{}", local_path.display(), self.bucket, key);
        Ok(())
    }
}

/// Client config for the OSS/S3 endpoint.
///
/// SDK retries are disabled and checksums are only sent when an operation
/// requires them; S3-compatible stores commonly reject `aws-chunked` CRC bodies.
pub fn s3_config(cfg: &Remote2OssConfig) -> aws_sdk_s3::Config {
    let endpoint = endpoint_url(&cfg.oss_endpoint);
    tracing::info!("endpoint: {} (region {})", endpoint, cfg.region());

    let credentials = Credentials::new(
        cfg.oss_access_key_id.trim(),
        cfg.oss_access_key_secret.trim(),
        None,
        None,
        "remote2oss-config",
    );
    aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(endpoint)
        .region(Region::new(cfg.region().to_string()))
        .credentials_provider(credentials)
        .force_path_style(cfg.oss_force_path_style)
        .retry_config(RetryConfig::disabled())
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
        .build()
}

/// Endpoint with an explicit scheme; bare hosts such as `oss-cn-hangzhou.aliyuncs.com` get `https://`.
pub fn endpoint_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    }
}

/// MIME type sniffed from the file's leading bytes, if recognizable.
pub fn content_type(path: &Path) -> Option<&'static str> {
    match infer::get_from_path(path) {
        Ok(kind) => kind.map(|k| k.mime_type()),
        Err(e) => {
            tracing::debug!("content sniffing failed for {}: {}", path.display(), e);
            None
        }
    }
}
