//! Multi-scheme storage access (S3, GCS, Azure, local)
//!
//! A `StorageLocation` wraps an `object_store` implementation behind a
//! parsed URL. Both the source reader (listing and fetching partitions)
//! and the sink writer (putting data files) go through this type.

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;

/// A parsed storage location backed by an object store
#[derive(Debug, Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
    /// Display base for building full URLs (scheme://bucket/prefix or local path)
    base: String,
}

impl StorageLocation {
    /// Parse a storage URL and create the appropriate object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/` or `./path/` - Local filesystem (created if absent)
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url)
        }
    }

    /// Parse an S3 URL
    fn parse_s3(url: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket_url(url, "s3")?;

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::storage(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            base: display_base("s3", bucket, &prefix),
            prefix,
            scheme: "s3".to_string(),
        })
    }

    /// Parse a GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket_url(url, "gs")?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::storage(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            base: display_base("gs", bucket, &prefix),
            prefix,
            scheme: "gs".to_string(),
        })
    }

    /// Parse an Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let (container, prefix) = split_bucket_url(url, "az")?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::storage(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            base: display_base("az", container, &prefix),
            prefix,
            scheme: "az".to_string(),
        })
    }

    /// Parse a local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        // Create the directory if it doesn't exist
        std::fs::create_dir_all(path)
            .map_err(|e| Error::storage(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::storage(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            base: path.trim_end_matches('/').to_string(),
        })
    }

    /// Check if this is a cloud location (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Full URL for a path relative to this location
    pub fn url_for(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() {
            self.base.clone()
        } else {
            format!("{}/{relative}", self.base)
        }
    }

    /// List directory names one level below `subpath` (hive partition dirs)
    pub async fn list_dirs(&self, subpath: &str) -> Result<Vec<String>> {
        let prefix = self.object_prefix(subpath);
        let listing = self.store.list_with_delimiter(prefix.as_ref()).await?;

        let mut dirs: Vec<String> = listing
            .common_prefixes
            .iter()
            .filter_map(|p| p.parts().last().map(|part| part.as_ref().to_string()))
            .collect();
        dirs.sort();
        Ok(dirs)
    }

    /// List all object paths below `subpath`, relative to this location
    pub async fn list_files(&self, subpath: &str) -> Result<Vec<String>> {
        let prefix = self.object_prefix(subpath);
        let mut stream = self.store.list(prefix.as_ref());

        let mut files = Vec::new();
        while let Some(meta) = stream.try_next().await? {
            files.push(self.relative(&meta.location));
        }
        files.sort();
        Ok(files)
    }

    /// Fetch an object's contents
    pub async fn get(&self, relative: &str) -> Result<Bytes> {
        let path = self.object_path(relative);
        let result = self.store.get(&path).await?;
        Ok(result.bytes().await?)
    }

    /// Write bytes to a path in this location, returning the full URL
    pub async fn put(&self, relative: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(relative);
        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {path}: {e}")))?;

        Ok(self.url_for(relative))
    }

    /// Compose an object path under the location prefix
    fn object_path(&self, relative: &str) -> ObjectPath {
        let relative = relative.trim_matches('/');
        if self.prefix.is_empty() {
            ObjectPath::from(relative)
        } else {
            ObjectPath::from(format!("{}/{relative}", self.prefix))
        }
    }

    /// Prefix for list calls, `None` when listing the location root of the store
    fn object_prefix(&self, subpath: &str) -> Option<ObjectPath> {
        let subpath = subpath.trim_matches('/');
        let joined = match (self.prefix.is_empty(), subpath.is_empty()) {
            (true, true) => String::new(),
            (true, false) => subpath.to_string(),
            (false, true) => self.prefix.clone(),
            (false, false) => format!("{}/{subpath}", self.prefix),
        };
        if joined.is_empty() {
            None
        } else {
            Some(ObjectPath::from(joined))
        }
    }

    /// Strip the location prefix from a full object path
    fn relative(&self, full: &ObjectPath) -> String {
        let full = full.to_string();
        if self.prefix.is_empty() {
            full
        } else {
            full.strip_prefix(&format!("{}/", self.prefix))
                .map_or(full.clone(), ToString::to_string)
        }
    }
}

/// Split `scheme://bucket/prefix` into bucket and normalized prefix
fn split_bucket_url<'a>(url: &'a str, scheme: &str) -> Result<(&'a str, String)> {
    let without_scheme = url
        .strip_prefix(&format!("{scheme}://"))
        .ok_or_else(|| Error::storage(format!("Invalid {scheme} URL: {url}")))?;

    let (bucket, prefix) = match without_scheme.find('/') {
        Some(idx) => (&without_scheme[..idx], &without_scheme[idx + 1..]),
        None => (without_scheme, ""),
    };

    if bucket.is_empty() {
        return Err(Error::storage(format!("Missing bucket in {scheme} URL: {url}")));
    }

    Ok((bucket, prefix.trim_matches('/').to_string()))
}

/// Display base for cloud URLs
fn display_base(scheme: &str, bucket: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        format!("{scheme}://{bucket}")
    } else {
        format!("{scheme}://{bucket}/{prefix}")
    }
}
