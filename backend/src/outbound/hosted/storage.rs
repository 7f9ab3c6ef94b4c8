//! Blob store adapter for the hosted object storage API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Url};

use super::connection::{HostedConnection, HttpFailure};
use crate::domain::PhotoUpload;
use crate::domain::ports::{BlobPath, BlobStore, BlobStoreError, WriteMode};

const OBJECT_PATH: &str = "storage/v1/object";
const PUBLIC_OBJECT_PATH: &str = "storage/v1/object/public";

/// Photo storage in one bucket of the hosted object store.
#[derive(Debug, Clone)]
pub struct HostedBlobStore {
    connection: Arc<HostedConnection>,
    bucket: String,
}

impl HostedBlobStore {
    /// Adapter writing into `bucket`.
    pub fn new(connection: Arc<HostedConnection>, bucket: impl Into<String>) -> Self {
        Self {
            connection,
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, prefix: &str, path: &BlobPath) -> Result<Url, HttpFailure> {
        let segments = std::iter::once(self.bucket.as_str()).chain(path.as_str().split('/'));
        self.connection.endpoint(prefix, segments)
    }
}

#[async_trait]
impl BlobStore for HostedBlobStore {
    async fn upload(
        &self,
        path: &BlobPath,
        photo: &PhotoUpload,
        mode: WriteMode,
    ) -> Result<(), BlobStoreError> {
        let url = self.object_url(OBJECT_PATH, path).map_err(map_failure)?;
        let request = self
            .connection
            .request(Method::POST, url)
            .header(reqwest::header::CONTENT_TYPE, photo.content_type())
            .header("x-upsert", upsert_header(mode))
            .body(photo.bytes().to_vec());
        self.connection
            .send(request)
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    fn public_url(&self, path: &BlobPath) -> String {
        match self.object_url(PUBLIC_OBJECT_PATH, path) {
            Ok(url) => url.to_string(),
            Err(_) => format!(
                "{}{PUBLIC_OBJECT_PATH}/{}/{path}",
                self.connection.base(),
                self.bucket
            ),
        }
    }
}

fn upsert_header(mode: WriteMode) -> &'static str {
    match mode {
        WriteMode::CreateOnly => "false",
        WriteMode::Overwrite => "true",
    }
}

fn map_failure(failure: HttpFailure) -> BlobStoreError {
    if failure.is_transient() {
        BlobStoreError::transport(failure.into_message())
    } else {
        BlobStoreError::rejected(failure.into_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::PrincipalId;
    use rstest::{fixture, rstest};
    use zeroize::Zeroizing;

    #[fixture]
    fn store() -> HostedBlobStore {
        let connection = HostedConnection::new(
            Url::parse("https://abc.example.co").expect("valid url"),
            Zeroizing::new("service-key".to_owned()),
            Duration::from_secs(5),
        )
        .expect("client builds");
        HostedBlobStore::new(Arc::new(connection), "Photos")
    }

    fn path() -> BlobPath {
        let owner = PrincipalId::new("u-1").expect("valid id");
        BlobPath::photo_of(&owner, &PhotoUpload::new("me.webp", None, Vec::new()))
    }

    #[rstest]
    fn public_url_points_at_public_bucket(store: HostedBlobStore) {
        assert_eq!(
            store.public_url(&path()),
            "https://abc.example.co/storage/v1/object/public/Photos/u-1/profile.webp"
        );
    }

    #[rstest]
    fn upload_url_keeps_owner_folder(store: HostedBlobStore) {
        let url = store.object_url(OBJECT_PATH, &path()).expect("url builds");
        assert_eq!(
            url.as_str(),
            "https://abc.example.co/storage/v1/object/Photos/u-1/profile.webp"
        );
    }

    #[rstest]
    #[case(WriteMode::CreateOnly, "false")]
    #[case(WriteMode::Overwrite, "true")]
    fn write_mode_controls_upsert(#[case] mode: WriteMode, #[case] expected: &str) {
        assert_eq!(upsert_header(mode), expected);
    }
}
