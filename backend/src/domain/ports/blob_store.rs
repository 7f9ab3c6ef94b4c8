//! Port for the blob (object) store holding profile photos.
//!
//! Objects are namespaced by principal id: a principal's photo lives at
//! `{id}/profile.{ext}`, so re-uploading replaces it in place.

use std::fmt;

use async_trait::async_trait;

use crate::domain::schema::PHOTO_OBJECT_STEM;
use crate::domain::{PhotoUpload, PrincipalId};

use super::define_store_error;

define_store_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// The store could not be reached or timed out.
        Transport => "transport",
        /// The store refused the object (exists, too large, permission).
        Rejected => "rejected",
    }
}

/// Object path inside the photo bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobPath(String);

impl BlobPath {
    /// Path of `owner`'s photo, keeping the uploaded file's extension.
    ///
    /// # Examples
    /// ```
    /// use vakaalat_console::domain::ports::BlobPath;
    /// use vakaalat_console::domain::{PhotoUpload, PrincipalId};
    ///
    /// let owner = PrincipalId::new("abc").unwrap();
    /// let photo = PhotoUpload::new("me.jpeg", None, Vec::new());
    /// assert_eq!(BlobPath::photo_of(&owner, &photo).as_str(), "abc/profile.jpeg");
    /// ```
    pub fn photo_of(owner: &PrincipalId, photo: &PhotoUpload) -> Self {
        Self(format!("{owner}/{PHOTO_OBJECT_STEM}.{}", photo.extension()))
    }

    /// Borrow the path.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when an object already exists at the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail if the object exists.
    CreateOnly,
    /// Replace the existing object.
    Overwrite,
}

/// Photo object storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `photo` at `path`.
    async fn upload(
        &self,
        path: &BlobPath,
        photo: &PhotoUpload,
        mode: WriteMode,
    ) -> Result<(), BlobStoreError>;

    /// Publicly retrievable URL of the object at `path`.
    ///
    /// Computed locally; no remote call is made.
    fn public_url(&self, path: &BlobPath) -> String;
}
