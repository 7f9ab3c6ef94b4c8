//! Identity store adapter for the hosted admin users API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::connection::{HostedConnection, HttpFailure};
use crate::domain::ports::{IdentityStore, IdentityStoreError};
use crate::domain::{NewPrincipal, PrincipalId, PrincipalUpdate};

const USERS_PATH: &str = "auth/v1/admin/users";

#[derive(Debug, Serialize)]
struct CreateUserBody<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
struct UpdateUserBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ban_duration: Option<String>,
}

impl<'a> From<&'a PrincipalUpdate> for UpdateUserBody<'a> {
    fn from(update: &'a PrincipalUpdate) -> Self {
        Self {
            password: update.credential.as_ref().map(|credential| credential.expose()),
            email: update.email.as_deref(),
            phone: update.phone.as_deref(),
            ban_duration: update.ban_duration_hours.map(|hours| format!("{hours}h")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserListDto {
    #[serde(default)]
    users: Vec<UserDto>,
}

/// Identity store backed by the hosted admin users API.
#[derive(Debug, Clone)]
pub struct HostedIdentityStore {
    connection: Arc<HostedConnection>,
}

impl HostedIdentityStore {
    /// Adapter sharing `connection`.
    pub fn new(connection: Arc<HostedConnection>) -> Self {
        Self { connection }
    }

    fn users_url(&self, id: Option<&PrincipalId>) -> Result<reqwest::Url, IdentityStoreError> {
        self.connection
            .endpoint(USERS_PATH, id.map(PrincipalId::as_str))
            .map_err(map_failure)
    }
}

#[async_trait]
impl IdentityStore for HostedIdentityStore {
    async fn create_principal(
        &self,
        principal: &NewPrincipal,
    ) -> Result<PrincipalId, IdentityStoreError> {
        let url = self.users_url(None)?;
        let body = CreateUserBody {
            email: principal.email.as_str(),
            password: principal.credential.expose(),
            email_confirm: principal.email_confirmed,
        };
        let bytes = self
            .connection
            .send(self.connection.request(Method::POST, url).json(&body))
            .await
            .map_err(map_failure)?;
        let user: UserDto = decode(&bytes)?;
        PrincipalId::new(user.id).map_err(|err| IdentityStoreError::decode(err.to_string()))
    }

    async fn update_principal(
        &self,
        id: &PrincipalId,
        update: &PrincipalUpdate,
    ) -> Result<(), IdentityStoreError> {
        let url = self.users_url(Some(id))?;
        let body = UpdateUserBody::from(update);
        self.connection
            .send(self.connection.request(Method::PUT, url).json(&body))
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    async fn delete_principal(&self, id: &PrincipalId) -> Result<(), IdentityStoreError> {
        let url = self.users_url(Some(id))?;
        self.connection
            .send(self.connection.request(Method::DELETE, url))
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    async fn list_principals(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PrincipalId>, IdentityStoreError> {
        let mut url = self.users_url(None)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        let bytes = self
            .connection
            .send(self.connection.request(Method::GET, url))
            .await
            .map_err(map_failure)?;
        let list: UserListDto = decode(&bytes)?;
        list.users
            .into_iter()
            .map(|user| {
                PrincipalId::new(user.id).map_err(|err| IdentityStoreError::decode(err.to_string()))
            })
            .collect()
    }
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, IdentityStoreError> {
    serde_json::from_slice(bytes)
        .map_err(|err| IdentityStoreError::decode(format!("invalid identity payload: {err}")))
}

fn map_failure(failure: HttpFailure) -> IdentityStoreError {
    match failure {
        HttpFailure::Decode(message) => IdentityStoreError::decode(message),
        failure if failure.is_transient() => IdentityStoreError::transport(failure.into_message()),
        failure => IdentityStoreError::rejected(failure.into_message()),
    }
}
