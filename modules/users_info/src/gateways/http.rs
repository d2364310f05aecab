//! Remote implementation of `UsersInfoApi` over the REST surface.

use std::time::Duration;

use async_trait::async_trait;
use modkit::{Problem, TracedClient};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::api::rest::dto::{CreateUserReq, UpdateUserReq, UserDto};
use crate::config::UsersInfoConfig;
use crate::contract::{
    client::UsersInfoApi,
    error::UsersInfoError,
    model::{NewUser, User, UserPatch},
};

pub struct UsersInfoHttpClient {
    client: TracedClient,
    base: Url,
}

impl UsersInfoHttpClient {
    pub fn new(client: TracedClient, base: Url) -> Self {
        Self { client, base }
    }

    pub fn from_config(cfg: &UsersInfoConfig) -> Result<Self, UsersInfoError> {
        let base = Url::parse(&cfg.api_base_url).map_err(|e| {
            UsersInfoError::validation(format!("invalid api_base_url '{}': {e}", cfg.api_base_url))
        })?;
        let client = TracedClient::with_timeout(Duration::from_millis(cfg.request_timeout_ms))
            .map_err(|e| UsersInfoError::transport(e.to_string()))?;
        Ok(Self::new(client, base))
    }

    /// `<base>/users[/<id>]`, keeping any path prefix the base URL carries.
    fn users_url(&self, id: Option<&str>) -> Result<Url, UsersInfoError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                UsersInfoError::validation(format!("base url '{}' cannot carry a path", self.base))
            })?;
            segments.pop_if_empty().push("users");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        id: &str,
        email: Option<&str>,
    ) -> Result<T, UsersInfoError> {
        let resp = self
            .client
            .send(builder)
            .await
            .map_err(|e| UsersInfoError::transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| UsersInfoError::transport(format!("invalid response body: {e}")));
        }

        let problem = resp.json::<Problem>().await.ok();
        debug!(status = status.as_u16(), code = ?problem.as_ref().map(|p| &p.code), "users api returned an error");
        Err(error_from_status(status, problem, id, email))
    }
}

fn error_from_status(
    status: StatusCode,
    problem: Option<Problem>,
    id: &str,
    email: Option<&str>,
) -> UsersInfoError {
    match status {
        StatusCode::NOT_FOUND => UsersInfoError::not_found(id),
        StatusCode::CONFLICT => UsersInfoError::conflict(email.unwrap_or_default()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let message = match problem {
                Some(p) => match p.errors {
                    Some(errors) if !errors.is_empty() => errors
                        .into_iter()
                        .map(|v| v.detail)
                        .collect::<Vec<_>>()
                        .join("; "),
                    _ => p.detail,
                },
                None => status.to_string(),
            };
            UsersInfoError::validation(message)
        }
        _ => UsersInfoError::internal(),
    }
}

#[async_trait]
impl UsersInfoApi for UsersInfoHttpClient {
    #[instrument(name = "users_info.http.list_users", skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, UsersInfoError> {
        let url = self.users_url(None)?;
        let users: Vec<UserDto> = self
            .call(self.client.request(Method::GET, url.as_str()), "", None)
            .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    #[instrument(name = "users_info.http.get_user", skip(self))]
    async fn get_user(&self, id: &str) -> Result<User, UsersInfoError> {
        let url = self.users_url(Some(id))?;
        let user: UserDto = self
            .call(self.client.request(Method::GET, url.as_str()), id, None)
            .await?;
        Ok(user.into())
    }

    #[instrument(name = "users_info.http.create_user", skip_all)]
    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersInfoError> {
        let url = self.users_url(None)?;
        let email = new_user.email.clone();
        let body = CreateUserReq::from(new_user);
        let user: UserDto = self
            .call(
                self.client.request(Method::POST, url.as_str()).json(&body),
                "",
                Some(&email),
            )
            .await?;
        Ok(user.into())
    }

    #[instrument(name = "users_info.http.update_user", skip(self, patch))]
    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, UsersInfoError> {
        let url = self.users_url(Some(id))?;
        let email = patch.email.clone();
        let body = UpdateUserReq::from(patch);
        let user: UserDto = self
            .call(
                self.client.request(Method::PATCH, url.as_str()).json(&body),
                id,
                email.as_deref(),
            )
            .await?;
        Ok(user.into())
    }

    #[instrument(name = "users_info.http.delete_user", skip(self))]
    async fn delete_user(&self, id: &str) -> Result<User, UsersInfoError> {
        let url = self.users_url(Some(id))?;
        let user: UserDto = self
            .call(self.client.request(Method::DELETE, url.as_str()), id, None)
            .await?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> UsersInfoHttpClient {
        UsersInfoHttpClient::new(TracedClient::default(), Url::parse(base).unwrap())
    }

    #[test]
    fn users_url_keeps_base_path_and_escapes_ids() {
        let c = client("http://localhost:8087/api/");
        assert_eq!(
            c.users_url(None).unwrap().as_str(),
            "http://localhost:8087/api/users"
        );
        assert_eq!(
            c.users_url(Some("a b")).unwrap().as_str(),
            "http://localhost:8087/api/users/a%20b"
        );
    }

    #[test]
    fn validation_message_prefers_field_details() {
        let problem = Problem::new(StatusCode::BAD_REQUEST, "Validation error", "bad")
            .with_errors(vec![modkit::FieldViolation {
                detail: "name must be at least 2 characters long".into(),
                pointer: "/name".into(),
            }]);
        let err = error_from_status(StatusCode::BAD_REQUEST, Some(problem), "", None);
        assert_eq!(
            err,
            UsersInfoError::validation("name must be at least 2 characters long")
        );
    }

    #[test]
    fn server_errors_become_internal() {
        let err = error_from_status(StatusCode::INTERNAL_SERVER_ERROR, None, "x", None);
        assert_eq!(err, UsersInfoError::Internal);
    }

    #[test]
    fn from_config_rejects_bad_base_url() {
        let cfg = UsersInfoConfig {
            api_base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            UsersInfoHttpClient::from_config(&cfg),
            Err(UsersInfoError::Validation { .. })
        ));
    }
}
