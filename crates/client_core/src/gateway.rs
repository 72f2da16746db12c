use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT},
    Client, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Repo, User},
    protocol::{ListReposQuery, SearchUsersQuery, SearchUsersResponse},
};
use tracing::{debug, warn};
use url::Url;

use crate::{config::GatewaySettings, error::GatewayError};

/// Route the view layer navigates to when a profile does not exist.
pub const NOT_FOUND_ROUTE: &str = "/notfound";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Debug, Clone, PartialEq)]
pub enum UserLookup {
    Found(User),
    NotFound,
}

impl UserLookup {
    pub fn redirect_route(&self) -> Option<&'static str> {
        match self {
            Self::Found(_) => None,
            Self::NotFound => Some(NOT_FOUND_ROUTE),
        }
    }
}

/// The remote API as seen by the orchestration layer.
#[async_trait]
pub trait GithubGateway: Send + Sync {
    async fn search_users(&self, query: &str) -> Result<Vec<User>, GatewayError>;
    async fn list_users(&self) -> Result<Vec<User>, GatewayError>;
    async fn get_user(&self, login: &str) -> Result<UserLookup, GatewayError>;
    async fn get_user_repos(&self, login: &str) -> Result<Vec<Repo>, GatewayError>;
}

pub struct HttpGateway {
    http: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&settings.api_url).map_err(|e| GatewayError::InvalidUrl {
            url: settings.api_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl {
                url: settings.api_url.clone(),
                reason: "not a base url".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            header_value(&settings.user_agent, &settings.api_url)?,
        );
        if let Some(token) = &settings.token {
            let mut value = header_value(&format!("token {token}"), &settings.api_url)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::Transport {
                endpoint: settings.api_url.clone(),
                source: e,
            })?;

        Ok(Self { http, base_url })
    }

    /// Appends path segments to the base url, escaping each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Endpoint under `users/{login}`. Empty and dot-segment logins would resolve
    /// to another route, so they are refused.
    pub(crate) fn user_endpoint(&self, login: &str, rest: &[&str]) -> Result<Url, GatewayError> {
        if matches!(login, "" | "." | "..") {
            return Err(GatewayError::InvalidLogin {
                login: login.to_string(),
            });
        }
        let mut segments = vec!["users", login];
        segments.extend_from_slice(rest);
        Ok(self.endpoint(&segments))
    }

    async fn send<Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: Option<&Q>,
    ) -> Result<Response, GatewayError> {
        let endpoint = url.path().to_string();
        let mut request = self.http.get(url);
        if let Some(query) = query {
            request = request.query(query);
        }
        debug!(%endpoint, "github request");
        request
            .send()
            .await
            .map_err(|e| GatewayError::Transport { endpoint, source: e })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let endpoint = response.url().path().to_string();
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !status.is_success() {
            let err = GatewayError::from_status(endpoint, status.as_u16(), &body);
            warn!(error = %err, "github request rejected");
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode {
            endpoint,
            source: e,
        })
    }
}

fn header_value(raw: &str, api_url: &str) -> Result<HeaderValue, GatewayError> {
    HeaderValue::from_str(raw).map_err(|e| GatewayError::InvalidUrl {
        url: api_url.to_string(),
        reason: format!("invalid header value: {e}"),
    })
}

#[async_trait]
impl GithubGateway for HttpGateway {
    async fn search_users(&self, query: &str) -> Result<Vec<User>, GatewayError> {
        let url = self.endpoint(&["search", "users"]);
        let response = self
            .send(
                url,
                Some(&SearchUsersQuery {
                    q: query.to_string(),
                }),
            )
            .await?;
        let envelope: SearchUsersResponse = Self::read_json(response).await?;
        Ok(envelope.items)
    }

    async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        let url = self.endpoint(&["users"]);
        let response = self.send::<()>(url, None).await?;
        Self::read_json(response).await
    }

    async fn get_user(&self, login: &str) -> Result<UserLookup, GatewayError> {
        let url = self.user_endpoint(login, &[])?;
        let response = self.send::<()>(url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(login, "github user not found");
            return Ok(UserLookup::NotFound);
        }
        Self::read_json(response).await.map(UserLookup::Found)
    }

    async fn get_user_repos(&self, login: &str) -> Result<Vec<Repo>, GatewayError> {
        let url = self.user_endpoint(login, &["repos"])?;
        let response = self.send(url, Some(&ListReposQuery::default())).await?;
        Self::read_json(response).await
    }
}
