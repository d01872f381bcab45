//! [`LinkService`] over the server's JSON HTTP API.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use linkshelf_shared::identity::Identity;
use linkshelf_shared::protocol::{AddLinkRequest, AssignRoleRequest, ErrorResponse};
use linkshelf_shared::{Link, LinkRecord, Principal, UserProfile, UserRole};

use crate::error::{ClientError, Result};
use crate::service::LinkService;

pub struct HttpService {
    base: Url,
    http: reqwest::Client,
    /// `None` calls the service anonymously.
    identity: Option<Identity>,
}

impl HttpService {
    pub fn new(server_url: &str, identity: Option<Identity>) -> Result<Self> {
        let base = Url::parse(server_url)
            .map_err(|e| ClientError::Remote(format!("Invalid server URL {server_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Remote(format!(
                "Invalid server URL {server_url}: not a base URL"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("linkshelf/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base,
            http,
            identity,
        })
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Server URL with `segments` appended, each percent-encoded, so link ids
    /// that are themselves URLs stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.http.request(method, self.endpoint(segments));
        match &self.identity {
            Some(identity) => {
                builder.header(AUTHORIZATION, identity.caller_token_now().to_header_value())
            }
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("Server responded {status}"),
        };
        tracing::debug!(%status, %message, "remote call failed");
        Err(ClientError::Remote(message))
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        Ok(Self::send(builder).await?.json::<T>().await?)
    }
}

#[async_trait]
impl LinkService for HttpService {
    async fn add_link(&self, id: &str, link: &Link) -> Result<()> {
        let body = AddLinkRequest {
            id: id.to_string(),
            link: link.clone(),
        };
        Self::send(self.request(Method::POST, &["links"]).json(&body)).await?;
        Ok(())
    }

    async fn update_link(&self, id: &str, link: &Link) -> Result<()> {
        Self::send(self.request(Method::PUT, &["links", id]).json(link)).await?;
        Ok(())
    }

    async fn delete_link(&self, id: &str) -> Result<()> {
        Self::send(self.request(Method::DELETE, &["links", id])).await?;
        Ok(())
    }

    async fn get_all_links(&self) -> Result<Vec<LinkRecord>> {
        Self::fetch(self.request(Method::GET, &["links"])).await
    }

    async fn get_link(&self, id: &str) -> Result<Link> {
        Self::fetch(self.request(Method::GET, &["links", id])).await
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>> {
        Self::fetch(self.request(Method::GET, &["profile"])).await
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()> {
        Self::send(self.request(Method::PUT, &["profile"]).json(profile)).await?;
        Ok(())
    }

    async fn get_user_profile(&self, user: &Principal) -> Result<Option<UserProfile>> {
        let user = user.to_hex();
        Self::fetch(self.request(Method::GET, &["users", &user, "profile"])).await
    }

    async fn get_caller_user_role(&self) -> Result<UserRole> {
        Self::fetch(self.request(Method::GET, &["role"])).await
    }

    async fn assign_caller_user_role(&self, user: &Principal, role: UserRole) -> Result<()> {
        let user = user.to_hex();
        Self::send(
            self.request(Method::PUT, &["users", &user, "role"])
                .json(&AssignRoleRequest { role }),
        )
        .await?;
        Ok(())
    }

    async fn is_caller_admin(&self) -> Result<bool> {
        Self::fetch(self.request(Method::GET, &["role", "admin"])).await
    }
}
