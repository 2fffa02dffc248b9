//! HTTP implementation of [`ContentApi`].
//!
//! Authenticates once with the OAuth client-credentials grant and sends
//! the bearer token on every request. Listing responses are HAL documents:
//!
//! ```json
//! {"_embedded": {"content-items": [...]}, "page": {"size": 100, "totalElements": 3, "totalPages": 1, "number": 0}}
//! ```

use std::collections::HashMap;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::{ContentApi, PAGE_SIZE, Page};
use crate::config::{Credentials, Endpoints};
use crate::error::{Error, Result};
use crate::model::{ContentItem, Edition, Event, Slot};

/// Hub metadata, fetched once to validate credentials and hub ID.
#[derive(Debug, Clone, Deserialize)]
pub struct Hub {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Authenticated client bound to one hub.
pub struct HubClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
    hub: Hub,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct HalPage {
    #[serde(rename = "_embedded", default)]
    embedded: HashMap<String, Vec<Value>>,
    #[serde(default)]
    page: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    number: u32,
    #[serde(default)]
    total_pages: u32,
}

#[derive(Debug, Serialize)]
struct VersionBody {
    version: Option<u64>,
}

impl HubClient {
    /// Authenticate and fetch the hub.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the token request is rejected and
    /// [`Error::NotFound`] if the hub does not exist. Either is fatal to
    /// the command: nothing has been touched yet.
    pub async fn connect(credentials: &Credentials, endpoints: &Endpoints) -> Result<Self> {
        let client = reqwest::Client::new();

        debug!(auth_url = %endpoints.auth_url, client_id = %credentials.client_id, "Requesting access token");
        let response = client
            .post(&endpoints.auth_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("{status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("Failed to parse token response: {e}")))?;

        let api_url = endpoints.api_url.trim_end_matches('/').to_string();
        let hub_url = format!("{api_url}/hubs/{}", credentials.hub_id);
        let hub: Hub = read_json(
            client.get(&hub_url).bearer_auth(&token.access_token),
            "Hub",
            &credentials.hub_id,
        )
        .await?;
        debug!(hub = %hub.id, name = %hub.name, "Connected to hub");

        Ok(Self {
            client,
            api_url,
            token: token.access_token,
            hub,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", self.api_url))
            .bearer_auth(&self.token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{path}", self.api_url))
            .bearer_auth(&self.token)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        rel: &str,
        resource: &'static str,
        owner: &str,
        page: u32,
    ) -> Result<Page<T>> {
        let request = self
            .get(path)
            .query(&[("page", page), ("size", PAGE_SIZE)]);
        let hal: HalPage = read_json(request, resource, owner).await?;
        into_page(hal, rel)
    }
}

/// Send a request and decode a JSON body, mapping HTTP failures to errors.
async fn read_json<T: DeserializeOwned>(
    request: RequestBuilder,
    resource: &'static str,
    id: &str,
) -> Result<T> {
    let response = check(request.send().await?, resource, id).await?;
    Ok(response.json().await?)
}

async fn check(response: Response, resource: &'static str, id: &str) -> Result<Response> {
    let status = response.status();
    trace!(%status, url = %response.url(), "Response");

    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(Error::NotFound {
            resource,
            id: id.to_string(),
        }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth(message)),
        _ => Err(Error::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

fn into_page<T: DeserializeOwned>(mut hal: HalPage, rel: &str) -> Result<Page<T>> {
    let items = hal
        .embedded
        .remove(rel)
        .unwrap_or_default()
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<T>, _>>()?;

    let (number, total_pages) = hal
        .page
        .map_or((0, 1), |p| (p.number, p.total_pages));

    Ok(Page {
        items,
        number,
        total_pages,
    })
}

impl ContentApi for HubClient {
    async fn get_content_item(&self, id: &str) -> Result<ContentItem> {
        read_json(self.get(&format!("/content-items/{id}")), "Content item", id).await
    }

    async fn archive_content_item(&self, item: &ContentItem) -> Result<ContentItem> {
        let id = item.id.as_deref().unwrap_or_default();
        let request = self
            .post(&format!("/content-items/{id}/archive"))
            .json(&VersionBody {
                version: item.version,
            });
        read_json(request, "Content item", id).await
    }

    async fn unarchive_content_item(&self, item: &ContentItem) -> Result<ContentItem> {
        let id = item.id.as_deref().unwrap_or_default();
        let request = self
            .post(&format!("/content-items/{id}/unarchive"))
            .json(&VersionBody {
                version: item.version,
            });
        read_json(request, "Content item", id).await
    }

    async fn list_content_items(&self, repository_id: &str, page: u32) -> Result<Page<ContentItem>> {
        self.list(
            &format!("/content-repositories/{repository_id}/content-items"),
            "content-items",
            "Content repository",
            repository_id,
            page,
        )
        .await
    }

    async fn create_content_item(
        &self,
        repository_id: &str,
        item: &ContentItem,
    ) -> Result<ContentItem> {
        let request = self
            .post(&format!("/content-repositories/{repository_id}/content-items"))
            .json(item);
        read_json(request, "Content repository", repository_id).await
    }

    async fn list_events(&self, page: u32) -> Result<Page<Event>> {
        let hub_id = self.hub.id.clone();
        self.list(&format!("/hubs/{hub_id}/events"), "events", "Hub", &hub_id, page)
            .await
    }

    async fn list_editions(&self, event_id: &str, page: u32) -> Result<Page<Edition>> {
        self.list(
            &format!("/events/{event_id}/editions"),
            "editions",
            "Event",
            event_id,
            page,
        )
        .await
    }

    async fn list_slots(&self, edition_id: &str, page: u32) -> Result<Page<Slot>> {
        self.list(
            &format!("/editions/{edition_id}/slots"),
            "slots",
            "Edition",
            edition_id,
            page,
        )
        .await
    }
}
