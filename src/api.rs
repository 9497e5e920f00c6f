use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A top-level spreadsheet summary from the listing endpoint.
///
/// `preview` is a bounded grid snapshot bundled with the listing response;
/// an empty grid means "no preview available", which is distinct from
/// not-yet-loaded (the listing never returns a sheet without attempting to
/// populate it).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub preview: Vec<Vec<Value>>,
}

/// An inner worksheet belonging to exactly one [`Sheet`].
#[derive(Debug, Clone, Deserialize)]
pub struct Tab {
    #[serde(deserialize_with = "deserialize_gid")]
    pub gid: String,
    pub title: String,
    #[serde(default)]
    pub preview: Vec<Vec<Value>>,
}

/// One page of the sheet listing. `total` is the server-reported count of
/// all items matching the query, not the size of `items`.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetPage {
    #[serde(default)]
    pub items: Vec<Sheet>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
struct TabsResponse {
    #[serde(default)]
    items: Vec<Tab>,
}

/// The signed-in account, from /api/me.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientConfigResponse {
    #[serde(default)]
    configured: bool,
}

/// Grid ids arrive as a JSON number or a string depending on the upstream
/// API version; normalize to a string key.
fn deserialize_gid<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for gid, got {}",
            other
        ))),
    }
}

#[derive(Clone)]
pub struct SheetsClient {
    base_url: String,
    session_cookie: Option<String>,
    client: Client,
}

impl SheetsClient {
    pub fn new(base_url: String, session_cookie: Option<String>) -> Self {
        Self {
            base_url,
            session_cookie,
            client: Client::new(),
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.with_session(self.client.get(url))
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.with_session(self.client.post(url))
    }

    fn with_session(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => builder.header(reqwest::header::COOKIE, cookie.as_str()),
            None => builder,
        }
    }

    /// Fetch one page of the sheet listing.
    ///
    /// `query` is applied server-side; an empty string means "no filter".
    pub async fn list_sheets(&self, page: u32, page_size: u32, query: &str) -> Result<SheetPage> {
        let url = format!(
            "{}/api/sheets?page={}&pageSize={}&query={}",
            self.base_url,
            page,
            page_size,
            urlencoding::encode(query)
        );
        let response = self
            .get(&url)
            .send()
            .await
            .context("Failed to fetch sheet listing")?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("API error listing sheets: {} - {}", status, text);
        }

        let listing: SheetPage = response
            .json()
            .await
            .context("Failed to parse sheet listing")?;

        Ok(listing)
    }

    /// Fetch the inner tabs of one spreadsheet.
    pub async fn list_tabs(&self, sheet_id: &str) -> Result<Vec<Tab>> {
        let url = format!(
            "{}/api/sheets/{}/tabs",
            self.base_url,
            urlencoding::encode(sheet_id)
        );
        let response = self
            .get(&url)
            .send()
            .await
            .context("Failed to fetch inner tabs")?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("API error listing tabs: {} - {}", status, text);
        }

        let tabs: TabsResponse = response
            .json()
            .await
            .context("Failed to parse tabs response")?;

        Ok(tabs.items)
    }

    /// Invalidate the server-cached preview for one sheet. Best-effort; the
    /// response body carries nothing of interest.
    pub async fn refresh_preview(&self, sheet_id: &str) -> Result<()> {
        let url = format!(
            "{}/api/sheets/{}/refresh",
            self.base_url,
            urlencoding::encode(sheet_id)
        );
        let response = self
            .post(&url)
            .send()
            .await
            .context("Failed to trigger preview refresh")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to refresh preview: {} - {}", status, text);
        }

        Ok(())
    }

    /// Fetch the signed-in user. An unauthenticated session is `None`, not
    /// an error.
    pub async fn current_user(&self) -> Result<Option<User>> {
        let url = format!("{}/api/me", self.base_url);
        let response = self
            .get(&url)
            .send()
            .await
            .context("Failed to fetch current user")?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user: User = response
                    .json()
                    .await
                    .context("Failed to parse user record")?;
                Ok(Some(user))
            }
            status => {
                let text = response.text().await.unwrap_or_default();
                anyhow::bail!("API error fetching current user: {} - {}", status, text)
            }
        }
    }

    /// Whether an OAuth client is configured on the backend.
    pub async fn client_config(&self) -> Result<bool> {
        let url = format!("{}/auth/client-config", self.base_url);
        let response = self
            .get(&url)
            .send()
            .await
            .context("Failed to fetch client config")?;

        let config: ClientConfigResponse = response
            .json()
            .await
            .context("Failed to parse client config")?;

        Ok(config.configured)
    }
}
