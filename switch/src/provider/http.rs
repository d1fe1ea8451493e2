//! SIM registry backed by the provider's paged REST API

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::config::ProviderSettings;
use crate::errors::SwitchError;
use crate::models::sim::{SimRecord, SimStatus};
use crate::provider::SimRegistry;

/// Hard cap on pages followed during a full listing
const MAX_PAGES: u32 = 50;

/// One page of the provider's SIM listing
#[derive(Debug, Deserialize)]
struct SimListPage {
    sims: Vec<SimRecord>,

    /// Absolute URL of the next page, absent on the last one
    #[serde(default)]
    next_page_url: Option<String>,
}

/// HTTP client for the provider's SIM inventory
pub struct HttpRegistry {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: SecretString,
    page_size: u32,
}

impl HttpRegistry {
    /// Create a new registry client
    pub fn new(settings: ProviderSettings) -> Result<Self, SwitchError> {
        if settings.base_url.is_empty() {
            return Err(SwitchError::ValidationError(
                "provider base_url is not configured".to_string(),
            ));
        }
        if settings.account_sid.is_empty() {
            return Err(SwitchError::ValidationError(
                "provider account_sid is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            account_sid: settings.account_sid,
            auth_token: settings.auth_token,
            page_size: settings.page_size,
        })
    }

    async fn get_page(&self, url: &str) -> Result<SimListPage, SwitchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("SIM listing failed: {} - {}", status, body);
            return Err(SwitchError::ProviderError(format!("{}: {}", status, body)));
        }

        let page = response.json().await?;
        Ok(page)
    }

    async fn post_sim(
        &self,
        sid: &str,
        body: &serde_json::Value,
    ) -> Result<SimRecord, SwitchError> {
        let url = format!("{}/sims/{}", self.base_url, sid);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("SIM update failed: {} - {}", status, body);
            return Err(SwitchError::ProviderError(format!("{}: {}", status, body)));
        }

        let record = response.json().await?;
        Ok(record)
    }
}

#[async_trait]
impl SimRegistry for HttpRegistry {
    async fn fetch_all(&self) -> Result<Vec<SimRecord>, SwitchError> {
        let mut sims = Vec::new();
        let mut url = format!("{}/sims?page_size={}", self.base_url, self.page_size);

        for _ in 0..MAX_PAGES {
            let page = self.get_page(&url).await?;
            sims.extend(page.sims);

            match page.next_page_url {
                Some(next) => url = next,
                None => {
                    debug!("Fetched {} SIMs", sims.len());
                    return Ok(sims);
                }
            }
        }

        error!("SIM listing exceeded {} pages, aborting", MAX_PAGES);
        Err(SwitchError::ProviderError(format!(
            "SIM listing exceeded {} pages",
            MAX_PAGES
        )))
    }

    async fn update_status(&self, sid: &str, status: SimStatus) -> Result<SimRecord, SwitchError> {
        self.post_sim(sid, &json!({ "status": status })).await
    }

    async fn update_label(&self, sid: &str, unique_name: &str) -> Result<SimRecord, SwitchError> {
        self.post_sim(sid, &json!({ "unique_name": unique_name }))
            .await
    }
}
