use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::config::{EventConfig, Tier};
use crate::credentials::ApiToken;
use crate::error::Result;
use crate::names::AttendeeName;

pub const DISCOUNT_CODE_TYPE: &str = "PercentOffDiscountCode";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscountCodeRequest {
    pub code: String,
    #[serde(rename = "type")]
    pub code_type: &'static str,
    pub value: String,
    pub quantity: String,
    pub release_ids: Vec<String>,
}

#[derive(Serialize)]
struct DiscountCodeBody<'a> {
    discount_code: &'a DiscountCodeRequest,
}

impl DiscountCodeRequest {
    pub fn new(config: &EventConfig, name: &AttendeeName, tier: Tier<'_>) -> Self {
        Self {
            code: format!("{}_{}_{}", config.prefix, name, tier.code),
            code_type: DISCOUNT_CODE_TYPE,
            value: tier.value.to_string(),
            quantity: tier.quantity.to_string(),
            release_ids: vec![config.release_id.clone()],
        }
    }

    /// JSON body as sent to Tito, wrapped in `discount_code`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&DiscountCodeBody {
            discount_code: self,
        })?)
    }
}

pub trait DiscountCodeApi {
    /// Create one discount code, returning the HTTP status Tito answered with.
    async fn create_discount_code(&self, request: &DiscountCodeRequest) -> Result<StatusCode>;
}

pub struct TitoClient {
    http: Client,
    endpoint: String,
    token: ApiToken,
}

impl TitoClient {
    pub fn new(base_url: &str, config: &EventConfig, token: ApiToken) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint(base_url),
            token,
        })
    }

    fn build_request(&self, request: &DiscountCodeRequest) -> Result<reqwest::Request> {
        let request = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Token token={}", self.token.expose()))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&DiscountCodeBody {
                discount_code: request,
            })
            .build()?;
        Ok(request)
    }
}

impl DiscountCodeApi for TitoClient {
    async fn create_discount_code(&self, request: &DiscountCodeRequest) -> Result<StatusCode> {
        let http_request = self.build_request(request)?;
        debug!("POST {} for {}", self.endpoint, request.code);

        let response = self.http.execute(http_request).await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            debug!("Tito answered {} for {}: {}", status, request.code, body);
        }
        Ok(status)
    }
}
