//! Google Sheets v4 via REST API (no SDK dependency)
//!
//! Auth is the service-account flow: sign an RS256 assertion with the
//! account's private key, exchange it for a bearer token, use the token for
//! the rest of the delivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Column, RegionLayout, SheetStore};
use crate::error::StoreError;

const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Spreadsheet location and service-account credentials
#[derive(Debug, Clone)]
pub struct GoogleSheetsConfig {
    /// Spreadsheet id; checked per delivery, not at startup
    pub spreadsheet_id: Option<String>,
    pub service_account_email: Option<String>,
    /// PEM private key of the service account
    pub private_key: Option<String>,
    pub api_base: String,
    pub token_uri: String,
    /// Per-request timeout for token and values calls
    pub request_timeout: Duration,
}

impl Default for GoogleSheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            service_account_email: None,
            private_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Service-account assertion claims
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// `ValueRange` body; `values` is omitted by the API when the range is empty
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Unopened client, shared across deliveries
#[derive(Clone)]
pub struct GoogleSheets {
    http: reqwest::Client,
    config: Arc<GoogleSheetsConfig>,
}

impl GoogleSheets {
    pub fn new(config: GoogleSheetsConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Validate configuration and obtain an access token for one delivery
    pub async fn connect(&self) -> Result<GoogleSheetsSession, StoreError> {
        let spreadsheet_id = self
            .config
            .spreadsheet_id
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StoreError::NotConfigured("GOOGLE_SHEET_ID is not set".into()))?;
        let email = self
            .config
            .service_account_email
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                StoreError::NotConfigured("GOOGLE_SERVICE_ACCOUNT_EMAIL is not set".into())
            })?;
        let private_key = self
            .config
            .private_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StoreError::NotConfigured("GOOGLE_PRIVATE_KEY is not set".into()))?;

        let assertion = sign_assertion(
            email,
            private_key,
            &self.config.token_uri,
            chrono::Utc::now().timestamp(),
        )?;

        let resp = self
            .http
            .post(&self.config.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!(
                "token endpoint returned HTTP {status}: {body}"
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Auth(format!("token response unreadable: {e}")))?;

        tracing::debug!(service_account = email, "Obtained Sheets access token");

        Ok(GoogleSheetsSession {
            http: self.http.clone(),
            api_base: self.config.api_base.clone(),
            spreadsheet_id,
            access_token: token.access_token,
        })
    }
}

/// Build the signed service-account assertion
fn sign_assertion(
    email: &str,
    private_key_pem: &str,
    token_uri: &str,
    issued_at: i64,
) -> Result<String, StoreError> {
    let claims = AssertionClaims {
        iss: email,
        scope: SPREADSHEETS_SCOPE,
        aud: token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| StoreError::Auth(format!("invalid service account key: {e}")))?;
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| StoreError::Auth(format!("failed to sign assertion: {e}")))
}

/// Authenticated session, lives for one delivery
pub struct GoogleSheetsSession {
    http: reqwest::Client,
    api_base: String,
    spreadsheet_id: String,
    access_token: String,
}

impl GoogleSheetsSession {
    /// `{base}/spreadsheets/{id}/values/{range}{suffix}`, every segment escaped
    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, StoreError> {
        values_url(&self.api_base, &self.spreadsheet_id, range, suffix)
    }
}

fn values_url(
    api_base: &str,
    spreadsheet_id: &str,
    range: &str,
    suffix: &str,
) -> Result<Url, StoreError> {
    let mut url = Url::parse(api_base)
        .map_err(|e| StoreError::NotConfigured(format!("invalid Sheets API base URL: {e}")))?;
    let target = format!("{range}{suffix}");
    url.path_segments_mut()
        .map_err(|_| StoreError::NotConfigured("Sheets API base URL cannot be a base".into()))?
        .pop_if_empty()
        .extend(["spreadsheets", spreadsheet_id, "values", target.as_str()]);
    Ok(url)
}

/// Turn a non-2xx response into `StoreError::Api`
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        body,
    })
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsSession {
    async fn read_column(
        &self,
        region: &RegionLayout,
        column: Column,
    ) -> Result<Vec<String>, StoreError> {
        let url = self.values_url(&region.column_range(column), "")?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let range: ValueRange = ensure_success(resp).await?.json().await?;

        Ok(range
            .values
            .iter()
            .map(|row| row.first().map(cell_text).unwrap_or_default())
            .collect())
    }

    async fn append_row(&self, region: &RegionLayout, row: &[String]) -> Result<(), StoreError> {
        let mut url = self.values_url(&region.append_range(), ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn overwrite_row(
        &self,
        region: &RegionLayout,
        row_number: usize,
        row: &[String],
    ) -> Result<(), StoreError> {
        let range = region.row_range(row_number);
        let mut url = self.values_url(&range, "")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let resp = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "range": range, "values": [row] }))
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }
}
