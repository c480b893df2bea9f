//! Google Sheets adapter.
//!
//! This crate implements the `atb-core` SheetPort over the Sheets API v4
//! `values.append` endpoint, authenticated as a service account.

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use atb_core::{
    domain::{CellValue, SheetTarget},
    errors::Error,
    ports::SheetPort,
    Result,
};

pub mod auth;

use auth::{ServiceAccountKey, TokenSource};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// One tab of the spreadsheet, as reported by the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabInfo {
    pub title: String,
    pub sheet_id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpreadsheetInfo {
    pub title: String,
    pub tabs: Vec<TabInfo>,
}

impl SpreadsheetInfo {
    pub fn has_tab(&self, title: &str) -> bool {
        self.tabs.iter().any(|t| t.title == title)
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    properties: SpreadsheetProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    title: String,
    #[serde(default)]
    sheet_id: i64,
}

impl From<SpreadsheetResponse> for SpreadsheetInfo {
    fn from(r: SpreadsheetResponse) -> Self {
        Self {
            title: r.properties.title,
            tabs: r
                .sheets
                .into_iter()
                .map(|s| TabInfo {
                    title: s.properties.title,
                    sheet_id: s.properties.sheet_id,
                })
                .collect(),
        }
    }
}

pub struct SheetsClient {
    http: reqwest::Client,
    tokens: TokenSource,
    target: SheetTarget,
    base_url: Url,
}

impl SheetsClient {
    /// Read the credentials, obtain a first access token and bind the client
    /// to one spreadsheet tab.
    ///
    /// Bad credentials fail with `Error::Auth`, an unreachable token endpoint
    /// with `Error::Connection`.
    pub async fn connect(
        credentials_file: &Path,
        spreadsheet_id: impl Into<String>,
        tab_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Connection(format!("http client build error: {e}")))?;

        let key = ServiceAccountKey::load(credentials_file)?;
        let tokens = TokenSource::new(key, http.clone())?;
        tokens.token().await?;

        let base_url = Url::parse(SHEETS_API)
            .map_err(|e| Error::Config(format!("invalid sheets api url: {e}")))?;

        let client = Self::with_parts(
            http,
            tokens,
            SheetTarget::new(spreadsheet_id, tab_name),
            base_url,
        );

        tracing::info!(
            client_email = %client.tokens.client_email(),
            tab = %client.target.tab_name,
            "sheets client ready"
        );

        Ok(client)
    }

    fn with_parts(
        http: reqwest::Client,
        tokens: TokenSource,
        target: SheetTarget,
        base_url: Url,
    ) -> Self {
        Self {
            http,
            tokens,
            target,
            base_url,
        }
    }

    /// Fetch the spreadsheet title and its tabs.
    ///
    /// Startup diagnostic only; appends do not depend on it.
    pub async fn check_spreadsheet(&self) -> Result<SpreadsheetInfo> {
        let mut url = spreadsheet_url(&self.base_url, &self.target.spreadsheet_id)?;
        url.query_pairs_mut()
            .append_pair("fields", "properties.title,sheets.properties(title,sheetId)");

        let token = self.tokens.token().await?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::Connection(format!("error accessing spreadsheet: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error("error accessing spreadsheet", status, &body));
        }

        let parsed: SpreadsheetResponse = resp
            .json()
            .await
            .map_err(|e| Error::External(format!("sheets json error: {e}")))?;

        Ok(parsed.into())
    }
}

#[async_trait]
impl SheetPort for SheetsClient {
    fn tab_name(&self) -> &str {
        &self.target.tab_name
    }

    async fn append_row(&self, range: &str, values: &[CellValue]) -> Result<()> {
        let url = append_url(&self.base_url, &self.target.spreadsheet_id, range)?;
        let token = self.tokens.token().await?;

        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&append_body(values))
            .send()
            .await
            .map_err(|e| Error::External(format!("sheets append request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "sheets append failed: {status} {}",
                body.chars().take(500).collect::<String>()
            )));
        }

        Ok(())
    }
}

fn spreadsheet_url(base: &Url, spreadsheet_id: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("sheets api url cannot be a base: {base}")))?
        .push(spreadsheet_id);
    Ok(url)
}

/// `<base>/<id>/values/<range>:append?valueInputOption=USER_ENTERED`
fn append_url(base: &Url, spreadsheet_id: &str, range: &str) -> Result<Url> {
    let mut url = spreadsheet_url(base, spreadsheet_id)?;
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("sheets api url cannot be a base: {base}")))?
        .push("values")
        .push(&format!("{range}:append"));
    url.query_pairs_mut()
        .append_pair("valueInputOption", VALUE_INPUT_OPTION);
    Ok(url)
}

fn append_body(values: &[CellValue]) -> serde_json::Value {
    serde_json::json!({ "values": [values] })
}

fn status_error(context: &str, status: StatusCode, body: &str) -> Error {
    let detail = format!(
        "{context}: {status} {}",
        body.chars().take(500).collect::<String>()
    );
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(detail),
        _ => Error::External(detail),
    }
}
