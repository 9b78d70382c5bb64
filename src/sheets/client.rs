//! Google Sheets v4 REST client bound to one worksheet.

use crate::config::Config;
use crate::sheets::auth::TokenSource;
use crate::sheets::range::CellRange;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use wreq::{Client, RequestBuilder};

/// How the Sheets API interprets written values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInput {
    /// Stored as-is.
    Raw,
    /// Parsed as if typed into the UI (numbers, formulas).
    UserEntered,
}

impl ValueInput {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInput::Raw => "RAW",
            ValueInput::UserEntered => "USER_ENTERED",
        }
    }
}

/// Trait for worksheet access - enables mocking for tests.
#[async_trait]
pub trait ShoppingSheet: Send + Sync {
    /// Reads a block as rows of display strings. Trailing empty cells and
    /// rows may be absent.
    async fn read(&self, range: CellRange) -> Result<Vec<Vec<String>>>;

    /// Writes one row of values starting at `range`.
    async fn write_row(&self, range: CellRange, values: Vec<Value>, input: ValueInput)
        -> Result<()>;

    /// Sets or clears strikethrough on every cell of `range`.
    async fn set_strikethrough(&self, range: CellRange, strikethrough: bool) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// A worksheet inside a spreadsheet, addressed through the Sheets API.
pub struct SheetsClient {
    client: Client,
    tokens: Box<dyn TokenSource>,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
    sheet_id: i64,
}

impl SheetsClient {
    /// Opens `worksheet` in `spreadsheet_id`, resolving its numeric sheet id.
    pub async fn open(
        config: &Config,
        tokens: Box<dyn TokenSource>,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        let mut sheets = Self {
            client,
            tokens,
            base_url: config.sheets_api_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            worksheet: worksheet.to_string(),
            sheet_id: 0,
        };

        sheets.sheet_id = sheets.lookup_sheet_id().await?;
        debug!("Worksheet '{}' has sheet id {}", worksheet, sheets.sheet_id);

        Ok(sheets)
    }

    /// Numeric id of the bound worksheet.
    pub fn sheet_id(&self) -> i64 {
        self.sheet_id
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}", self.base_url, urlencoding::encode(&self.spreadsheet_id))
    }

    fn values_url(&self, range: CellRange) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            urlencoding::encode(&range.qualified(&self.worksheet))
        )
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<String> {
        let token = self.tokens.access_token().await.context("Failed to obtain access token")?;

        let response = request
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", what))?;

        let status = response.status();
        let text = response.text().await.context("Failed to read response body")?;

        if !status.is_success() {
            anyhow::bail!("Sheets {} failed with status {}: {}", what, status, text);
        }

        Ok(text)
    }

    fn with_json(request: RequestBuilder, body: &Value) -> RequestBuilder {
        request.header("Content-Type", "application/json").body(body.to_string())
    }

    async fn lookup_sheet_id(&self) -> Result<i64> {
        let url = format!("{}?fields=sheets.properties", self.spreadsheet_url());
        debug!("GET {}", url);

        let text = self.send(self.client.get(&url), "metadata").await?;
        let meta: SpreadsheetMeta =
            serde_json::from_str(&text).context("Failed to parse spreadsheet metadata")?;

        meta.sheets
            .into_iter()
            .find(|s| s.properties.title == self.worksheet)
            .map(|s| s.properties.sheet_id)
            .with_context(|| format!("Worksheet not found: {}", self.worksheet))
    }
}

#[async_trait]
impl ShoppingSheet for SheetsClient {
    async fn read(&self, range: CellRange) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(range);
        debug!("GET {}", url);

        let text = self.send(self.client.get(&url), "read").await?;
        let values: ValueRange =
            serde_json::from_str(&text).context("Failed to parse value range")?;

        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn write_row(
        &self,
        range: CellRange,
        values: Vec<Value>,
        input: ValueInput,
    ) -> Result<()> {
        let url = format!("{}?valueInputOption={}", self.values_url(range), input.as_str());
        let body = json!({
            "range": range.qualified(&self.worksheet),
            "majorDimension": "ROWS",
            "values": [values],
        });

        debug!("PUT {} {}", url, body);
        self.send(Self::with_json(self.client.put(&url), &body), "update").await?;
        Ok(())
    }

    async fn set_strikethrough(&self, range: CellRange, strikethrough: bool) -> Result<()> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        let body = json!({
            "requests": [{
                "repeatCell": {
                    "range": range.grid(self.sheet_id),
                    "cell": {
                        "userEnteredFormat": { "textFormat": { "strikethrough": strikethrough } }
                    },
                    "fields": "userEnteredFormat.textFormat.strikethrough",
                }
            }]
        });

        debug!("POST {} strikethrough={} on {}", url, strikethrough, range);
        self.send(Self::with_json(self.client.post(&url), &body), "format").await?;
        Ok(())
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::auth::StaticToken;
    use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const META: &str = r#"{"sheets": [
        {"properties": {"sheetId": 0, "title": "Archiv"}},
        {"properties": {"sheetId": 917, "title": "Nákup"}}
    ]}"#;

    async fn mount_meta(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-1"))
            .and(query_param("fields", "sheets.properties"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(META))
            .mount(server)
            .await;
    }

    async fn open(server: &MockServer, worksheet: &str) -> Result<SheetsClient> {
        let config = Config { sheets_api_url: server.uri(), timeout_secs: 5, ..Config::default() };
        SheetsClient::open(&config, Box::new(StaticToken::new("test-token")), "sheet-1", worksheet)
            .await
    }

    #[tokio::test]
    async fn test_open_resolves_sheet_id() {
        let server = MockServer::start().await;
        mount_meta(&server).await;

        let sheets = open(&server, "Nákup").await.unwrap();
        assert_eq!(sheets.sheet_id(), 917);
    }

    #[tokio::test]
    async fn test_open_unknown_worksheet() {
        let server = MockServer::start().await;
        mount_meta(&server).await;

        let err = open(&server, "Chybí").await.err().unwrap();
        assert!(err.to_string().contains("Worksheet not found: Chybí"));
    }

    #[tokio::test]
    async fn test_read_ragged_rows() {
        let server = MockServer::start().await;
        mount_meta(&server).await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/v4/spreadsheets/sheet-1/values/.+F4.+G200$"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"range": "'Nákup'!F4:G200", "majorDimension": "ROWS",
                    "values": [["https://www.grizly.cz/a", "2"], [], ["https://www.grizly.cz/b"], ["", 3]]}"#,
            ))
            .mount(&server)
            .await;

        let sheets = open(&server, "Nákup").await.unwrap();
        let rows = sheets.read(CellRange::new('F', 4, 'G', 200)).await.unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["https://www.grizly.cz/a", "2"]);
        assert!(rows[1].is_empty());
        assert_eq!(rows[2], vec!["https://www.grizly.cz/b"]);
        assert_eq!(rows[3], vec!["", "3"]);
    }

    #[tokio::test]
    async fn test_read_empty_range() {
        let server = MockServer::start().await;
        mount_meta(&server).await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/v4/spreadsheets/sheet-1/values/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"range": "'Nákup'!F4:G200", "majorDimension": "ROWS"}"#),
            )
            .mount(&server)
            .await;

        let sheets = open(&server, "Nákup").await.unwrap();
        let rows = sheets.read(CellRange::new('F', 4, 'G', 200)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_write_row() {
        let server = MockServer::start().await;
        mount_meta(&server).await;

        Mock::given(method("PUT"))
            .and(path_regex(r"^/v4/spreadsheets/sheet-1/values/.+B4.+E4$"))
            .and(query_param("valueInputOption", "USER_ENTERED"))
            .and(body_partial_json(json!({
                "majorDimension": "ROWS",
                "values": [["Kešu", "ok", "150.00", 500]],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let sheets = open(&server, "Nákup").await.unwrap();
        sheets
            .write_row(
                CellRange::row('B', 'E', 4),
                vec![json!("Kešu"), json!("ok"), json!("150.00"), json!(500)],
                ValueInput::UserEntered,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_strikethrough() {
        let server = MockServer::start().await;
        mount_meta(&server).await;

        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-1:batchUpdate"))
            .and(body_partial_json(json!({
                "requests": [{
                    "repeatCell": {
                        "range": {
                            "sheetId": 917,
                            "startRowIndex": 3,
                            "endRowIndex": 200,
                            "startColumnIndex": 3,
                            "endColumnIndex": 4
                        },
                        "cell": {"userEnteredFormat": {"textFormat": {"strikethrough": true}}},
                        "fields": "userEnteredFormat.textFormat.strikethrough"
                    }
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let sheets = open(&server, "Nákup").await.unwrap();
        sheets.set_strikethrough(CellRange::column('D', 4, 200), true).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_surfaces_status() {
        let server = MockServer::start().await;
        mount_meta(&server).await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/v4/spreadsheets/sheet-1/values/"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;

        let sheets = open(&server, "Nákup").await.unwrap();
        let err = sheets.read(CellRange::new('F', 4, 'G', 200)).await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
