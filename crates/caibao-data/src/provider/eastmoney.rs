//! Eastmoney data-center provider.
//!
//! Statement reports are served as paged JSON from the data-center endpoint.
//! Each record is a flat object keyed by provider field names, which are
//! mapped to table columns with [`StatementKind::field_map`].

use super::{RawTable, StatementProvider};
use crate::error::{DataError, Result};
use crate::kind::StatementKind;
use crate::report_date::provider_date;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Eastmoney data-center endpoint.
pub const DATACENTER_URL: &str = "https://datacenter-web.eastmoney.com/api/data/v1/get";

/// Default rows per page.
const DEFAULT_PAGE_SIZE: usize = 500;

/// Default pause between page requests.
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) caibao/0.1";

/// Connection settings for [`EastmoneyProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EastmoneySettings {
    /// Endpoint URL.
    pub base_url: String,
    /// Rows requested per page.
    pub page_size: usize,
    /// Pause between consecutive requests, in milliseconds.
    pub request_delay_ms: u64,
}

impl Default for EastmoneySettings {
    fn default() -> Self {
        Self {
            base_url: DATACENTER_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<ApiResult>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiResult {
    #[serde(default)]
    pages: u32,
    #[serde(default)]
    data: Vec<Map<String, Value>>,
}

/// HTTP provider backed by the Eastmoney data center.
#[derive(Debug)]
pub struct EastmoneyProvider {
    client: reqwest::Client,
    settings: EastmoneySettings,
}

impl EastmoneyProvider {
    /// Create a provider with default settings.
    pub fn new() -> Result<Self> {
        Self::with_settings(EastmoneySettings::default())
    }

    /// Create a provider with custom settings.
    pub fn with_settings(settings: EastmoneySettings) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, settings })
    }

    /// Settings in use.
    pub const fn settings(&self) -> &EastmoneySettings {
        &self.settings
    }

    async fn fetch_page(
        &self,
        kind: StatementKind,
        filter: &str,
        page: u32,
    ) -> Result<ApiResult> {
        let page_size = self.settings.page_size.to_string();
        let page_number = page.to_string();
        let sort_types = if kind.provider_sort_column().contains(',') {
            "-1,-1"
        } else {
            "-1"
        };

        let response: ApiResponse = self
            .client
            .get(&self.settings.base_url)
            .query(&[
                ("sortColumns", kind.provider_sort_column()),
                ("sortTypes", sort_types),
                ("pageSize", page_size.as_str()),
                ("pageNumber", page_number.as_str()),
                ("reportName", kind.provider_report()),
                ("columns", "ALL"),
                ("filter", filter),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // The data center answers "no data" with a null result.
        let Some(result) = response.result else {
            debug!(
                report = kind.provider_report(),
                success = response.success.unwrap_or(false),
                message = response.message.as_deref().unwrap_or(""),
                "empty result"
            );
            return Ok(ApiResult::default());
        };
        Ok(result)
    }
}

impl StatementProvider for EastmoneyProvider {
    async fn fetch(&self, kind: StatementKind, report_date: &str) -> Result<RawTable> {
        let filter = report_filter(kind, &provider_date(report_date)?);
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let result = self.fetch_page(kind, &filter, page).await?;
            records.extend(result.data);
            debug!(kind = %kind, report_date, page, pages = result.pages, "fetched page");

            if page >= result.pages {
                break;
            }
            page += 1;
            sleep(Duration::from_millis(self.settings.request_delay_ms)).await;
        }

        if records.is_empty() {
            return Err(DataError::Provider {
                report: kind.provider_report().to_string(),
                date: report_date.to_string(),
                reason: "no records".to_string(),
            });
        }

        Ok(records_to_table(kind, &records))
    }
}

/// Provider filter expression for one report date (`YYYY-MM-DD`).
fn report_filter(kind: StatementKind, date: &str) -> String {
    if kind.filters_security_type() {
        format!(
            "(SECURITY_TYPE_CODE in (\"058001001\",\"058001008\"))\
             (TRADE_MARKET_CODE!=\"069001017\")(REPORT_DATE='{date}')"
        )
    } else {
        format!("(REPORT_DATE='{date}')")
    }
}

/// Map provider records onto the kind's columns; unmapped fields are dropped.
fn records_to_table(kind: StatementKind, records: &[Map<String, Value>]) -> RawTable {
    let field_map = kind.field_map();
    let mut table = RawTable::new(field_map.iter().map(|(_, column)| *column));

    for record in records {
        let row = field_map
            .iter()
            .map(|(field, _)| record.get(*field).map(cell_text).unwrap_or_default())
            .collect();
        table.push_row(row);
    }

    table
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
