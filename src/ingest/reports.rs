/// Weekly provincial report client
///
/// Reads the generated weekly reports the backend keeps per province:
/// the latest batch, one week's batch, or every week for one province.
/// List fields arrive JSON-encoded; `analysis::reports` decodes them.

use crate::analysis::reports::{StoredWeeklyReport, WeeklyReport};
use crate::logging::{self, DataSource};
use crate::model::FloodRiskError;
use reqwest::Url;

/// Which reports to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportQuery {
    Latest,
    /// Week starting on this `YYYY-MM-DD` date.
    Week(String),
    Province(String),
}

pub struct WeeklyReportsClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WeeklyReportsClient {
    pub fn new(client: reqwest::blocking::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn fetch(&self, query: &ReportQuery) -> Result<Vec<WeeklyReport>, FloodRiskError> {
        let url = build_reports_url(&self.base_url, query)?;

        logging::info(DataSource::Backend, None, &format!("Fetching weekly reports ({})", url.path()));
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FloodRiskError::HttpError {
                service: "Weekly reports",
                status: status.as_u16(),
                body,
            });
        }

        let reports = parse_reports_body(&response.text()?)?;
        logging::debug(DataSource::Backend, None, &format!("Received {} weekly reports", reports.len()));
        Ok(reports.into_iter().map(StoredWeeklyReport::decode).collect())
    }
}

/// `<base>/latest`, `<base>/week/<date>` or `<base>/province/<name>`, with
/// the last segment percent-encoded.
pub fn build_reports_url(base_url: &str, query: &ReportQuery) -> Result<Url, FloodRiskError> {
    let mut url = Url::parse(base_url.trim_end_matches('/'))
        .map_err(|e| FloodRiskError::Config(format!("invalid reports URL {}: {}", base_url, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| FloodRiskError::Config(format!("reports URL cannot have a path: {}", base_url)))?;
        segments.pop_if_empty();
        match query {
            ReportQuery::Latest => {
                segments.push("latest");
            }
            ReportQuery::Week(start) => {
                segments.push("week").push(start);
            }
            ReportQuery::Province(province) => {
                segments.push("province").push(province);
            }
        }
    }
    Ok(url)
}

pub fn parse_reports_body(body: &str) -> Result<Vec<StoredWeeklyReport>, FloodRiskError> {
    serde_json::from_str(body).map_err(|e| FloodRiskError::ParseError(format!("weekly reports: {}", e)))
}
