//! Job Search Invoker: one-page JSearch lookups for a fixed company catalogue.
//!
//! Any status other than 200 is treated as "no listings". Only transport and
//! body-decoding failures surface as errors.

pub mod handlers;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Companies offered in the job-search panel.
pub const COMPANIES: [&str; 5] = ["TCS", "Wipro", "Infosys", "Accenture", "Cognizant"];

/// Role appended to every company query.
pub const SEARCH_ROLE: &str = "Data Scientist";

const RAPIDAPI_HOST: &str = "jsearch.p.rapidapi.com";

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A listing with every field filled in; absent upstream values get display placeholders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobListing {
    pub title: String,
    pub employer: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub apply_link: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawListing {
    job_title: Option<String>,
    employer_name: Option<String>,
    job_city: Option<String>,
    job_country: Option<String>,
    job_description: Option<String>,
    job_apply_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<RawListing>,
}

impl From<RawListing> for JobListing {
    fn from(raw: RawListing) -> Self {
        Self {
            title: raw
                .job_title
                .unwrap_or_else(|| "Job Title Not Available".to_string()),
            employer: raw.employer_name.unwrap_or_else(|| "N/A".to_string()),
            city: raw.job_city.unwrap_or_else(|| "Unknown".to_string()),
            country: raw.job_country.unwrap_or_else(|| "Unknown".to_string()),
            description: raw
                .job_description
                .unwrap_or_else(|| "No description available.".to_string()),
            apply_link: raw.job_apply_link.unwrap_or_else(|| "#".to_string()),
        }
    }
}

#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl JobSearchClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, JobSearchError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the first results page for `"{company} Data Scientist"`.
    pub async fn search(&self, company: &str) -> Result<Vec<JobListing>, JobSearchError> {
        let query = format!("{company} {SEARCH_ROLE}");
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .query(&[("query", query.as_str()), ("num_pages", "1")])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("JSearch returned {} for {:?}; treating as no listings", status, query);
            return Ok(Vec::new());
        }

        let bytes = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&bytes)?;
        debug!("JSearch returned {} listings for {:?}", parsed.data.len(), query);
        Ok(parsed.data.into_iter().map(JobListing::from).collect())
    }
}
