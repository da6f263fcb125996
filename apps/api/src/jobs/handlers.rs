use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::{JobListing, COMPANIES};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CompanyQuery {
    pub company: Option<String>,
}

#[derive(Serialize)]
pub struct CompaniesResponse {
    pub companies: &'static [&'static str],
}

#[derive(Serialize)]
pub struct JobsResponse {
    pub company: String,
    pub listings: Vec<JobListing>,
}

/// GET /api/v1/jobs/companies
pub async fn handle_companies() -> Json<CompaniesResponse> {
    Json(CompaniesResponse {
        companies: &COMPANIES,
    })
}

/// GET /api/v1/jobs?company=
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<CompanyQuery>,
) -> Result<Json<JobsResponse>, AppError> {
    let requested = params
        .company
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::InputMissing("Please choose a company.".to_string()))?;

    let company = resolve_company(requested).ok_or_else(|| {
        AppError::Validation(format!(
            "Unknown company {requested:?}; expected one of {}",
            COMPANIES.join(", ")
        ))
    })?;

    let listings = state.jobs.search(company).await?;
    Ok(Json(JobsResponse {
        company: company.to_string(),
        listings,
    }))
}

/// Case-insensitive lookup returning the catalogue spelling.
fn resolve_company(requested: &str) -> Option<&'static str> {
    COMPANIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(requested))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_company_is_case_insensitive() {
        assert_eq!(resolve_company("infosys"), Some("Infosys"));
        assert_eq!(resolve_company("TCS"), Some("TCS"));
        assert_eq!(resolve_company("Google"), None);
    }
}
