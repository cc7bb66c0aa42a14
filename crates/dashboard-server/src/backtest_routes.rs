use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use portfolio_backtest::{
    Allocation, BacktestRequest, BacktestResult, ContributionFrequency, ContributionSchedule,
    RiskParameters, RiskProfile, RiskProfileTable,
};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

fn default_profile() -> String {
    RiskProfile::Conservative.to_string()
}

fn default_reinvest() -> bool {
    true
}

/// Form-shaped backtest body: profile and frequency arrive as free text
/// and are parsed case-insensitively.
#[derive(Debug, Deserialize)]
pub struct RunBacktestRequest {
    #[serde(default = "default_profile")]
    pub profile: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_investment: f64,
    pub contribution_frequency: Option<String>,
    #[serde(default)]
    pub contribution_amount: f64,
    #[serde(default = "default_reinvest")]
    pub reinvest: bool,
}

impl RunBacktestRequest {
    pub fn into_request(self) -> Result<BacktestRequest, AppError> {
        let profile: RiskProfile = self.profile.parse()?;
        let frequency = match self.contribution_frequency.as_deref() {
            Some(raw) => raw
                .parse::<ContributionFrequency>()
                .map_err(AppError::BadRequest)?,
            None => ContributionFrequency::None,
        };

        Ok(BacktestRequest {
            profile,
            start_date: self.start_date,
            end_date: self.end_date,
            initial_investment: self.initial_investment,
            contribution_schedule: ContributionSchedule::new(frequency, self.contribution_amount),
            reinvest: self.reinvest,
        })
    }
}

/// One slider move: set `asset` to `weight` (0.0 - 1.0).
#[derive(Debug, Deserialize)]
pub struct AllocationChange {
    pub asset: String,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct AllocationPreview {
    pub profile: RiskProfile,
    pub allocation: Allocation,
    pub total_weight: f64,
}

pub fn backtest_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profiles", get(list_profiles))
        .route("/api/profiles/:name", get(get_profile))
        .route("/api/profiles/:name/allocation", post(preview_allocation))
        .route("/api/backtest/run", post(run_backtest))
        .route("/api/backtest/compare", post(compare_profiles))
}

async fn list_profiles() -> Json<ApiResponse<Vec<RiskParameters>>> {
    Json(ApiResponse::ok(RiskProfileTable::all()))
}

async fn get_profile(
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<RiskParameters>>, AppError> {
    let params = RiskProfileTable::lookup_by_name(&name)
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    Ok(Json(ApiResponse::ok(params)))
}

/// Apply one weight change to a profile's default mix and return the
/// updated copy. Nothing is stored; the catalogue stays as it is.
async fn preview_allocation(
    Path(name): Path<String>,
    payload: Result<Json<AllocationChange>, JsonRejection>,
) -> Result<Json<ApiResponse<AllocationPreview>>, AppError> {
    let params = RiskProfileTable::lookup_by_name(&name)
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    let Json(change) = payload?;

    let allocation = params.allocation.with_weight(&change.asset, change.weight)?;
    Ok(Json(ApiResponse::ok(AllocationPreview {
        profile: params.profile,
        total_weight: allocation.total_weight(),
        allocation,
    })))
}

/// Run a single backtest. The simulation is CPU-bound, so it runs on the
/// blocking pool.
async fn run_backtest(
    State(state): State<AppState>,
    payload: Result<Json<RunBacktestRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BacktestResult>>, AppError> {
    let Json(req) = payload?;
    let request = req.into_request()?;
    let engine = state.engine.clone();

    let result = tokio::task::spawn_blocking(move || engine.run(request))
        .await
        .map_err(|e| anyhow::anyhow!("backtest task failed: {}", e))??;

    Ok(Json(ApiResponse::ok(result)))
}

/// Run the same window under every risk profile.
async fn compare_profiles(
    State(state): State<AppState>,
    payload: Result<Json<RunBacktestRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<BacktestResult>>>, AppError> {
    let Json(req) = payload?;
    let request = req.into_request()?;
    let engine = state.engine.clone();

    tracing::info!(
        "Comparing profiles over {}..{}",
        request.start_date,
        request.end_date
    );

    let results = tokio::task::spawn_blocking(move || engine.compare_profiles(&request))
        .await
        .map_err(|e| anyhow::anyhow!("comparison task failed: {}", e))??;

    Ok(Json(ApiResponse::ok(results)))
}
