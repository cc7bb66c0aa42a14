use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use market_data::{MarketOverview, MarketSnapshot};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

const MAX_SERIES_LEN: usize = 50;

fn default_top() -> usize {
    5
}

fn default_weekly() -> usize {
    8
}

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    /// Bars in the market-cap chart.
    #[serde(default = "default_top")]
    pub top: usize,
    /// Bars in the 7-day performance chart.
    #[serde(default = "default_weekly")]
    pub weekly: usize,
}

pub fn market_routes() -> Router<AppState> {
    Router::new()
        .route("/api/market/snapshot", get(get_snapshot))
        .route("/api/market/overview", get(get_overview))
}

async fn get_snapshot(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MarketSnapshot>>, AppError> {
    let snapshot = state.market.fetch().await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<ApiResponse<MarketOverview>>, AppError> {
    let snapshot = state.market.fetch().await?;
    let overview = snapshot.overview(
        query.top.min(MAX_SERIES_LEN),
        query.weekly.min(MAX_SERIES_LEN),
    );
    Ok(Json(ApiResponse::ok(overview)))
}
