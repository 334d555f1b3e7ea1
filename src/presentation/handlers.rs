// HTTP request handlers
use crate::application::dashboard_service::DashboardQuery;
use crate::domain::filter::FilterSpec;
use crate::domain::series::LabelOrder;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

/// Raw selector values. Empty strings mean "no filter".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub year: Option<String>,
    pub category: Option<String>,
    pub risk_factor: Option<String>,
    pub risk_rating: Option<String>,
    pub q: Option<String>,
    pub selected: Option<String>,
    pub sorted: Option<bool>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_param<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, String> {
    present(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| format!("invalid {} parameter: {}", name, v))
        })
        .transpose()
}

impl FilterQuery {
    /// Coerce selector input into typed filters before it reaches the filter engine.
    pub fn into_query(self) -> Result<DashboardQuery, String> {
        let risk_rating: Option<f64> = parse_param("riskRating", self.risk_rating)?;
        if risk_rating.is_some_and(|rating| !rating.is_finite()) {
            return Err("invalid riskRating parameter".to_string());
        }

        let filter = FilterSpec {
            year: parse_param("year", self.year)?,
            business_category: present(self.category),
            risk_factor_key: present(self.risk_factor),
            risk_rating,
            name_substring: present(self.q),
        };

        Ok(DashboardQuery {
            filter,
            selected_id: parse_param("selected", self.selected)?,
            category_order: if self.sorted.unwrap_or(false) {
                LabelOrder::Sorted
            } else {
                LabelOrder::FirstSeen
            },
        })
    }
}

async fn respond<T: serde::Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

fn bad_request(message: String) -> Response {
    tracing::debug!("Rejected query: {}", message);
    (StatusCode::BAD_REQUEST, message).into_response()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Filtered table rows
pub async fn list_assets(
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match query.into_query() {
        Ok(query) => respond(&state.dashboard_service.list_assets(&query.filter), &headers).await,
        Err(message) => bad_request(message),
    }
}

/// Snapshot of one asset for tooltip/detail display
pub async fn get_asset(
    Path(id): Path<usize>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.dashboard_service.get_asset(id) {
        Some(asset) => respond(&asset, &headers).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Map markers for the filtered, geo-valid assets
pub async fn list_markers(
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match query.into_query() {
        Ok(query) => respond(&state.dashboard_service.list_markers(&query.filter), &headers).await,
        Err(message) => bad_request(message),
    }
}

/// Options for the filter selectors
pub async fn filter_options(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(&state.dashboard_service.filter_options(), &headers).await
}

/// Every chart series, the table and the map for one set of filters
pub async fn get_dashboard(
    Query(query): Query<FilterQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match query.into_query() {
        Ok(query) => respond(&state.dashboard_service.get_dashboard(&query), &headers).await,
        Err(message) => bad_request(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::dataset_service::Dataset;
    use crate::domain::asset::fixtures::{asset, with_factors};
    use serde_json::Value;

    fn state() -> Arc<AppState> {
        let records = vec![
            with_factors(asset(0, "Energy", 2030, 0.4), &[("Flooding", 0.123)]),
            asset(1, "Energy", 2030, 0.6),
            asset(2, "Retail", 2030, 0.2),
        ];
        let dataset = Arc::new(Dataset::new(records, vec![]));
        Arc::new(AppState {
            dashboard_service: DashboardService::new(dataset),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_filter_query_coercion() {
        let query = FilterQuery {
            year: Some("2030".to_string()),
            category: Some(String::new()),
            risk_factor: Some("Flooding".to_string()),
            risk_rating: Some(" ".to_string()),
            q: Some("plant".to_string()),
            selected: None,
            sorted: Some(true),
        }
        .into_query()
        .unwrap();

        assert_eq!(query.filter.year, Some(2030));
        assert_eq!(query.filter.business_category, None);
        assert_eq!(query.filter.risk_factor_key.as_deref(), Some("Flooding"));
        assert_eq!(query.filter.risk_rating, None);
        assert_eq!(query.filter.name_substring.as_deref(), Some("plant"));
        assert_eq!(query.category_order, LabelOrder::Sorted);
    }

    #[test]
    fn test_filter_query_rejects_malformed_numbers() {
        let query = FilterQuery {
            year: Some("twenty-thirty".to_string()),
            ..Default::default()
        };
        assert!(query.into_query().is_err());

        let query = FilterQuery {
            risk_rating: Some("NaN".to_string()),
            ..Default::default()
        };
        assert!(query.into_query().is_err());
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "ok");
    }

    #[tokio::test]
    async fn test_list_assets_by_category() {
        let query = FilterQuery {
            category: Some("Energy".to_string()),
            ..Default::default()
        };
        let response = list_assets(Query(query), HeaderMap::new(), State(state())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let rows = body_json(response).await;
        let ids: Vec<u64> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(rows[0]["riskFactors"]["Flooding"], 0.12);
        assert_eq!(rows[0]["geoValid"], true);
    }

    #[tokio::test]
    async fn test_list_assets_bad_request() {
        let query = FilterQuery {
            selected: Some("first".to_string()),
            ..Default::default()
        };
        let response = list_assets(Query(query), HeaderMap::new(), State(state())).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_asset() {
        let found = get_asset(Path(2), HeaderMap::new(), State(state())).await;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(body_json(found).await["businessCategory"], "Retail");

        let missing = get_asset(Path(42), HeaderMap::new(), State(state())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_dashboard() {
        let response = get_dashboard(
            Query(FilterQuery::default()),
            HeaderMap::new(),
            State(state()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let dashboard = body_json(response).await;
        assert_eq!(
            dashboard["assetCountByCategory"]["labels"],
            serde_json::json!(["Energy", "Retail"])
        );
        assert_eq!(
            dashboard["assetCountByCategory"]["values"],
            serde_json::json!([2.0, 1.0])
        );
        assert_eq!(dashboard["riskFactorsByYear"]["labels"], serde_json::json!([2030]));
        assert_eq!(dashboard["markers"].as_array().unwrap().len(), 3);
        assert!(dashboard["selected"].is_null());
    }

    #[tokio::test]
    async fn test_filter_options_and_markers() {
        let options = body_json(filter_options(HeaderMap::new(), State(state())).await).await;
        assert_eq!(options["businessCategories"], serde_json::json!(["Energy", "Retail"]));
        assert_eq!(options["riskFactors"], serde_json::json!(["Flooding"]));

        let query = FilterQuery {
            risk_factor: Some("Flooding".to_string()),
            ..Default::default()
        };
        let markers = body_json(list_markers(Query(query), HeaderMap::new(), State(state())).await).await;
        assert_eq!(markers.as_array().unwrap().len(), 1);
        assert_eq!(markers[0]["band"], "moderate");
    }
}
