use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use vetnear_core::{Category, SearchRequest, ValidationError};
use vetnear_proximity::{NormalizedPlace, SearchResultBundle, UserLocationContext};

use crate::middleware::RequestId;

use super::{map_validation_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Raw query-string coordinates. Kept as strings so that a non-numeric value
/// surfaces as a validation error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct CoordinateParams {
    #[serde(alias = "lat")]
    pub latitude: Option<String>,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<String>,
    pub radius: Option<String>,
}

impl CoordinateParams {
    fn to_request(&self, default_radius_km: f64) -> Result<SearchRequest, ValidationError> {
        SearchRequest::from_params(
            self.latitude.as_deref(),
            self.longitude.as_deref(),
            self.radius.as_deref(),
            default_radius_km,
        )
    }
}

fn parse_request(
    state: &AppState,
    params: &CoordinateParams,
    req_id: &RequestId,
) -> Result<SearchRequest, ApiError> {
    params
        .to_request(state.service.default_radius_km())
        .map_err(|e| map_validation_error(req_id.0.clone(), &e))
}

pub(super) async fn search_nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<ApiResponse<SearchResultBundle>>, ApiError> {
    let request = parse_request(&state, &params, &req_id)?;
    let data = state.service.search(&request).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(category): Path<String>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<ApiResponse<Vec<NormalizedPlace>>>, ApiError> {
    let request = parse_request(&state, &params, &req_id)?;

    let data = match Category::from_slug(&category) {
        Some(category) => state
            .service
            .search_category(request.center(), request.radius_km(), category)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    category = category.slug(),
                    error = %e,
                    "category search failed; returning empty list"
                );
                Vec::new()
            }),
        None => {
            tracing::debug!(category = %category, "unknown category requested");
            Vec::new()
        }
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn reverse_geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<ApiResponse<Option<UserLocationContext>>>, ApiError> {
    let request = parse_request(&state, &params, &req_id)?;
    let data = state
        .service
        .reverse_geocode(request.center())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "reverse geocode failed"))
        .ok();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> CoordinateParams {
        let uri: axum::http::Uri = format!("/x?{query}").parse().expect("uri");
        Query::<CoordinateParams>::try_from_uri(&uri)
            .expect("query should deserialize")
            .0
    }

    #[test]
    fn accepts_short_aliases() {
        let p = params("lat=28.6&lng=77.2");
        assert_eq!(p.latitude.as_deref(), Some("28.6"));
        assert_eq!(p.longitude.as_deref(), Some("77.2"));

        let p = params("lat=28.6&lon=77.2&radius=5");
        assert_eq!(p.longitude.as_deref(), Some("77.2"));
        assert_eq!(p.radius.as_deref(), Some("5"));
    }

    #[test]
    fn invalid_radius_falls_back_to_default() {
        let request = params("latitude=28.6&longitude=77.2&radius=-3")
            .to_request(10.0)
            .expect("valid request");
        assert!((request.radius_km() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_coordinates_is_validation_error() {
        let err = CoordinateParams::default()
            .to_request(10.0)
            .expect_err("should fail");
        assert_eq!(err, ValidationError::MissingCoordinates);
    }
}
