use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use aidagent_types::{AidOffer, AlertFieldUpdate, AlertRecord};

use crate::{
    error::{ApiError, ApiResult},
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListAlertsQuery {
    pub location: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    pub alert_id: Option<String>,
    pub message: String,
    pub location: Option<String>,
    pub related_request_id: Option<String>,
    #[serde(default)]
    pub aid_available: Vec<AidOffer>,
    pub missing_persons_reported: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Retrieve the alert set, reconciling freshness first. `location` scopes
/// the refresh; `refresh=true` forces one.
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAlertsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<AlertRecord>>>> {
    let alerts = state
        .orchestrator
        .get_alerts(query.location.as_deref(), query.refresh)
        .await?;

    Ok(Json(ApiResponse::success(
        200,
        "Alerts retrieved successfully",
        alerts,
    )))
}

pub async fn get_alert(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
) -> ApiResult<Json<ApiResponse<AlertRecord>>> {
    let alert = state
        .alerts
        .find_alert(&alert_id)
        .await?
        .ok_or(ApiError::AlertNotFound(alert_id))?;

    Ok(Json(ApiResponse::success(
        200,
        "Alert retrieved successfully",
        alert,
    )))
}

pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAlertRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AlertRecord>>)> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let mut alert = AlertRecord::new(
        req.alert_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        req.message,
    );
    alert.location = req.location;
    alert.related_request_id = req.related_request_id;
    alert.aid_available = req.aid_available;
    alert.missing_persons_reported = req.missing_persons_reported;
    if let Some(source) = req.source {
        alert.source = source;
    }
    alert.details = req.details;

    let created = state.alerts.insert_alert(alert).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            201,
            "Alert created successfully",
            created,
        )),
    ))
}

/// Partial update; only the provided fields change and the freshness stamp
/// is left alone.
pub async fn update_alert(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Json(update): Json<AlertFieldUpdate>,
) -> ApiResult<Json<ApiResponse<AlertRecord>>> {
    let updated = state
        .alerts
        .update_alert(&alert_id, update)
        .await?
        .ok_or(ApiError::AlertNotFound(alert_id))?;

    Ok(Json(ApiResponse::success(
        200,
        "Alert updated successfully",
        updated,
    )))
}

pub async fn delete_alert(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
) -> ApiResult<Json<ApiResponse<bool>>> {
    if !state.alerts.delete_alert(&alert_id).await? {
        return Err(ApiError::AlertNotFound(alert_id));
    }

    Ok(Json(ApiResponse::success(
        200,
        format!("Alert with ID {alert_id} deleted successfully"),
        true,
    )))
}

/// Check one alert against the TTL and re-query it when stale.
pub async fn refresh_alert(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
) -> ApiResult<Json<ApiResponse<AlertRecord>>> {
    let alert = state.orchestrator.refresh_one(&alert_id).await?;

    Ok(Json(ApiResponse::success(
        200,
        "Alert checked and updated if stale",
        alert,
    )))
}
