use crate::dto::RouteDto;
use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use junction_dns_domain::{canonical_key, RoutePolicy};
use tracing::{info, warn};

pub async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<RouteDto>>, ApiError> {
    let policies = state.routes.list().await?;
    Ok(Json(policies.into_iter().map(RouteDto::from).collect()))
}

pub async fn create_route(
    State(state): State<AppState>,
    payload: Result<Json<RouteDto>, JsonRejection>,
) -> Result<Json<RouteDto>, ApiError> {
    let Json(dto) = payload.map_err(|e| {
        warn!(error = %e, "rejected route payload");
        ApiError::bad_payload()
    })?;

    let mut policy = RoutePolicy::from(dto);
    policy.domain = canonical_key(&policy.domain);

    state.routes.put(&policy).await?;
    info!(domain = %policy.domain, kind = ?policy.kind, active = policy.active, "route stored");

    Ok(Json(RouteDto::from(policy)))
}
