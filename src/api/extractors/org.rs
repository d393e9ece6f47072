use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use std::collections::HashMap;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

/// The `{org_id}` path segment. Existence is checked by the handler after
/// authorization so that non-members cannot probe for org ids.
pub struct OrgId(pub String);

impl FromRequestParts<Arc<AppState>> for OrgId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Invalid path parameters".into()))?;

        let org_id = params
            .get("org_id")
            .ok_or_else(|| AppError::Validation("Missing org id".into()))?;

        Span::current().record("org_id", org_id.as_str());

        Ok(OrgId(org_id.clone()))
    }
}
