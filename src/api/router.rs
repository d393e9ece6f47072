use axum::{
    body::Body,
    extract::Request,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, client, connection, health, org, rating, user};
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))

        // Orgs
        .route("/orgs", get(org::list_orgs).post(org::create_org))
        .route("/orgs/{org_id}", get(org::get_org).patch(org::update_org))

        // Clients
        .route("/orgs/{org_id}/clients", get(client::list_clients).post(client::create_client))
        .route(
            "/orgs/{org_id}/clients/{client_id}",
            get(client::get_client).patch(client::update_client).delete(client::delete_client),
        )
        .route("/orgs/{org_id}/clients/{client_id}/suggestions", get(client::client_suggestions))

        // Users & helpers
        .route("/orgs/{org_id}/users", get(user::list_org_users).post(user::create_org_user))
        .route("/orgs/{org_id}/helpers/{helper_id}", patch(user::set_helper_active))
        .route("/orgs/{org_id}/helpers/{helper_id}/membership", put(user::add_helper_membership))
        .route("/orgs/{org_id}/helpers/{helper_id}/rating", get(rating::get_rating).put(rating::set_rating))
        .route("/users/me", get(user::get_me).patch(user::update_me))

        // Connections
        .route(
            "/orgs/{org_id}/connections",
            get(connection::list_org_connections).post(connection::create_connection),
        )
        .route("/connections/me", get(connection::my_connections))
        .route("/connections/{connection_id}", get(connection::get_connection))
        .route("/connections/{connection_id}/accept", patch(connection::accept_connection))
        .route("/connections/{connection_id}/decline", patch(connection::decline_connection))
        .route("/connections/{connection_id}/status", patch(connection::update_connection_status))
        .route("/connections/{connection_id}/updates", post(connection::add_connection_update))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let prefix = state.config.api_prefix.trim_matches('/');

    let router = Router::new().route("/health", get(health::health_check));
    let router = if prefix.is_empty() {
        router.merge(api_routes())
    } else {
        router.nest(&format!("/{}", prefix), api_routes())
    };

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        org_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
