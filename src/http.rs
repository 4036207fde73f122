use axum::{
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::auth;
use crate::shared::{AppState, ErrorBody};
use crate::user;

/// Builds the full application: the protected `/users` routes wrapped in the
/// request pipeline (logging, then the panic boundary, then token validation)
pub fn build_router(state: AppState) -> Router {
    let users = Router::new()
        .route("/users", get(user::list_users).post(user::create_user))
        .route(
            "/users/:id",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::jwt_auth))
        .with_state(state);

    with_error_boundary(users)
}

/// Wraps a router so panics become the uniform 500 body and every exchange is logged
pub fn with_error_boundary(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
}

/// Logs the method and path of each request and the status it ended with
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    info!(%method, %path, "HTTP request");

    let response = next.run(req).await;

    info!(%method, %path, status = response.status().as_u16(), "HTTP response");
    response
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "An unhandled exception occurred");
    ErrorBody::internal().into_response()
}
