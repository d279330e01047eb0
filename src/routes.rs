// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{config::AppState, handlers, middleware::auth::auth_guard};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas de autenticação: só o login é público
    let auth_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/refresh", post(handlers::auth::refresh))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let student_routes = Router::new()
        .route(
            "/",
            get(handlers::students::list_students).post(handlers::students::create_student),
        )
        .route("/search", get(handlers::students::search_students))
        .route(
            "/by-instrument/{instrument}",
            get(handlers::students::students_by_instrument),
        )
        .route(
            "/by-payment-status/{status}",
            get(handlers::students::students_by_payment_status),
        )
        .route(
            "/{id}",
            get(handlers::students::get_student)
                .put(handlers::students::update_student)
                .delete(handlers::students::delete_student),
        );

    let payment_routes = Router::new()
        .route(
            "/",
            get(handlers::payments::list_payments).post(handlers::payments::create_payment),
        )
        .route("/student/{id}", get(handlers::payments::payments_by_student))
        .route("/record", post(handlers::payments::record_payment))
        .route("/summary", get(handlers::payments::payment_summary))
        .route("/overdue", get(handlers::payments::overdue_payments));

    let dashboard_routes = Router::new().route("/stats", get(handlers::dashboard::get_stats));

    // Demais rotas passam todas pelo auth_guard
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/students", student_routes)
        .nest("/payments", payment_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes)
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
