// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, books, interaction, lending, pickup, profile},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Largest accepted request body; covers arrive as multipart uploads.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Public routes: register/login, search, book detail, review listing.
/// * Everything else sits behind the bearer-token middleware.
/// * Uploaded covers are served from `/static/uploads`.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = [
        state.config.public_base_url.origin().ascii_serialization(),
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
    .iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_login = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/logout", post(auth::logout))
                .route("/me", get(auth::me))
                .route_layer(require_login.clone()),
        );

    let book_routes = Router::new()
        .route("/search", get(books::search))
        .route("/{id}", get(books::get_book))
        .route("/{id}/reviews", get(interaction::list_reviews))
        .merge(
            Router::new()
                .route("/", post(books::add_book))
                .route("/available", get(books::available_books))
                .route("/{id}", delete(books::delete_book))
                .route("/{id}/borrow", post(lending::borrow_book))
                .route("/{id}/return", post(lending::return_book))
                .route("/{id}/favorite", post(interaction::toggle_favorite))
                .route("/{id}/reviews", post(interaction::create_review))
                .route("/{id}/recommend", post(interaction::recommend_book))
                .route("/{id}/qr", get(pickup::show_qr))
                .route("/{id}/qr/download", get(pickup::download_qr))
                .route_layer(require_login.clone()),
        );

    let me_routes = Router::new()
        .route("/dashboard", get(profile::dashboard))
        .route("/history", get(profile::history))
        .route("/favorites", get(profile::favorites))
        .route_layer(require_login);

    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/books", book_routes)
        .nest("/api/me", me_routes)
        .nest_service("/static/uploads", uploads)
        // Global middleware (applied top to bottom)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}
