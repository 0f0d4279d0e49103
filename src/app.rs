use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenVerifier;
use crate::config::{AppConfig, ConfigError, SecurityConfig};
use crate::database::Store;
use crate::handlers;
use crate::middleware::{require_permission, PermissionGuard};

/// Server context built once at startup and shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<TokenVerifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, ConfigError> {
        let verifier = TokenVerifier::from_config(&config.auth)?;
        Ok(Self {
            store,
            verifier: Arc::new(verifier),
            config: Arc::new(config),
        })
    }

    pub fn guard(&self, permission: &'static str) -> PermissionGuard {
        PermissionGuard::new(self.verifier.clone(), permission)
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(handlers::service::root))
        .route("/health", get(handlers::service::health))
        .merge(trivia_routes())
        .merge(drink_routes(&state))
        .fallback(handlers::service::fallback)
        .with_state(state)
        // Global middleware
        .layer(middleware::map_response(handlers::service::method_not_allowed_envelope))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn trivia_routes() -> Router<AppState> {
    use handlers::trivia;

    Router::new()
        .route("/categories", get(trivia::categories_get))
        .route("/categories/:id/questions", get(trivia::category_questions_get))
        .route("/questions", get(trivia::questions_get).post(trivia::questions_post))
        .route("/questions/:id", delete(trivia::question_delete))
        .route("/search", post(trivia::search_post))
        .route("/quizzes", post(trivia::quizzes_post))
}

fn drink_routes(state: &AppState) -> Router<AppState> {
    use handlers::drinks;

    Router::new()
        .route(
            "/drinks",
            get(drinks::drinks_get).merge(guarded(post(drinks::drink_post), state.guard("post:drinks"))),
        )
        .route(
            "/drinks-detail",
            guarded(get(drinks::drinks_detail_get), state.guard("get:drinks-detail")),
        )
        .route(
            "/drinks/:id",
            guarded(patch(drinks::drink_patch), state.guard("patch:drinks"))
                .merge(guarded(delete(drinks::drink_delete), state.guard("delete:drinks"))),
        )
}

/// Wrap one method's handler in the permission check; unmatched methods still get 405
fn guarded(route: MethodRouter<AppState>, guard: PermissionGuard) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(guard, require_permission))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if security.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
