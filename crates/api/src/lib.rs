pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/me", get(routes::auth::me));

    // Admin routes: every handler re-checks the admin predicate
    let admin_routes = Router::new()
        .route("/users", get(routes::user::list))
        .route("/users/manual", post(routes::user::upsert_manual))
        .route("/users/{user_id}/role", patch(routes::user::change_role))
        .route("/team", get(routes::team::grouped))
        .route("/team/assign", post(routes::team::assign))
        .route("/team/unassign", post(routes::team::unassign))
        .route("/publications", get(routes::publication::list_all))
        .route("/publications", post(routes::publication::create_as_admin))
        .route(
            "/publications/{publication_id}",
            put(routes::publication::edit_content),
        )
        .route(
            "/publications/{publication_id}/status",
            patch(routes::publication::set_status),
        )
        .route("/conferences", get(routes::conference::list_all))
        .route("/conferences", post(routes::conference::create_as_admin))
        .route(
            "/conferences/{conference_id}",
            put(routes::conference::update_as_admin),
        )
        .route(
            "/conferences/{conference_id}",
            delete(routes::conference::delete),
        );

    // Lead routes: scoped to the calling lead's own team and conferences
    let lead_routes = Router::new()
        .route("/team", get(routes::team::my_team))
        .route(
            "/team/{member_id}",
            patch(routes::team::update_member_profile),
        )
        .route("/conferences", get(routes::conference::list_mine))
        .route("/conferences", post(routes::conference::create_as_lead))
        .route(
            "/conferences/{conference_id}",
            put(routes::conference::update_as_lead),
        )
        .route(
            "/publications",
            post(routes::publication::submit_as_lead),
        );

    // Public routes: no authentication
    let public_routes =
        Router::new().route("/publications", get(routes::publication::list_approved));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/lead", lead_routes)
        .nest("/api", public_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
