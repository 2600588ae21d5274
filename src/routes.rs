use crate::state::RegistrarState;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    limit::RequestBodyLimitLayer, trace::TraceLayer,
};

pub mod api;
pub mod dashboard;
pub mod register;

///a student record is well under a kilobyte
const BODY_LIMIT: usize = 64 * 1024;

pub fn router(state: RegistrarState) -> Router {
    let mut app: Router<RegistrarState> = Router::new()
        .route("/", get(api::get_root))
        .route(
            "/api/students",
            get(api::get_students).post(api::post_student),
        )
        .route(
            "/api/students/{id}",
            get(api::get_student).delete(api::delete_student),
        )
        .route("/register", get(register::get_register))
        .route("/internal/register", post(register::internal_post_register))
        .route(
            "/internal/register/dismiss",
            get(register::internal_get_dismiss),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
        .route(
            "/internal/dashboard/students",
            get(dashboard::internal_get_students),
        )
        .route(
            "/internal/dashboard/student",
            get(dashboard::internal_get_student).delete(dashboard::internal_delete_student),
        )
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::custom(api::handle_panic));

    if let Some(origin) = state.config().cors_origin() {
        info!(?origin, "Allowing cross-origin requests");
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([CONTENT_TYPE])
                .allow_credentials(true),
        );
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
