use crate::{
    controller::health_check_controller, middleware::auth::require_auth, params, protect, AppState,
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::controller::{
    caso_controller, checkout_controller, documento_controller, especialidad_controller,
    notificacion_controller, profile_controller, solicitud_abogado_controller,
    user_session_controller, webhook_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "KlamAI Platform API"
        ),
        paths(
            caso_controller::index,
            caso_controller::read,
            caso_controller::create,
            caso_controller::update,
            caso_controller::assign,
            caso_controller::close,
            caso_controller::agotar,
            checkout_controller::create,
            documento_controller::index,
            documento_controller::create,
            documento_controller::signed_url,
            documento_controller::delete,
            especialidad_controller::index,
            notificacion_controller::index,
            notificacion_controller::mark_leida,
            profile_controller::read,
            profile_controller::update,
            solicitud_abogado_controller::create,
            solicitud_abogado_controller::index,
            solicitud_abogado_controller::approve,
            solicitud_abogado_controller::reject,
            user_session_controller::login,
            user_session_controller::delete,
        ),
        components(
            schemas(
                domain::casos::Model,
                domain::asignaciones_casos::Model,
                domain::notificaciones::Model,
                domain::profiles::Model,
                domain::especialidades::Model,
                domain::solicitudes_abogado::Model,
                domain::profile::Credentials,
                domain::documento::Documento,
                domain::documento::NuevoDocumento,
                params::caso::UpdateParams,
                params::profile::UpdateParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "klamai", description = "KlamAI legal consultation API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(caso_routes(app_state.clone()))
        .merge(checkout_routes(app_state.clone()))
        .merge(documento_routes(app_state.clone()))
        .merge(especialidad_routes(app_state.clone()))
        .merge(health_routes())
        .merge(notificacion_routes(app_state.clone()))
        .merge(profile_routes(app_state.clone()))
        .merge(solicitud_abogado_routes(app_state.clone()))
        .merge(user_session_routes())
        .merge(user_session_protected_routes(app_state.clone()))
        .merge(webhook_routes(app_state.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
}

fn caso_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            // Draft intake is open to anonymous requesters; everything else
            // under /casos requires a session.
            Router::new().route("/casos", post(caso_controller::create)),
        )
        .merge(
            Router::new()
                .route("/casos", get(caso_controller::index))
                .route_layer(from_fn(require_auth)),
        )
        .merge(
            // GET /casos/:id
            Router::new()
                .route("/casos/:id", get(caso_controller::read))
                .route_layer(from_fn_with_state(app_state.clone(), protect::casos::read))
                .route_layer(from_fn(require_auth)),
        )
        .merge(
            // PUT /casos/:id
            Router::new()
                .route("/casos/:id", put(caso_controller::update))
                .route_layer(from_fn_with_state(app_state.clone(), protect::casos::update))
                .route_layer(from_fn(require_auth)),
        )
        .merge(
            // POST /casos/:id/asignar
            Router::new()
                .route("/casos/:id/asignar", post(caso_controller::assign))
                .route_layer(from_fn_with_state(app_state.clone(), protect::casos::assign))
                .route_layer(from_fn(require_auth)),
        )
        .merge(
            // POST /casos/:id/cerrar
            Router::new()
                .route("/casos/:id/cerrar", post(caso_controller::close))
                .route_layer(from_fn_with_state(app_state.clone(), protect::casos::close))
                .route_layer(from_fn(require_auth)),
        )
        .merge(
            // POST /casos/:id/agotar
            Router::new()
                .route("/casos/:id/agotar", post(caso_controller::agotar))
                .route_layer(from_fn_with_state(app_state.clone(), protect::casos::update))
                .route_layer(from_fn(require_auth)),
        )
        .with_state(app_state)
}

fn checkout_routes(app_state: AppState) -> Router {
    // Anonymous draft requesters also pay, so no session requirement here;
    // ownership of linked casos is enforced in the domain layer.
    Router::new()
        .route(
            "/casos/:id/checkout_session",
            post(checkout_controller::create),
        )
        .with_state(app_state)
}

fn documento_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            Router::new()
                .route("/casos/:id/documentos", get(documento_controller::index))
                .route_layer(from_fn_with_state(app_state.clone(), protect::casos::read)),
        )
        .merge(
            Router::new()
                .route("/casos/:id/documentos", post(documento_controller::create))
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::casos::attach_documento,
                )),
        )
        .merge(
            Router::new()
                .route(
                    "/documentos/:id/url_firmada",
                    get(documento_controller::signed_url),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::documentos::read,
                )),
        )
        .merge(
            Router::new()
                .route("/documentos/:id", delete(documento_controller::delete))
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::documentos::delete,
                )),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn especialidad_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/especialidades", get(especialidad_controller::index))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn notificacion_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/notificaciones", get(notificacion_controller::index))
        .route(
            "/notificaciones/:id/leida",
            put(notificacion_controller::mark_leida),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn profile_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/profiles/:id", get(profile_controller::read))
        .route("/profiles/:id", put(profile_controller::update))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn solicitud_abogado_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            // Public application intake
            Router::new().route(
                "/solicitudes_abogado",
                post(solicitud_abogado_controller::create),
            ),
        )
        .merge(
            // Staff review surface
            Router::new()
                .route(
                    "/solicitudes_abogado",
                    get(solicitud_abogado_controller::index),
                )
                .route(
                    "/solicitudes_abogado/:id/aprobar",
                    post(solicitud_abogado_controller::approve),
                )
                .route(
                    "/solicitudes_abogado/:id/rechazar",
                    post(solicitud_abogado_controller::reject),
                )
                .route_layer(from_fn(protect::solicitudes_abogado::review))
                .route_layer(from_fn(require_auth)),
        )
        .with_state(app_state)
}

pub fn user_session_protected_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/delete", delete(user_session_controller::delete))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

pub fn user_session_routes() -> Router {
    Router::new().route("/login", post(user_session_controller::login))
}

/// Routes for external service webhooks (no session auth - validated by
/// webhook signature)
fn webhook_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/webhooks/stripe", post(webhook_controller::stripe_webhook))
        .with_state(app_state)
}

// This will serve static files that we can use as a "fallback" for when the server panics
pub fn static_routes() -> Router {
    Router::new().nest_service("/", ServeDir::new("./"))
}
