//! Route registration and the OpenAPI document

use super::{dto::*, error::Problem, handlers};
use crate::config::Config;
use crate::domain::Service;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Schemas published at `/openapi.json`
#[derive(OpenApi)]
#[openapi(
    info(title = "ReqTrack", description = "Requirements tracking API"),
    components(schemas(
        Problem,
        RootResponse,
        RegisterRequest,
        UserDto,
        LoginForm,
        TokenResponse,
        ProjectDto,
        CreateProjectRequest,
        UpdateProjectRequest,
        DocumentDto,
        CreateDocumentRequest,
        UpdateDocumentRequest,
        DomainDto,
        CreateDomainRequest,
        UpdateDomainRequest,
        FeatureDto,
        CreateFeatureRequest,
        UpdateFeatureRequest,
        PriorityDto,
        RequirementDto,
        CreateRequirementRequest,
        UpdateRequirementRequest,
    ))
)]
pub struct ApiDoc;

/// Build the OpenAPI document titled with the configured project name
pub fn openapi(config: &Config) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = config.project_name.clone();
    doc
}

/// Register all REST routes under `config.api_prefix`
pub fn register_routes(router: Router, service: Arc<Service>, config: &Config) -> Router {
    let welcome = RootResponse {
        message: config.welcome_message.clone(),
    };
    let doc = openapi(config);

    let api = Router::new()
        .route("/", get(move || async move { Json(welcome) }))
        .route("/openapi.json", get(move || async move { Json(doc) }))
        // Users
        .route("/users/register", post(handlers::register))
        .route("/users/login", post(handlers::login))
        .route("/users/me", get(handlers::me))
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/projects/{id}/restore", post(handlers::restore_project))
        // Documents
        .route(
            "/documents",
            get(handlers::list_documents).post(handlers::create_document),
        )
        .route(
            "/documents/{id}",
            get(handlers::get_document)
                .put(handlers::update_document)
                .delete(handlers::delete_document),
        )
        .route("/documents/{id}/restore", post(handlers::restore_document))
        // Domains
        .route(
            "/domains",
            get(handlers::list_domains).post(handlers::create_domain),
        )
        .route(
            "/domains/{id}",
            get(handlers::get_domain)
                .put(handlers::update_domain)
                .delete(handlers::delete_domain),
        )
        .route("/domains/{id}/restore", post(handlers::restore_domain))
        // Features
        .route(
            "/features",
            get(handlers::list_features).post(handlers::create_feature),
        )
        .route(
            "/features/{id}",
            get(handlers::get_feature)
                .put(handlers::update_feature)
                .delete(handlers::delete_feature),
        )
        .route("/features/{id}/restore", post(handlers::restore_feature))
        // Requirements
        .route(
            "/requirements",
            get(handlers::list_requirements).post(handlers::create_requirement),
        )
        .route(
            "/requirements/{id}",
            get(handlers::get_requirement)
                .put(handlers::update_requirement)
                .delete(handlers::delete_requirement),
        )
        .route(
            "/requirements/{id}/restore",
            post(handlers::restore_requirement),
        )
        // Add service as extension for handlers
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http());

    let prefix = config.api_prefix.trim_end_matches('/');
    if prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(prefix, api)
    }
}
