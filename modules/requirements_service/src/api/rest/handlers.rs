//! HTTP request handlers - thin layer that delegates to domain service

use super::{auth::CurrentUser, dto::*, error::Problem};
use crate::contract::ListFilter;
use crate::domain::validation::validate_page;
use crate::domain::Service;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    Extension, Form, Json,
};
use std::sync::Arc;

type Svc = Extension<Arc<Service>>;
type Body<T> = Result<Json<T>, JsonRejection>;
type Id = Result<Path<i32>, PathRejection>;
type ListParams = Result<Query<ListQuery>, QueryRejection>;

fn list_args(
    params: ListParams,
    parent: impl FnOnce(&ListQuery) -> Option<i32>,
) -> Result<(ListFilter, crate::contract::PageRequest), Problem> {
    let Query(query) = params?;
    let page = validate_page(query.page, query.size)?;
    let filter = ListFilter {
        parent_id: parent(&query),
        owner_id: query.owner_id,
    };
    Ok((filter, page))
}

// ===== User Handlers =====

pub async fn register(
    Extension(service): Svc,
    body: Body<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), Problem> {
    let Json(req) = body?;
    let user = service.register(&req.email, &req.password, &req.name).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Password login; `username` carries the email
pub async fn login(
    Extension(service): Svc,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenResponse>, Problem> {
    let Form(form) = form?;
    let token = service.login(&form.username, &form.password).await?;
    Ok(Json(token.into()))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserDto> {
    Json(user.into())
}

// ===== Project Handlers =====

pub async fn list_projects(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    params: ListParams,
) -> Result<Json<PageDto<ProjectDto>>, Problem> {
    let (filter, page) = list_args(params, |q| q.founder_id)?;
    let projects = service.list_projects(&user, filter, page).await?;
    Ok(Json(projects.into()))
}

pub async fn create_project(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    body: Body<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectDto>), Problem> {
    let Json(req) = body?;
    let project = service.create_project(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(project.into())))
}

pub async fn get_project(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<ProjectDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.get_project(&user, id).await?.into()))
}

pub async fn update_project(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
    body: Body<UpdateProjectRequest>,
) -> Result<Json<ProjectDto>, Problem> {
    let Path(id) = id?;
    let Json(req) = body?;
    Ok(Json(service.update_project(&user, id, req.into()).await?.into()))
}

pub async fn delete_project(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<StatusCode, Problem> {
    let Path(id) = id?;
    service.delete_project(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_project(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<ProjectDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.restore_project(&user, id).await?.into()))
}

// ===== Document Handlers =====

pub async fn list_documents(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    params: ListParams,
) -> Result<Json<PageDto<DocumentDto>>, Problem> {
    let (filter, page) = list_args(params, |q| q.project_id)?;
    let documents = service.list_documents(&user, filter, page).await?;
    Ok(Json(documents.into()))
}

pub async fn create_document(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    body: Body<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentDto>), Problem> {
    let Json(req) = body?;
    let document = service.create_document(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

pub async fn get_document(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<DocumentDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.get_document(&user, id).await?.into()))
}

pub async fn update_document(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
    body: Body<UpdateDocumentRequest>,
) -> Result<Json<DocumentDto>, Problem> {
    let Path(id) = id?;
    let Json(req) = body?;
    Ok(Json(service.update_document(&user, id, req.into()).await?.into()))
}

pub async fn delete_document(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<StatusCode, Problem> {
    let Path(id) = id?;
    service.delete_document(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_document(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<DocumentDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.restore_document(&user, id).await?.into()))
}

// ===== Domain Handlers =====

pub async fn list_domains(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    params: ListParams,
) -> Result<Json<PageDto<DomainDto>>, Problem> {
    let (filter, page) = list_args(params, |q| q.document_id)?;
    let domains = service.list_domains(&user, filter, page).await?;
    Ok(Json(domains.into()))
}

pub async fn create_domain(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    body: Body<CreateDomainRequest>,
) -> Result<(StatusCode, Json<DomainDto>), Problem> {
    let Json(req) = body?;
    let domain = service.create_domain(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(domain.into())))
}

pub async fn get_domain(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<DomainDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.get_domain(&user, id).await?.into()))
}

pub async fn update_domain(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
    body: Body<UpdateDomainRequest>,
) -> Result<Json<DomainDto>, Problem> {
    let Path(id) = id?;
    let Json(req) = body?;
    Ok(Json(service.update_domain(&user, id, req.into()).await?.into()))
}

pub async fn delete_domain(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<StatusCode, Problem> {
    let Path(id) = id?;
    service.delete_domain(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_domain(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<DomainDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.restore_domain(&user, id).await?.into()))
}

// ===== Feature Handlers =====

pub async fn list_features(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    params: ListParams,
) -> Result<Json<PageDto<FeatureDto>>, Problem> {
    let (filter, page) = list_args(params, |q| q.domain_id)?;
    let features = service.list_features(&user, filter, page).await?;
    Ok(Json(features.into()))
}

pub async fn create_feature(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    body: Body<CreateFeatureRequest>,
) -> Result<(StatusCode, Json<FeatureDto>), Problem> {
    let Json(req) = body?;
    let feature = service.create_feature(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(feature.into())))
}

pub async fn get_feature(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<FeatureDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.get_feature(&user, id).await?.into()))
}

pub async fn update_feature(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
    body: Body<UpdateFeatureRequest>,
) -> Result<Json<FeatureDto>, Problem> {
    let Path(id) = id?;
    let Json(req) = body?;
    Ok(Json(service.update_feature(&user, id, req.into()).await?.into()))
}

pub async fn delete_feature(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<StatusCode, Problem> {
    let Path(id) = id?;
    service.delete_feature(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_feature(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<FeatureDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.restore_feature(&user, id).await?.into()))
}

// ===== Requirement Handlers =====

pub async fn list_requirements(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    params: ListParams,
) -> Result<Json<PageDto<RequirementDto>>, Problem> {
    let (filter, page) = list_args(params, |q| q.feature_id)?;
    let requirements = service.list_requirements(&user, filter, page).await?;
    Ok(Json(requirements.into()))
}

pub async fn create_requirement(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    body: Body<CreateRequirementRequest>,
) -> Result<(StatusCode, Json<RequirementDto>), Problem> {
    let Json(req) = body?;
    let requirement = service.create_requirement(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(requirement.into())))
}

pub async fn get_requirement(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<RequirementDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.get_requirement(&user, id).await?.into()))
}

pub async fn update_requirement(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
    body: Body<UpdateRequirementRequest>,
) -> Result<Json<RequirementDto>, Problem> {
    let Path(id) = id?;
    let Json(req) = body?;
    Ok(Json(service.update_requirement(&user, id, req.into()).await?.into()))
}

pub async fn delete_requirement(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<StatusCode, Problem> {
    let Path(id) = id?;
    service.delete_requirement(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_requirement(
    Extension(service): Svc,
    CurrentUser(user): CurrentUser,
    id: Id,
) -> Result<Json<RequirementDto>, Problem> {
    let Path(id) = id?;
    Ok(Json(service.restore_requirement(&user, id).await?.into()))
}
