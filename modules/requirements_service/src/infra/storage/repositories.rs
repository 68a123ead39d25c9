//! SeaORM repository implementations

use crate::contract::{
    Document, DocumentPatch, Domain, DomainPatch, Feature, FeaturePatch, ListFilter,
    NewDocument, NewDomain, NewFeature, NewProject, NewRequirement, NewUser, PageRequest,
    Project, ProjectPatch, Requirement, RequirementPatch, User,
};
use crate::domain::repository::{
    DocumentRepository, DomainRepository, FeatureRepository, LoginAttemptRepository,
    ProjectRepository, RequirementRepository, UniqueViolation, UserRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
};
use std::sync::Arc;

use super::entity::{document, domain, feature, login_attempt, project, requirement, user};

/// Unique index hits become [`UniqueViolation`]; anything else passes through
fn unique_violation(err: DbErr) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Unique constraint violated");
            UniqueViolation.into()
        }
        _ => err.into(),
    }
}

/// Count all rows matched by `query`, then fetch one page ordered by `order`
async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    order: E::Column,
    page: PageRequest,
) -> Result<(Vec<E::Model>, u64)>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let total = query.clone().count(db).await?;
    let rows = query
        .order_by_asc(order)
        .limit(page.size)
        .offset(page.offset())
        .all(db)
        .await?;
    Ok((rows, total))
}

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let now = Utc::now();
        let active = user::ActiveModel {
            email: Set(new_user.email.to_lowercase()),
            name: Set(new_user.name.clone()),
            hashed_password: Set(new_user.hashed_password.clone()),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = user::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(unique_violation)?;
        Ok(result.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .filter(user::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .filter(user::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }
}

// ===== Login Attempt Repository =====

pub struct SeaOrmLoginAttemptRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmLoginAttemptRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoginAttemptRepository for SeaOrmLoginAttemptRepository {
    async fn record(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
        let active = login_attempt::ActiveModel {
            email: Set(email.to_lowercase()),
            attempt_time: Set(at),
            ..Default::default()
        };
        login_attempt::Entity::insert(active).exec(&*self.db).await?;
        Ok(())
    }

    async fn list_since(&self, email: &str, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
        let rows = login_attempt::Entity::find()
            .filter(login_attempt::Column::Email.eq(email.to_lowercase()))
            .filter(login_attempt::Column::AttemptTime.gte(since))
            .order_by_asc(login_attempt::Column::AttemptTime)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(|r| r.attempt_time).collect())
    }

    async fn clear(&self, email: &str) -> Result<()> {
        login_attempt::Entity::delete_many()
            .filter(login_attempt::Column::Email.eq(email.to_lowercase()))
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

// ===== Project Repository =====

pub struct SeaOrmProjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmProjectRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for SeaOrmProjectRepository {
    async fn create(&self, founder_id: i32, input: &NewProject) -> Result<Project> {
        let now = Utc::now();
        let active = project::ActiveModel {
            founder_id: Set(founder_id),
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = project::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(unique_violation)?;
        Ok(result.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Project>> {
        let result = project::Entity::find_by_id(id)
            .filter(project::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Project>> {
        let result = project::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_title_and_founder(
        &self,
        title: &str,
        founder_id: i32,
    ) -> Result<Option<Project>> {
        let result = project::Entity::find()
            .filter(project::Column::Title.eq(title))
            .filter(project::Column::FounderId.eq(founder_id))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Project>, u64)> {
        let mut query = project::Entity::find().filter(project::Column::IsDeleted.eq(false));
        // Both filters name the founder; when both are given they must agree
        for founder_id in [filter.parent_id, filter.owner_id].into_iter().flatten() {
            query = query.filter(project::Column::FounderId.eq(founder_id));
        }

        let (rows, total) = fetch_page(&self.db, query, project::Column::Id, page).await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: i32, patch: &ProjectPatch) -> Result<Option<Project>> {
        let Some(current) = project::Entity::find_by_id(id)
            .filter(project::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: project::ActiveModel = current.into();
        if let Some(title) = &patch.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(Some(description.clone()));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db).await.map_err(unique_violation)?;
        Ok(Some(updated.into()))
    }

    async fn soft_delete(&self, id: i32) -> Result<bool> {
        let now = Utc::now();
        let result = project::Entity::update_many()
            .col_expr(project::Column::IsDeleted, Expr::value(true))
            .col_expr(project::Column::DeletedAt, Expr::value(now))
            .col_expr(project::Column::UpdatedAt, Expr::value(now))
            .filter(project::Column::Id.eq(id))
            .filter(project::Column::IsDeleted.eq(false))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: i32) -> Result<Option<Project>> {
        let Some(current) = project::Entity::find_by_id(id)
            .filter(project::Column::IsDeleted.eq(true))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: project::ActiveModel = current.into();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&*self.db).await?.into()))
    }
}

// ===== Document Repository =====

pub struct SeaOrmDocumentRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDocumentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentRepository for SeaOrmDocumentRepository {
    async fn create(&self, owner_id: i32, input: &NewDocument) -> Result<Document> {
        let now = Utc::now();
        let active = document::ActiveModel {
            project_id: Set(input.project_id),
            owner_id: Set(owner_id),
            title: Set(input.title.clone()),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = document::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(unique_violation)?;
        Ok(result.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Document>> {
        let result = document::Entity::find_by_id(id)
            .filter(document::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Document>> {
        let result = document::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_title_and_project(
        &self,
        title: &str,
        project_id: i32,
    ) -> Result<Option<Document>> {
        let result = document::Entity::find()
            .filter(document::Column::Title.eq(title))
            .filter(document::Column::ProjectId.eq(project_id))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Document>, u64)> {
        let mut query = document::Entity::find().filter(document::Column::IsDeleted.eq(false));
        if let Some(project_id) = filter.parent_id {
            query = query.filter(document::Column::ProjectId.eq(project_id));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(document::Column::OwnerId.eq(owner_id));
        }

        let (rows, total) = fetch_page(&self.db, query, document::Column::Id, page).await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: i32, patch: &DocumentPatch) -> Result<Option<Document>> {
        let Some(current) = document::Entity::find_by_id(id)
            .filter(document::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: document::ActiveModel = current.into();
        if let Some(title) = &patch.title {
            active.title = Set(title.clone());
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db).await.map_err(unique_violation)?;
        Ok(Some(updated.into()))
    }

    async fn soft_delete(&self, id: i32) -> Result<bool> {
        let now = Utc::now();
        let result = document::Entity::update_many()
            .col_expr(document::Column::IsDeleted, Expr::value(true))
            .col_expr(document::Column::DeletedAt, Expr::value(now))
            .col_expr(document::Column::UpdatedAt, Expr::value(now))
            .filter(document::Column::Id.eq(id))
            .filter(document::Column::IsDeleted.eq(false))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: i32) -> Result<Option<Document>> {
        let Some(current) = document::Entity::find_by_id(id)
            .filter(document::Column::IsDeleted.eq(true))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: document::ActiveModel = current.into();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&*self.db).await?.into()))
    }
}

// ===== Domain Repository =====

pub struct SeaOrmDomainRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDomainRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DomainRepository for SeaOrmDomainRepository {
    async fn create(&self, owner_id: i32, input: &NewDomain) -> Result<Domain> {
        let now = Utc::now();
        let active = domain::ActiveModel {
            document_id: Set(input.document_id),
            owner_id: Set(owner_id),
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = domain::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;
        Ok(result.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Domain>> {
        let result = domain::Entity::find_by_id(id)
            .filter(domain::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Domain>> {
        let result = domain::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Domain>, u64)> {
        let mut query = domain::Entity::find().filter(domain::Column::IsDeleted.eq(false));
        if let Some(document_id) = filter.parent_id {
            query = query.filter(domain::Column::DocumentId.eq(document_id));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(domain::Column::OwnerId.eq(owner_id));
        }

        let (rows, total) = fetch_page(&self.db, query, domain::Column::Id, page).await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: i32, patch: &DomainPatch) -> Result<Option<Domain>> {
        let Some(current) = domain::Entity::find_by_id(id)
            .filter(domain::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: domain::ActiveModel = current.into();
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(Some(description.clone()));
        }
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&*self.db).await?.into()))
    }

    async fn soft_delete(&self, id: i32) -> Result<bool> {
        let now = Utc::now();
        let result = domain::Entity::update_many()
            .col_expr(domain::Column::IsDeleted, Expr::value(true))
            .col_expr(domain::Column::DeletedAt, Expr::value(now))
            .col_expr(domain::Column::UpdatedAt, Expr::value(now))
            .filter(domain::Column::Id.eq(id))
            .filter(domain::Column::IsDeleted.eq(false))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: i32) -> Result<Option<Domain>> {
        let Some(current) = domain::Entity::find_by_id(id)
            .filter(domain::Column::IsDeleted.eq(true))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: domain::ActiveModel = current.into();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&*self.db).await?.into()))
    }
}

// ===== Feature Repository =====

pub struct SeaOrmFeatureRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmFeatureRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeatureRepository for SeaOrmFeatureRepository {
    async fn create(&self, owner_id: i32, input: &NewFeature) -> Result<Feature> {
        let now = Utc::now();
        let active = feature::ActiveModel {
            domain_id: Set(input.domain_id),
            owner_id: Set(owner_id),
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = feature::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;
        Ok(result.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Feature>> {
        let result = feature::Entity::find_by_id(id)
            .filter(feature::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Feature>> {
        let result = feature::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Feature>, u64)> {
        let mut query = feature::Entity::find().filter(feature::Column::IsDeleted.eq(false));
        if let Some(domain_id) = filter.parent_id {
            query = query.filter(feature::Column::DomainId.eq(domain_id));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(feature::Column::OwnerId.eq(owner_id));
        }

        let (rows, total) = fetch_page(&self.db, query, feature::Column::Id, page).await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: i32, patch: &FeaturePatch) -> Result<Option<Feature>> {
        let Some(current) = feature::Entity::find_by_id(id)
            .filter(feature::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: feature::ActiveModel = current.into();
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(Some(description.clone()));
        }
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&*self.db).await?.into()))
    }

    async fn soft_delete(&self, id: i32) -> Result<bool> {
        let now = Utc::now();
        let result = feature::Entity::update_many()
            .col_expr(feature::Column::IsDeleted, Expr::value(true))
            .col_expr(feature::Column::DeletedAt, Expr::value(now))
            .col_expr(feature::Column::UpdatedAt, Expr::value(now))
            .filter(feature::Column::Id.eq(id))
            .filter(feature::Column::IsDeleted.eq(false))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: i32) -> Result<Option<Feature>> {
        let Some(current) = feature::Entity::find_by_id(id)
            .filter(feature::Column::IsDeleted.eq(true))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: feature::ActiveModel = current.into();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&*self.db).await?.into()))
    }
}

// ===== Requirement Repository =====

pub struct SeaOrmRequirementRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRequirementRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RequirementRepository for SeaOrmRequirementRepository {
    async fn create(&self, owner_id: i32, input: &NewRequirement) -> Result<Requirement> {
        let now = Utc::now();
        let active = requirement::ActiveModel {
            feature_id: Set(input.feature_id),
            owner_id: Set(owner_id),
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            priority: Set(input.priority.as_str().to_string()),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = requirement::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await?;
        result.try_into()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Requirement>> {
        let result = requirement::Entity::find_by_id(id)
            .filter(requirement::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Requirement>> {
        let result = requirement::Entity::find_by_id(id).one(&*self.db).await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<(Vec<Requirement>, u64)> {
        let mut query =
            requirement::Entity::find().filter(requirement::Column::IsDeleted.eq(false));
        if let Some(feature_id) = filter.parent_id {
            query = query.filter(requirement::Column::FeatureId.eq(feature_id));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(requirement::Column::OwnerId.eq(owner_id));
        }

        let (rows, total) = fetch_page(&self.db, query, requirement::Column::Id, page).await?;
        let items = rows
            .into_iter()
            .map(|e| e.try_into())
            .collect::<Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn update(&self, id: i32, patch: &RequirementPatch) -> Result<Option<Requirement>> {
        let Some(current) = requirement::Entity::find_by_id(id)
            .filter(requirement::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: requirement::ActiveModel = current.into();
        if let Some(title) = &patch.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority.as_str().to_string());
        }
        if let Some(feature_id) = patch.feature_id {
            active.feature_id = Set(feature_id);
        }
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&*self.db).await?.try_into()?))
    }

    async fn soft_delete(&self, id: i32) -> Result<bool> {
        let now = Utc::now();
        let result = requirement::Entity::update_many()
            .col_expr(requirement::Column::IsDeleted, Expr::value(true))
            .col_expr(requirement::Column::DeletedAt, Expr::value(now))
            .col_expr(requirement::Column::UpdatedAt, Expr::value(now))
            .filter(requirement::Column::Id.eq(id))
            .filter(requirement::Column::IsDeleted.eq(false))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: i32) -> Result<Option<Requirement>> {
        let Some(current) = requirement::Entity::find_by_id(id)
            .filter(requirement::Column::IsDeleted.eq(true))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: requirement::ActiveModel = current.into();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());

        Ok(Some(active.update(&*self.db).await?.try_into()?))
    }
}
