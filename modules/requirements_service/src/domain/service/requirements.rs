use super::{ensure_authenticated, ensure_owner, storage, Service};
use crate::contract::{
    ListFilter, NewRequirement, Page, PageRequest, Requirement, RequirementPatch,
    RequirementsError, User,
};
use crate::domain::validation::{validate_new_requirement, validate_requirement_patch};

const RESOURCE: &str = "Requirement";

impl Service {
    // ===== Requirement Operations =====

    pub async fn create_requirement(
        &self,
        user: &User,
        input: NewRequirement,
    ) -> Result<Requirement, RequirementsError> {
        ensure_authenticated(user)?;
        let input = validate_new_requirement(input)?;
        self.load_feature(input.feature_id).await?;

        let requirement = self
            .repos
            .requirements
            .create(user.id, &input)
            .await
            .map_err(storage("create requirement"))?;
        tracing::debug!(
            requirement_id = requirement.id,
            priority = requirement.priority.as_str(),
            "Requirement created"
        );
        Ok(requirement)
    }

    pub async fn get_requirement(
        &self,
        user: &User,
        id: i32,
    ) -> Result<Requirement, RequirementsError> {
        ensure_authenticated(user)?;
        self.load_requirement(id).await
    }

    /// `filter.parent_id` selects the feature
    pub async fn list_requirements(
        &self,
        user: &User,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Page<Requirement>, RequirementsError> {
        ensure_authenticated(user)?;
        let (items, total) = self
            .repos
            .requirements
            .list(filter, page)
            .await
            .map_err(storage("list requirements"))?;
        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }

    /// Updates fields; a new `feature_id` moves the requirement
    pub async fn update_requirement(
        &self,
        user: &User,
        id: i32,
        patch: RequirementPatch,
    ) -> Result<Requirement, RequirementsError> {
        ensure_authenticated(user)?;
        let patch = validate_requirement_patch(patch)?;
        let current = self.load_requirement(id).await?;
        ensure_owner(user, &current)?;

        if let Some(feature_id) = patch.feature_id {
            self.load_feature(feature_id).await?;
        }

        self.repos
            .requirements
            .update(id, &patch)
            .await
            .map_err(storage("update requirement"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub async fn delete_requirement(&self, user: &User, id: i32) -> Result<(), RequirementsError> {
        ensure_authenticated(user)?;
        let current = self.load_requirement(id).await?;
        ensure_owner(user, &current)?;

        if !self
            .repos
            .requirements
            .soft_delete(id)
            .await
            .map_err(storage("delete requirement"))?
        {
            return Err(RequirementsError::not_found(RESOURCE, id));
        }
        Ok(())
    }

    pub async fn restore_requirement(
        &self,
        user: &User,
        id: i32,
    ) -> Result<Requirement, RequirementsError> {
        ensure_authenticated(user)?;
        let current = self
            .repos
            .requirements
            .find_by_id_with_deleted(id)
            .await
            .map_err(storage("find requirement"))?
            .filter(|r| r.is_deleted)
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))?;
        ensure_owner(user, &current)?;

        self.repos
            .requirements
            .restore(id)
            .await
            .map_err(storage("restore requirement"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    async fn load_requirement(&self, id: i32) -> Result<Requirement, RequirementsError> {
        self.repos
            .requirements
            .find_by_id(id)
            .await
            .map_err(storage("find requirement"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }
}
