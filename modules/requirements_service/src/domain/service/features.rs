use super::{ensure_authenticated, ensure_owner, storage, Service};
use crate::contract::{
    Feature, FeaturePatch, ListFilter, NewFeature, Page, PageRequest, RequirementsError, User,
};
use crate::domain::validation::{validate_feature_patch, validate_new_feature};

const RESOURCE: &str = "Feature";

impl Service {
    // ===== Feature Operations =====

    pub async fn create_feature(
        &self,
        user: &User,
        input: NewFeature,
    ) -> Result<Feature, RequirementsError> {
        ensure_authenticated(user)?;
        let input = validate_new_feature(input)?;
        self.load_domain(input.domain_id).await?;

        let feature = self
            .repos
            .features
            .create(user.id, &input)
            .await
            .map_err(storage("create feature"))?;
        tracing::debug!(feature_id = feature.id, "Feature created");
        Ok(feature)
    }

    pub async fn get_feature(&self, user: &User, id: i32) -> Result<Feature, RequirementsError> {
        ensure_authenticated(user)?;
        self.load_feature(id).await
    }

    /// `filter.parent_id` selects the domain
    pub async fn list_features(
        &self,
        user: &User,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Page<Feature>, RequirementsError> {
        ensure_authenticated(user)?;
        let (items, total) = self
            .repos
            .features
            .list(filter, page)
            .await
            .map_err(storage("list features"))?;
        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn update_feature(
        &self,
        user: &User,
        id: i32,
        patch: FeaturePatch,
    ) -> Result<Feature, RequirementsError> {
        ensure_authenticated(user)?;
        let patch = validate_feature_patch(patch)?;
        let current = self.load_feature(id).await?;
        ensure_owner(user, &current)?;

        self.repos
            .features
            .update(id, &patch)
            .await
            .map_err(storage("update feature"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub async fn delete_feature(&self, user: &User, id: i32) -> Result<(), RequirementsError> {
        ensure_authenticated(user)?;
        let current = self.load_feature(id).await?;
        ensure_owner(user, &current)?;

        if !self
            .repos
            .features
            .soft_delete(id)
            .await
            .map_err(storage("delete feature"))?
        {
            return Err(RequirementsError::not_found(RESOURCE, id));
        }
        Ok(())
    }

    pub async fn restore_feature(&self, user: &User, id: i32) -> Result<Feature, RequirementsError> {
        ensure_authenticated(user)?;
        let current = self
            .repos
            .features
            .find_by_id_with_deleted(id)
            .await
            .map_err(storage("find feature"))?
            .filter(|f| f.is_deleted)
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))?;
        ensure_owner(user, &current)?;

        self.repos
            .features
            .restore(id)
            .await
            .map_err(storage("restore feature"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub(super) async fn load_feature(&self, id: i32) -> Result<Feature, RequirementsError> {
        self.repos
            .features
            .find_by_id(id)
            .await
            .map_err(storage("find feature"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }
}
