use super::{ensure_authenticated, ensure_owner, storage, Service};
use crate::contract::{
    Domain, DomainPatch, ListFilter, NewDomain, Page, PageRequest, RequirementsError, User,
};
use crate::domain::validation::{validate_domain_patch, validate_new_domain};

const RESOURCE: &str = "Domain";

impl Service {
    // ===== Domain Operations =====

    pub async fn create_domain(
        &self,
        user: &User,
        input: NewDomain,
    ) -> Result<Domain, RequirementsError> {
        ensure_authenticated(user)?;
        let input = validate_new_domain(input)?;
        self.load_document(input.document_id).await?;

        let domain = self
            .repos
            .domains
            .create(user.id, &input)
            .await
            .map_err(storage("create domain"))?;
        tracing::debug!(domain_id = domain.id, "Domain created");
        Ok(domain)
    }

    pub async fn get_domain(&self, user: &User, id: i32) -> Result<Domain, RequirementsError> {
        ensure_authenticated(user)?;
        self.load_domain(id).await
    }

    /// `filter.parent_id` selects the document
    pub async fn list_domains(
        &self,
        user: &User,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Page<Domain>, RequirementsError> {
        ensure_authenticated(user)?;
        let (items, total) = self
            .repos
            .domains
            .list(filter, page)
            .await
            .map_err(storage("list domains"))?;
        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn update_domain(
        &self,
        user: &User,
        id: i32,
        patch: DomainPatch,
    ) -> Result<Domain, RequirementsError> {
        ensure_authenticated(user)?;
        let patch = validate_domain_patch(patch)?;
        let current = self.load_domain(id).await?;
        ensure_owner(user, &current)?;

        self.repos
            .domains
            .update(id, &patch)
            .await
            .map_err(storage("update domain"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub async fn delete_domain(&self, user: &User, id: i32) -> Result<(), RequirementsError> {
        ensure_authenticated(user)?;
        let current = self.load_domain(id).await?;
        ensure_owner(user, &current)?;

        if !self
            .repos
            .domains
            .soft_delete(id)
            .await
            .map_err(storage("delete domain"))?
        {
            return Err(RequirementsError::not_found(RESOURCE, id));
        }
        Ok(())
    }

    pub async fn restore_domain(&self, user: &User, id: i32) -> Result<Domain, RequirementsError> {
        ensure_authenticated(user)?;
        let current = self
            .repos
            .domains
            .find_by_id_with_deleted(id)
            .await
            .map_err(storage("find domain"))?
            .filter(|d| d.is_deleted)
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))?;
        ensure_owner(user, &current)?;

        self.repos
            .domains
            .restore(id)
            .await
            .map_err(storage("restore domain"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub(super) async fn load_domain(&self, id: i32) -> Result<Domain, RequirementsError> {
        self.repos
            .domains
            .find_by_id(id)
            .await
            .map_err(storage("find domain"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }
}
