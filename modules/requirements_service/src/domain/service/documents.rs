use super::{ensure_authenticated, ensure_owner, storage, storage_or_duplicate, Service};
use crate::contract::{
    Document, DocumentPatch, ListFilter, NewDocument, Page, PageRequest, RequirementsError, User,
};
use crate::domain::validation::{validate_document_patch, validate_new_document};

const RESOURCE: &str = "Document";

impl Service {
    // ===== Document Operations =====

    pub async fn create_document(
        &self,
        user: &User,
        input: NewDocument,
    ) -> Result<Document, RequirementsError> {
        ensure_authenticated(user)?;
        let input = validate_new_document(input)?;
        self.load_project(input.project_id).await?;
        self.ensure_document_title_free(&input.title, input.project_id)
            .await?;

        let document = self
            .repos
            .documents
            .create(user.id, &input)
            .await
            .map_err(storage_or_duplicate(
                "create document",
                RESOURCE,
                title_detail(&input.title, input.project_id),
            ))?;
        tracing::info!(document_id = document.id, project_id = document.project_id, "Document created");
        Ok(document)
    }

    pub async fn get_document(&self, user: &User, id: i32) -> Result<Document, RequirementsError> {
        ensure_authenticated(user)?;
        self.load_document(id).await
    }

    /// `filter.parent_id` selects the project
    pub async fn list_documents(
        &self,
        user: &User,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Page<Document>, RequirementsError> {
        ensure_authenticated(user)?;
        let (items, total) = self
            .repos
            .documents
            .list(filter, page)
            .await
            .map_err(storage("list documents"))?;
        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn update_document(
        &self,
        user: &User,
        id: i32,
        patch: DocumentPatch,
    ) -> Result<Document, RequirementsError> {
        ensure_authenticated(user)?;
        let patch = validate_document_patch(patch)?;
        let current = self.load_document(id).await?;
        ensure_owner(user, &current)?;

        if let Some(title) = &patch.title {
            if *title != current.title {
                self.ensure_document_title_free(title, current.project_id)
                    .await?;
            }
        }

        let detail = title_detail(
            patch.title.as_deref().unwrap_or(&current.title),
            current.project_id,
        );
        self.repos
            .documents
            .update(id, &patch)
            .await
            .map_err(storage_or_duplicate("update document", RESOURCE, detail))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub async fn delete_document(&self, user: &User, id: i32) -> Result<(), RequirementsError> {
        ensure_authenticated(user)?;
        let current = self.load_document(id).await?;
        ensure_owner(user, &current)?;

        if !self
            .repos
            .documents
            .soft_delete(id)
            .await
            .map_err(storage("delete document"))?
        {
            return Err(RequirementsError::not_found(RESOURCE, id));
        }
        Ok(())
    }

    pub async fn restore_document(
        &self,
        user: &User,
        id: i32,
    ) -> Result<Document, RequirementsError> {
        ensure_authenticated(user)?;
        let current = self
            .repos
            .documents
            .find_by_id_with_deleted(id)
            .await
            .map_err(storage("find document"))?
            .filter(|d| d.is_deleted)
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))?;
        ensure_owner(user, &current)?;

        self.repos
            .documents
            .restore(id)
            .await
            .map_err(storage("restore document"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub(super) async fn load_document(&self, id: i32) -> Result<Document, RequirementsError> {
        self.repos
            .documents
            .find_by_id(id)
            .await
            .map_err(storage("find document"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    async fn ensure_document_title_free(
        &self,
        title: &str,
        project_id: i32,
    ) -> Result<(), RequirementsError> {
        let existing = self
            .repos
            .documents
            .find_by_title_and_project(title, project_id)
            .await
            .map_err(storage("find document by title"))?;
        if existing.is_some() {
            return Err(RequirementsError::Duplicate {
                resource: RESOURCE.to_string(),
                detail: title_detail(title, project_id),
            });
        }
        Ok(())
    }
}

fn title_detail(title: &str, project_id: i32) -> String {
    format!("title '{title}' in project {project_id}")
}
