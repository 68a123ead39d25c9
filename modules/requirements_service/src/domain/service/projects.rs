use super::{ensure_authenticated, ensure_owner, storage, storage_or_duplicate, Service};
use crate::contract::{
    ListFilter, NewProject, Page, PageRequest, Project, ProjectPatch, RequirementsError, User,
};
use crate::domain::validation::{validate_new_project, validate_project_patch};

const RESOURCE: &str = "Project";

impl Service {
    // ===== Project Operations =====

    pub async fn create_project(
        &self,
        user: &User,
        input: NewProject,
    ) -> Result<Project, RequirementsError> {
        ensure_authenticated(user)?;
        let input = validate_new_project(input)?;
        self.ensure_project_title_free(&input.title, user.id).await?;

        let project = self
            .repos
            .projects
            .create(user.id, &input)
            .await
            .map_err(storage_or_duplicate(
                "create project",
                RESOURCE,
                title_detail(&input.title),
            ))?;
        tracing::info!(project_id = project.id, founder_id = user.id, "Project created");
        Ok(project)
    }

    pub async fn get_project(&self, user: &User, id: i32) -> Result<Project, RequirementsError> {
        ensure_authenticated(user)?;
        self.load_project(id).await
    }

    /// `filter.parent_id` selects the founder
    pub async fn list_projects(
        &self,
        user: &User,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Page<Project>, RequirementsError> {
        ensure_authenticated(user)?;
        let (items, total) = self
            .repos
            .projects
            .list(filter, page)
            .await
            .map_err(storage("list projects"))?;
        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }

    pub async fn update_project(
        &self,
        user: &User,
        id: i32,
        patch: ProjectPatch,
    ) -> Result<Project, RequirementsError> {
        ensure_authenticated(user)?;
        let patch = validate_project_patch(patch)?;
        let current = self.load_project(id).await?;
        ensure_owner(user, &current)?;

        if let Some(title) = &patch.title {
            if *title != current.title {
                self.ensure_project_title_free(title, current.founder_id)
                    .await?;
            }
        }

        let detail = title_detail(patch.title.as_deref().unwrap_or(&current.title));
        self.repos
            .projects
            .update(id, &patch)
            .await
            .map_err(storage_or_duplicate("update project", RESOURCE, detail))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub async fn delete_project(&self, user: &User, id: i32) -> Result<(), RequirementsError> {
        ensure_authenticated(user)?;
        let current = self.load_project(id).await?;
        ensure_owner(user, &current)?;

        let deleted = self
            .repos
            .projects
            .soft_delete(id)
            .await
            .map_err(storage("delete project"))?;
        if !deleted {
            return Err(RequirementsError::not_found(RESOURCE, id));
        }
        tracing::info!(project_id = id, "Project deleted");
        Ok(())
    }

    /// Undo a soft delete
    pub async fn restore_project(&self, user: &User, id: i32) -> Result<Project, RequirementsError> {
        ensure_authenticated(user)?;
        let current = self
            .repos
            .projects
            .find_by_id_with_deleted(id)
            .await
            .map_err(storage("find project"))?
            .filter(|p| p.is_deleted)
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))?;
        ensure_owner(user, &current)?;

        self.repos
            .projects
            .restore(id)
            .await
            .map_err(storage("restore project"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    pub(super) async fn load_project(&self, id: i32) -> Result<Project, RequirementsError> {
        self.repos
            .projects
            .find_by_id(id)
            .await
            .map_err(storage("find project"))?
            .ok_or_else(|| RequirementsError::not_found(RESOURCE, id))
    }

    async fn ensure_project_title_free(
        &self,
        title: &str,
        founder_id: i32,
    ) -> Result<(), RequirementsError> {
        let existing = self
            .repos
            .projects
            .find_by_title_and_founder(title, founder_id)
            .await
            .map_err(storage("find project by title"))?;
        match existing {
            Some(_) => Err(RequirementsError::Duplicate {
                resource: RESOURCE.to_string(),
                detail: title_detail(title),
            }),
            None => Ok(()),
        }
    }
}

fn title_detail(title: &str) -> String {
    format!("title '{title}'")
}
