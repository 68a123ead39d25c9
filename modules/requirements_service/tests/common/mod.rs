//! Common test utilities: in-memory repositories and a SQLite-backed app

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use requirements_service::contract::*;
use requirements_service::domain::repository::*;
use requirements_service::domain::{AuthSettings, Repositories, Service};
use requirements_service::{Config, RequirementsServiceModule};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

pub fn print_test_header(name: &str) {
    println!("\n{}", "=".repeat(70));
    println!("🧪 {}", name);
    println!("{}", "=".repeat(70));
}

/// Cheapest cost bcrypt accepts
pub const TEST_HASH_COST: u32 = 4;

/// Service configuration with a cheap bcrypt cost
pub fn test_config() -> Config {
    Config {
        jwt_secret: "test-secret".to_string(),
        password_hash_cost: TEST_HASH_COST,
        ..Config::default()
    }
}

/// Module backed by a fresh in-memory SQLite database
pub async fn sqlite_module() -> RequirementsServiceModule {
    let db = requirements_service::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory SQLite");
    RequirementsServiceModule::init(test_config(), db)
        .await
        .expect("Failed to initialize module")
}

/// Service over in-memory mock repositories
pub fn mock_service() -> (Service, MockRepos) {
    let repos = MockRepos::default();
    let service = Service::new(
        repos.as_repositories(),
        AuthSettings::from_config(&test_config()).expect("Test config is valid"),
    );
    (service, repos)
}

#[derive(Clone, Default)]
pub struct MockRepos {
    pub users: Arc<mocks::MockUserRepository>,
    pub login_attempts: Arc<mocks::MockLoginAttemptRepository>,
    pub projects: Arc<mocks::MockTable<Project>>,
    pub documents: Arc<mocks::MockTable<Document>>,
    pub domains: Arc<mocks::MockTable<Domain>>,
    pub features: Arc<mocks::MockTable<Feature>>,
    pub requirements: Arc<mocks::MockTable<Requirement>>,
}

impl MockRepos {
    pub fn as_repositories(&self) -> Repositories {
        Repositories {
            users: self.users.clone(),
            login_attempts: self.login_attempts.clone(),
            projects: self.projects.clone(),
            documents: self.documents.clone(),
            domains: self.domains.clone(),
            features: self.features.clone(),
            requirements: self.requirements.clone(),
        }
    }
}

pub mod mocks {
    use super::*;

    // ===== Users =====

    #[derive(Default)]
    pub struct MockUserRepository {
        users: RwLock<HashMap<i32, User>>,
        next_id: AtomicI32,
    }

    impl MockUserRepository {
        pub fn count(&self) -> usize {
            self.users.read().len()
        }

        pub fn mark_deleted(&self, id: i32) {
            if let Some(u) = self.users.write().get_mut(&id) {
                u.is_deleted = true;
            }
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create(&self, user: &NewUser) -> Result<User> {
            let email = user.email.to_lowercase();
            let mut users = self.users.write();
            // Mirrors the unique index, which also covers deleted accounts
            if users.values().any(|u| u.email == email) {
                return Err(UniqueViolation.into());
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let now = Utc::now();
            let user = User {
                id,
                email,
                name: user.name.clone(),
                hashed_password: user.hashed_password.clone(),
                is_deleted: false,
                created_at: now,
                updated_at: now,
            };
            users.insert(id, user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
            Ok(self.users.read().get(&id).filter(|u| !u.is_deleted).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
            let email = email.to_lowercase();
            Ok(self
                .users
                .read()
                .values()
                .find(|u| u.email == email && !u.is_deleted)
                .cloned())
        }
    }

    // ===== Login attempts =====

    #[derive(Default)]
    pub struct MockLoginAttemptRepository {
        attempts: RwLock<Vec<(String, DateTime<Utc>)>>,
    }

    impl MockLoginAttemptRepository {
        pub fn count_for(&self, email: &str) -> usize {
            self.attempts.read().iter().filter(|(e, _)| e == email).count()
        }

        /// Insert an attempt with an arbitrary timestamp
        pub fn seed(&self, email: &str, at: DateTime<Utc>) {
            self.attempts.write().push((email.to_string(), at));
        }
    }

    #[async_trait]
    impl LoginAttemptRepository for MockLoginAttemptRepository {
        async fn record(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
            self.seed(email, at);
            Ok(())
        }

        async fn list_since(&self, email: &str, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
            let mut times: Vec<_> = self
                .attempts
                .read()
                .iter()
                .filter(|(e, t)| e == email && *t >= since)
                .map(|(_, t)| *t)
                .collect();
            times.sort();
            Ok(times)
        }

        async fn clear(&self, email: &str) -> Result<()> {
            self.attempts.write().retain(|(e, _)| e != email);
            Ok(())
        }
    }

    // ===== Hierarchy tables =====

    /// Row behavior shared by the soft-deletable resources
    pub trait Row: Clone + Send + Sync {
        fn id(&self) -> i32;
        fn parent_id(&self) -> i32;
        fn owner(&self) -> i32;
        fn deleted(&self) -> bool;
        fn set_deleted(&mut self, deleted: bool, at: Option<DateTime<Utc>>);
        fn touch(&mut self, at: DateTime<Utc>);
    }

    macro_rules! impl_row {
        ($ty:ty, $parent:ident, $owner:ident) => {
            impl Row for $ty {
                fn id(&self) -> i32 {
                    self.id
                }
                fn parent_id(&self) -> i32 {
                    self.$parent
                }
                fn owner(&self) -> i32 {
                    self.$owner
                }
                fn deleted(&self) -> bool {
                    self.is_deleted
                }
                fn set_deleted(&mut self, deleted: bool, at: Option<DateTime<Utc>>) {
                    self.is_deleted = deleted;
                    self.deleted_at = at;
                }
                fn touch(&mut self, at: DateTime<Utc>) {
                    self.updated_at = at;
                }
            }
        };
    }

    impl_row!(Project, founder_id, founder_id);
    impl_row!(Document, project_id, owner_id);
    impl_row!(Domain, document_id, owner_id);
    impl_row!(Feature, domain_id, owner_id);
    impl_row!(Requirement, feature_id, owner_id);

    pub struct MockTable<T> {
        rows: RwLock<Vec<T>>,
        next_id: AtomicI32,
    }

    impl<T> Default for MockTable<T> {
        fn default() -> Self {
            Self {
                rows: RwLock::new(Vec::new()),
                next_id: AtomicI32::new(0),
            }
        }
    }

    impl<T: Row> MockTable<T> {
        pub fn len(&self) -> usize {
            self.rows.read().len()
        }

        fn insert(&self, build: impl FnOnce(i32, DateTime<Utc>) -> T) -> T {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let row = build(id, Utc::now());
            self.rows.write().push(row.clone());
            row
        }

        fn get(&self, id: i32, with_deleted: bool) -> Option<T> {
            self.rows
                .read()
                .iter()
                .find(|r| r.id() == id && (with_deleted || !r.deleted()))
                .cloned()
        }

        fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
            self.rows.read().iter().find(|r| pred(r)).cloned()
        }

        fn list(&self, filter: ListFilter, page: PageRequest) -> (Vec<T>, u64) {
            let rows = self.rows.read();
            let matching: Vec<T> = rows
                .iter()
                .filter(|r| !r.deleted())
                .filter(|r| filter.parent_id.map_or(true, |p| r.parent_id() == p))
                .filter(|r| filter.owner_id.map_or(true, |o| r.owner() == o))
                .cloned()
                .collect();
            let total = matching.len() as u64;
            let items = matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.size as usize)
                .collect();
            (items, total)
        }

        fn update(&self, id: i32, apply: impl FnOnce(&mut T)) -> Option<T> {
            let mut rows = self.rows.write();
            let row = rows.iter_mut().find(|r| r.id() == id && !r.deleted())?;
            apply(row);
            row.touch(Utc::now());
            Some(row.clone())
        }

        fn soft_delete(&self, id: i32) -> bool {
            let mut rows = self.rows.write();
            match rows.iter_mut().find(|r| r.id() == id && !r.deleted()) {
                Some(row) => {
                    let now = Utc::now();
                    row.set_deleted(true, Some(now));
                    row.touch(now);
                    true
                }
                None => false,
            }
        }

        fn restore(&self, id: i32) -> Option<T> {
            let mut rows = self.rows.write();
            let row = rows.iter_mut().find(|r| r.id() == id && r.deleted())?;
            row.set_deleted(false, None);
            row.touch(Utc::now());
            Some(row.clone())
        }
    }

    #[async_trait]
    impl ProjectRepository for MockTable<Project> {
        async fn create(&self, founder_id: i32, p: &NewProject) -> Result<Project> {
            Ok(self.insert(|id, now| Project {
                id,
                founder_id,
                title: p.title.clone(),
                description: p.description.clone(),
                is_deleted: false,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        }
        async fn find_by_id(&self, id: i32) -> Result<Option<Project>> {
            Ok(self.get(id, false))
        }
        async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Project>> {
            Ok(self.get(id, true))
        }
        async fn find_by_title_and_founder(&self, title: &str, founder_id: i32) -> Result<Option<Project>> {
            Ok(self.find(|p| p.title == title && p.founder_id == founder_id))
        }
        async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Project>, u64)> {
            Ok(MockTable::list(self, filter, page))
        }
        async fn update(&self, id: i32, patch: &ProjectPatch) -> Result<Option<Project>> {
            Ok(MockTable::update(self, id, |p| {
                if let Some(t) = &patch.title {
                    p.title = t.clone();
                }
                if let Some(d) = &patch.description {
                    p.description = Some(d.clone());
                }
            }))
        }
        async fn soft_delete(&self, id: i32) -> Result<bool> {
            Ok(MockTable::soft_delete(self, id))
        }
        async fn restore(&self, id: i32) -> Result<Option<Project>> {
            Ok(MockTable::restore(self, id))
        }
    }

    #[async_trait]
    impl DocumentRepository for MockTable<Document> {
        async fn create(&self, owner_id: i32, d: &NewDocument) -> Result<Document> {
            Ok(self.insert(|id, now| Document {
                id,
                project_id: d.project_id,
                owner_id,
                title: d.title.clone(),
                is_deleted: false,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        }
        async fn find_by_id(&self, id: i32) -> Result<Option<Document>> {
            Ok(self.get(id, false))
        }
        async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Document>> {
            Ok(self.get(id, true))
        }
        async fn find_by_title_and_project(&self, title: &str, project_id: i32) -> Result<Option<Document>> {
            Ok(self.find(|d| d.title == title && d.project_id == project_id))
        }
        async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Document>, u64)> {
            Ok(MockTable::list(self, filter, page))
        }
        async fn update(&self, id: i32, patch: &DocumentPatch) -> Result<Option<Document>> {
            Ok(MockTable::update(self, id, |d| {
                if let Some(t) = &patch.title {
                    d.title = t.clone();
                }
            }))
        }
        async fn soft_delete(&self, id: i32) -> Result<bool> {
            Ok(MockTable::soft_delete(self, id))
        }
        async fn restore(&self, id: i32) -> Result<Option<Document>> {
            Ok(MockTable::restore(self, id))
        }
    }

    #[async_trait]
    impl DomainRepository for MockTable<Domain> {
        async fn create(&self, owner_id: i32, d: &NewDomain) -> Result<Domain> {
            Ok(self.insert(|id, now| Domain {
                id,
                document_id: d.document_id,
                owner_id,
                name: d.name.clone(),
                description: d.description.clone(),
                is_deleted: false,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        }
        async fn find_by_id(&self, id: i32) -> Result<Option<Domain>> {
            Ok(self.get(id, false))
        }
        async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Domain>> {
            Ok(self.get(id, true))
        }
        async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Domain>, u64)> {
            Ok(MockTable::list(self, filter, page))
        }
        async fn update(&self, id: i32, patch: &DomainPatch) -> Result<Option<Domain>> {
            Ok(MockTable::update(self, id, |d| {
                if let Some(n) = &patch.name {
                    d.name = n.clone();
                }
                if let Some(desc) = &patch.description {
                    d.description = Some(desc.clone());
                }
            }))
        }
        async fn soft_delete(&self, id: i32) -> Result<bool> {
            Ok(MockTable::soft_delete(self, id))
        }
        async fn restore(&self, id: i32) -> Result<Option<Domain>> {
            Ok(MockTable::restore(self, id))
        }
    }

    #[async_trait]
    impl FeatureRepository for MockTable<Feature> {
        async fn create(&self, owner_id: i32, f: &NewFeature) -> Result<Feature> {
            Ok(self.insert(|id, now| Feature {
                id,
                domain_id: f.domain_id,
                owner_id,
                name: f.name.clone(),
                description: f.description.clone(),
                is_deleted: false,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        }
        async fn find_by_id(&self, id: i32) -> Result<Option<Feature>> {
            Ok(self.get(id, false))
        }
        async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Feature>> {
            Ok(self.get(id, true))
        }
        async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Feature>, u64)> {
            Ok(MockTable::list(self, filter, page))
        }
        async fn update(&self, id: i32, patch: &FeaturePatch) -> Result<Option<Feature>> {
            Ok(MockTable::update(self, id, |f| {
                if let Some(n) = &patch.name {
                    f.name = n.clone();
                }
                if let Some(desc) = &patch.description {
                    f.description = Some(desc.clone());
                }
            }))
        }
        async fn soft_delete(&self, id: i32) -> Result<bool> {
            Ok(MockTable::soft_delete(self, id))
        }
        async fn restore(&self, id: i32) -> Result<Option<Feature>> {
            Ok(MockTable::restore(self, id))
        }
    }

    #[async_trait]
    impl RequirementRepository for MockTable<Requirement> {
        async fn create(&self, owner_id: i32, r: &NewRequirement) -> Result<Requirement> {
            Ok(self.insert(|id, now| Requirement {
                id,
                feature_id: r.feature_id,
                owner_id,
                title: r.title.clone(),
                description: r.description.clone(),
                priority: r.priority,
                is_deleted: false,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            }))
        }
        async fn find_by_id(&self, id: i32) -> Result<Option<Requirement>> {
            Ok(self.get(id, false))
        }
        async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Requirement>> {
            Ok(self.get(id, true))
        }
        async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Requirement>, u64)> {
            Ok(MockTable::list(self, filter, page))
        }
        async fn update(&self, id: i32, patch: &RequirementPatch) -> Result<Option<Requirement>> {
            Ok(MockTable::update(self, id, |r| {
                if let Some(t) = &patch.title {
                    r.title = t.clone();
                }
                if let Some(d) = &patch.description {
                    r.description = Some(d.clone());
                }
                if let Some(p) = patch.priority {
                    r.priority = p;
                }
                if let Some(f) = patch.feature_id {
                    r.feature_id = f;
                }
            }))
        }
        async fn soft_delete(&self, id: i32) -> Result<bool> {
            Ok(MockTable::soft_delete(self, id))
        }
        async fn restore(&self, id: i32) -> Result<Option<Requirement>> {
            Ok(MockTable::restore(self, id))
        }
    }
}
