//! SeaORM repositories against in-memory SQLite

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{Duration, Utc};
use common::{print_test_header, sqlite_module};
use requirements_service::contract::*;
use requirements_service::domain::repository::*;
use requirements_service::infra::storage::*;
use std::sync::Arc;

async fn seed_user(users: &SeaOrmUserRepository, email: &str) -> User {
    users
        .create(&NewUser {
            email: email.to_string(),
            name: "Storage Test".to_string(),
            hashed_password: "$2b$04$placeholder".to_string(),
        })
        .await
        .expect("Failed to create user")
}

#[tokio::test]
async fn test_user_email_lookup_is_case_insensitive() {
    print_test_header("User rows are stored with lowercase email");
    let module = sqlite_module().await;
    let users = SeaOrmUserRepository::new(module.db());

    let user = seed_user(&users, "Mixed@Example.com").await;
    assert_eq!(user.email, "mixed@example.com");
    assert!(!user.is_deleted);

    let found = users
        .find_by_email("MIXED@example.COM")
        .await
        .unwrap()
        .expect("User should be found");
    assert_eq!(found.id, user.id);
    assert!(users.find_by_id(user.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_email_is_unique() {
    let module = sqlite_module().await;
    let users = SeaOrmUserRepository::new(module.db());

    seed_user(&users, "dup@example.com").await;
    let second = users
        .create(&NewUser {
            email: "dup@example.com".to_string(),
            name: "Second".to_string(),
            hashed_password: "x".to_string(),
        })
        .await;
    let err = second.expect_err("Unique constraint on email must hold");
    assert!(err.is::<UniqueViolation>(), "Expected UniqueViolation, got {err:#}");
}

#[tokio::test]
async fn test_login_attempts_window_and_clear() {
    print_test_header("Login attempts are filtered by time and cleared per email");
    let module = sqlite_module().await;
    let attempts = SeaOrmLoginAttemptRepository::new(module.db());
    let now = Utc::now();

    attempts
        .record("jane@example.com", now - Duration::minutes(30))
        .await
        .unwrap();
    attempts
        .record("jane@example.com", now - Duration::minutes(5))
        .await
        .unwrap();
    attempts.record("Jane@Example.com", now).await.unwrap();
    attempts.record("other@example.com", now).await.unwrap();

    println!("📝 Stage 1: Only recent attempts are counted");
    let recent = attempts
        .list_since("jane@example.com", now - Duration::minutes(15))
        .await
        .unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent[0] <= recent[1]);

    println!("📝 Stage 2: Clear removes only that email");
    attempts.clear("jane@example.com").await.unwrap();
    let all = attempts
        .list_since("jane@example.com", now - Duration::days(1))
        .await
        .unwrap();
    assert!(all.is_empty());
    let other = attempts
        .list_since("other@example.com", now - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(other.len(), 1);
}

#[tokio::test]
async fn test_project_soft_delete_and_restore() {
    print_test_header("Project soft delete keeps the row and restore revives it");
    let module = sqlite_module().await;
    let db = module.db();
    let users = SeaOrmUserRepository::new(db.clone());
    let projects = SeaOrmProjectRepository::new(db.clone());
    let founder = seed_user(&users, "founder@example.com").await;

    let project = projects
        .create(
            founder.id,
            &NewProject {
                title: "Storage".to_string(),
                description: Some("Persistence layer".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(project.founder_id, founder.id);
    assert!(project.deleted_at.is_none());

    println!("📝 Stage 1: Delete");
    assert!(projects.soft_delete(project.id).await.unwrap());
    assert!(!projects.soft_delete(project.id).await.unwrap());
    assert!(projects.find_by_id(project.id).await.unwrap().is_none());
    let hidden = projects
        .find_by_id_with_deleted(project.id)
        .await
        .unwrap()
        .expect("Deleted row should still exist");
    assert!(hidden.is_deleted);
    assert!(hidden.deleted_at.is_some());

    println!("📝 Stage 2: Title stays reserved while deleted");
    let reserved = projects
        .find_by_title_and_founder("Storage", founder.id)
        .await
        .unwrap();
    assert!(reserved.is_some());

    println!("📝 Stage 3: Restore");
    let restored = projects
        .restore(project.id)
        .await
        .unwrap()
        .expect("Restore should return the row");
    assert!(!restored.is_deleted);
    assert!(restored.deleted_at.is_none());
    assert!(projects.restore(project.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_project_update_and_unique_title() {
    let module = sqlite_module().await;
    let db = module.db();
    let users = SeaOrmUserRepository::new(db.clone());
    let projects = SeaOrmProjectRepository::new(db.clone());
    let founder = seed_user(&users, "founder@example.com").await;

    let project = projects
        .create(
            founder.id,
            &NewProject {
                title: "Alpha".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    let updated = projects
        .update(
            project.id,
            &ProjectPatch {
                title: None,
                description: Some("Now described".to_string()),
            },
        )
        .await
        .unwrap()
        .expect("Project should be updated");
    assert_eq!(updated.title, "Alpha");
    assert_eq!(updated.description.as_deref(), Some("Now described"));
    assert!(updated.updated_at >= project.updated_at);

    let duplicate = projects
        .create(
            founder.id,
            &NewProject {
                title: "Alpha".to_string(),
                description: None,
            },
        )
        .await;
    let err = duplicate.expect_err("Unique index on (title, founder) must hold");
    assert!(err.is::<UniqueViolation>());

    let beta = projects
        .create(
            founder.id,
            &NewProject {
                title: "Beta".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let err = projects
        .update(
            beta.id,
            &ProjectPatch {
                title: Some("Alpha".to_string()),
                description: None,
            },
        )
        .await
        .expect_err("Rename onto an existing title must fail");
    assert!(err.is::<UniqueViolation>());

    assert!(projects
        .update(999, &ProjectPatch::default())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_hierarchy_lists_filter_by_parent() {
    print_test_header("Child lists filter by parent and exclude deleted rows");
    let module = sqlite_module().await;
    let db = module.db();
    let users = SeaOrmUserRepository::new(db.clone());
    let projects = SeaOrmProjectRepository::new(db.clone());
    let documents = SeaOrmDocumentRepository::new(db.clone());
    let domains = SeaOrmDomainRepository::new(db.clone());
    let owner = seed_user(&users, "owner@example.com").await;

    let project = projects
        .create(
            owner.id,
            &NewProject {
                title: "Tree".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let doc_a = documents
        .create(
            owner.id,
            &NewDocument {
                project_id: project.id,
                title: "A".to_string(),
            },
        )
        .await
        .unwrap();
    let doc_b = documents
        .create(
            owner.id,
            &NewDocument {
                project_id: project.id,
                title: "B".to_string(),
            },
        )
        .await
        .unwrap();

    for i in 0..3 {
        domains
            .create(
                owner.id,
                &NewDomain {
                    document_id: doc_a.id,
                    name: format!("Domain {i}"),
                    description: None,
                },
            )
            .await
            .unwrap();
    }
    let under_b = domains
        .create(
            owner.id,
            &NewDomain {
                document_id: doc_b.id,
                name: "Other".to_string(),
                description: Some("Belongs to B".to_string()),
            },
        )
        .await
        .unwrap();

    println!("📝 Stage 1: Paged list under A");
    let (page, total) = domains
        .list(
            ListFilter {
                parent_id: Some(doc_a.id),
                owner_id: None,
            },
            PageRequest { page: 1, size: 2 },
        )
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|d| d.document_id == doc_a.id));

    println!("📝 Stage 2: Deleted rows drop out");
    domains.soft_delete(under_b.id).await.unwrap();
    let (rows, total) = domains
        .list(
            ListFilter {
                parent_id: Some(doc_b.id),
                owner_id: None,
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);

    let (_, all_docs) = documents
        .list(
            ListFilter {
                parent_id: Some(project.id),
                owner_id: Some(owner.id),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(all_docs, 2);

    println!("📝 Stage 3: Project filters combine");
    let other = seed_user(&users, "other@example.com").await;
    let (_, founded) = projects
        .list(
            ListFilter {
                parent_id: Some(owner.id),
                owner_id: Some(owner.id),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(founded, 1);
    let (rows, total) = projects
        .list(
            ListFilter {
                parent_id: Some(owner.id),
                owner_id: Some(other.id),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_requirement_priority_persists() {
    let module = sqlite_module().await;
    let db = module.db();
    let users = SeaOrmUserRepository::new(db.clone());
    let projects = SeaOrmProjectRepository::new(db.clone());
    let documents = SeaOrmDocumentRepository::new(db.clone());
    let domains = SeaOrmDomainRepository::new(db.clone());
    let features = SeaOrmFeatureRepository::new(db.clone());
    let requirements = SeaOrmRequirementRepository::new(Arc::clone(&db));
    let owner = seed_user(&users, "owner@example.com").await;

    let project = projects
        .create(
            owner.id,
            &NewProject {
                title: "P".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let document = documents
        .create(
            owner.id,
            &NewDocument {
                project_id: project.id,
                title: "D".to_string(),
            },
        )
        .await
        .unwrap();
    let domain = domains
        .create(
            owner.id,
            &NewDomain {
                document_id: document.id,
                name: "Dom".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let feature = features
        .create(
            owner.id,
            &NewFeature {
                domain_id: domain.id,
                name: "Feat".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    let requirement = requirements
        .create(
            owner.id,
            &NewRequirement {
                feature_id: feature.id,
                title: "Must be fast".to_string(),
                description: None,
                priority: Priority::High,
            },
        )
        .await
        .unwrap();
    assert_eq!(requirement.priority, Priority::High);

    let updated = requirements
        .update(
            requirement.id,
            &RequirementPatch {
                priority: Some(Priority::Low),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.priority, Priority::Low);

    let reloaded = requirements.find_by_id(requirement.id).await.unwrap().unwrap();
    assert_eq!(reloaded.priority, Priority::Low);
    assert_eq!(reloaded.owner_id, owner.id);
}

#[tokio::test]
async fn test_module_service_runs_on_sqlite() {
    print_test_header("Service wired by the module works end to end on SQLite");
    let module = sqlite_module().await;
    let service = module.service();

    let user = service
        .register("wired@example.com", "ValidPass1!", "Wired User")
        .await
        .unwrap();
    let token = service.login("wired@example.com", "ValidPass1!").await.unwrap();
    let me = service.current_user(&token.access_token).await.unwrap();
    assert_eq!(me.id, user.id);

    let project = service
        .create_project(
            &me,
            NewProject {
                title: "Wired".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    service.delete_project(&me, project.id).await.unwrap();
    let restored = service.restore_project(&me, project.id).await.unwrap();
    assert_eq!(restored.title, "Wired");
}

#[tokio::test]
async fn test_concurrent_registration_yields_one_duplicate() {
    print_test_header("Two registrations for one email race");
    let module = sqlite_module().await;
    let service = module.service();

    let (first, second) = tokio::join!(
        service.register("race@example.com", "ValidPass1!", "First"),
        service.register("race@example.com", "ValidPass1!", "Second"),
    );
    println!("   results: {:?} / {:?}", first.is_ok(), second.is_ok());

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(RequirementsError::Duplicate { .. }))));
}
