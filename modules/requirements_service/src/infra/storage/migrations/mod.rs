//! Database migrations for requirements service

use sea_orm_migration::prelude::*;

/// Every migration lives in this file, so names are spelled out rather than derived from it
macro_rules! named_migration {
    ($name:literal) => {
        pub struct Migration;

        impl MigrationName for Migration {
            fn name(&self) -> &str {
                $name
            }
        }
    };
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_login_attempts::Migration),
            Box::new(m20250301_000003_create_projects::Migration),
            Box::new(m20250301_000004_create_documents::Migration),
            Box::new(m20250301_000005_create_domains::Migration),
            Box::new(m20250301_000006_create_features::Migration),
            Box::new(m20250301_000007_create_requirements::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    HashedPassword,
}

#[derive(DeriveIden)]
enum LoginAttempts {
    Table,
    Id,
    Email,
    AttemptTime,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    FounderId,
    Title,
    Description,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    ProjectId,
    OwnerId,
    Title,
}

#[derive(DeriveIden)]
enum Domains {
    Table,
    Id,
    DocumentId,
    OwnerId,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Features {
    Table,
    Id,
    DomainId,
    OwnerId,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Requirements {
    Table,
    Id,
    FeatureId,
    OwnerId,
    Title,
    Description,
    Priority,
}

/// Soft-delete and timestamp columns shared by every resource table
#[derive(DeriveIden)]
enum Audit {
    IsDeleted,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

fn audit_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Audit::IsDeleted)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(Audit::DeletedAt).timestamp_with_time_zone())
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Audit::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
}

fn id_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

mod m20250301_000001_create_users {
    use super::*;

    named_migration!("m20250301_000001_create_users");

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(Users::Table)
                            .if_not_exists()
                            .col(id_column(Users::Id))
                            .col(
                                ColumnDef::new(Users::Email)
                                    .string_len(100)
                                    .not_null()
                                    .unique_key(),
                            )
                            .col(ColumnDef::new(Users::Name).string_len(50).not_null())
                            .col(ColumnDef::new(Users::HashedPassword).string().not_null()),
                    )
                    .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000002_create_login_attempts {
    use super::*;

    named_migration!("m20250301_000002_create_login_attempts");

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LoginAttempts::Table)
                        .if_not_exists()
                        .col(id_column(LoginAttempts::Id))
                        .col(ColumnDef::new(LoginAttempts::Email).string().not_null())
                        .col(
                            ColumnDef::new(LoginAttempts::AttemptTime)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_login_attempts_email_time")
                        .table(LoginAttempts::Table)
                        .col(LoginAttempts::Email)
                        .col(LoginAttempts::AttemptTime)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LoginAttempts::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000003_create_projects {
    use super::*;

    named_migration!("m20250301_000003_create_projects");

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(Projects::Table)
                            .if_not_exists()
                            .col(id_column(Projects::Id))
                            .col(ColumnDef::new(Projects::FounderId).integer().not_null())
                            .col(ColumnDef::new(Projects::Title).string_len(100).not_null())
                            .col(ColumnDef::new(Projects::Description).text())
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_projects_founder")
                                    .from(Projects::Table, Projects::FounderId)
                                    .to(Users::Table, Users::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            ),
                    )
                    .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_projects_title_founder")
                        .table(Projects::Table)
                        .col(Projects::Title)
                        .col(Projects::FounderId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Projects::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000004_create_documents {
    use super::*;

    named_migration!("m20250301_000004_create_documents");

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(Documents::Table)
                            .if_not_exists()
                            .col(id_column(Documents::Id))
                            .col(ColumnDef::new(Documents::ProjectId).integer().not_null())
                            .col(ColumnDef::new(Documents::OwnerId).integer().not_null())
                            .col(ColumnDef::new(Documents::Title).string_len(200).not_null())
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_documents_project")
                                    .from(Documents::Table, Documents::ProjectId)
                                    .to(Projects::Table, Projects::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            )
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_documents_owner")
                                    .from(Documents::Table, Documents::OwnerId)
                                    .to(Users::Table, Users::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            ),
                    )
                    .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_documents_title_project")
                        .table(Documents::Table)
                        .col(Documents::Title)
                        .col(Documents::ProjectId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Documents::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000005_create_domains {
    use super::*;

    named_migration!("m20250301_000005_create_domains");

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(Domains::Table)
                            .if_not_exists()
                            .col(id_column(Domains::Id))
                            .col(ColumnDef::new(Domains::DocumentId).integer().not_null())
                            .col(ColumnDef::new(Domains::OwnerId).integer().not_null())
                            .col(ColumnDef::new(Domains::Name).string_len(200).not_null())
                            .col(ColumnDef::new(Domains::Description).text())
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_domains_document")
                                    .from(Domains::Table, Domains::DocumentId)
                                    .to(Documents::Table, Documents::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            )
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_domains_owner")
                                    .from(Domains::Table, Domains::OwnerId)
                                    .to(Users::Table, Users::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            ),
                    )
                    .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Domains::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000006_create_features {
    use super::*;

    named_migration!("m20250301_000006_create_features");

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(Features::Table)
                            .if_not_exists()
                            .col(id_column(Features::Id))
                            .col(ColumnDef::new(Features::DomainId).integer().not_null())
                            .col(ColumnDef::new(Features::OwnerId).integer().not_null())
                            .col(ColumnDef::new(Features::Name).string_len(200).not_null())
                            .col(ColumnDef::new(Features::Description).text())
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_features_domain")
                                    .from(Features::Table, Features::DomainId)
                                    .to(Domains::Table, Domains::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            )
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_features_owner")
                                    .from(Features::Table, Features::OwnerId)
                                    .to(Users::Table, Users::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            ),
                    )
                    .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Features::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000007_create_requirements {
    use super::*;

    named_migration!("m20250301_000007_create_requirements");

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    audit_columns(
                        Table::create()
                            .table(Requirements::Table)
                            .if_not_exists()
                            .col(id_column(Requirements::Id))
                            .col(ColumnDef::new(Requirements::FeatureId).integer().not_null())
                            .col(ColumnDef::new(Requirements::OwnerId).integer().not_null())
                            .col(ColumnDef::new(Requirements::Title).string_len(200).not_null())
                            .col(ColumnDef::new(Requirements::Description).text())
                            .col(
                                ColumnDef::new(Requirements::Priority)
                                    .string_len(16)
                                    .not_null()
                                    .default("MEDIUM"),
                            )
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_requirements_feature")
                                    .from(Requirements::Table, Requirements::FeatureId)
                                    .to(Features::Table, Features::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            )
                            .foreign_key(
                                ForeignKey::create()
                                    .name("fk_requirements_owner")
                                    .from(Requirements::Table, Requirements::OwnerId)
                                    .to(Users::Table, Users::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            ),
                    )
                    .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Requirements::Table).to_owned())
                .await
        }
    }
}
