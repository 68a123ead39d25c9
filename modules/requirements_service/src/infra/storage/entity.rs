//! SeaORM entities for database tables

/// Registered accounts
pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        /// Lowercase, unique
        #[sea_orm(unique)]
        pub email: String,

        pub name: String,

        pub hashed_password: String,

        pub is_deleted: bool,

        pub deleted_at: Option<DateTimeUtc>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::project::Entity")]
        Projects,
    }

    impl Related<super::project::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Projects.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Failed login attempts, keyed by email
pub mod login_attempt {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "login_attempts")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub email: String,

        pub attempt_time: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod project {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "projects")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub founder_id: i32,

        /// Unique per founder
        pub title: String,

        pub description: Option<String>,

        pub is_deleted: bool,

        pub deleted_at: Option<DateTimeUtc>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::FounderId",
            to = "super::user::Column::Id"
        )]
        Founder,
        #[sea_orm(has_many = "super::document::Entity")]
        Documents,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Founder.def()
        }
    }

    impl Related<super::document::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Documents.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod document {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "documents")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub project_id: i32,

        pub owner_id: i32,

        /// Unique per project
        pub title: String,

        pub is_deleted: bool,

        pub deleted_at: Option<DateTimeUtc>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::project::Entity",
            from = "Column::ProjectId",
            to = "super::project::Column::Id"
        )]
        Project,
        #[sea_orm(has_many = "super::domain::Entity")]
        Domains,
    }

    impl Related<super::project::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Project.def()
        }
    }

    impl Related<super::domain::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Domains.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod domain {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "domains")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub document_id: i32,

        pub owner_id: i32,

        pub name: String,

        pub description: Option<String>,

        pub is_deleted: bool,

        pub deleted_at: Option<DateTimeUtc>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::document::Entity",
            from = "Column::DocumentId",
            to = "super::document::Column::Id"
        )]
        Document,
        #[sea_orm(has_many = "super::feature::Entity")]
        Features,
    }

    impl Related<super::document::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Document.def()
        }
    }

    impl Related<super::feature::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Features.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod feature {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "features")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub domain_id: i32,

        pub owner_id: i32,

        pub name: String,

        pub description: Option<String>,

        pub is_deleted: bool,

        pub deleted_at: Option<DateTimeUtc>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::domain::Entity",
            from = "Column::DomainId",
            to = "super::domain::Column::Id"
        )]
        Domain,
        #[sea_orm(has_many = "super::requirement::Entity")]
        Requirements,
    }

    impl Related<super::domain::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Domain.def()
        }
    }

    impl Related<super::requirement::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Requirements.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod requirement {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "requirements")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub feature_id: i32,

        pub owner_id: i32,

        pub title: String,

        pub description: Option<String>,

        /// LOW, MEDIUM, HIGH or CRITICAL
        pub priority: String,

        pub is_deleted: bool,

        pub deleted_at: Option<DateTimeUtc>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::feature::Entity",
            from = "Column::FeatureId",
            to = "super::feature::Column::Id"
        )]
        Feature,
    }

    impl Related<super::feature::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Feature.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
