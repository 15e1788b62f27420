use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Principal recorded in `created_by` / `updated_by`.
pub const AUDITOR: &str = "system";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sea_orm(column_name = "phone_number")]
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: String,
    pub updated_by: String,
    pub is_deleted: bool,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Audit stamping on every `insert` / `update` that goes through the active model.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now: DateTimeWithTimeZone = Utc::now().into();
        if insert {
            self.created_at = Set(now);
            self.created_by = Set(AUDITOR.to_string());
            self.is_deleted = Set(false);
            self.version = Set(0);
        }
        self.updated_at = Set(now);
        self.updated_by = Set(AUDITOR.to_string());
        Ok(self)
    }
}

/// The five business columns; everything else is owned by storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Fields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// All live (not soft-deleted) customers, oldest first.
pub async fn find_all_live(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn exists_by_email(db: &DatabaseConnection, email: &str) -> Result<bool, errors::ModelError> {
    let n = Entity::find()
        .filter(Column::Email.eq(email))
        .filter(Column::IsDeleted.eq(false))
        .count(db)
        .await?;
    Ok(n > 0)
}

/// Insert a new row. A duplicate live email surfaces as `ModelError::UniqueViolation`
/// from the partial unique index.
pub async fn insert(db: &DatabaseConnection, fields: Fields) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        first_name: Set(fields.first_name),
        last_name: Set(fields.last_name),
        email: Set(fields.email),
        phone: Set(fields.phone),
        address: Set(fields.address),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Overwrite the business columns of row `id`, but only if it is still at
/// `expected_version`. Bumps `version` and the update stamps in the same statement.
pub async fn update(
    db: &DatabaseConnection,
    id: i64,
    expected_version: i64,
    fields: Fields,
) -> Result<Model, errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let rows = Entity::update_many()
        .col_expr(Column::FirstName, Expr::value(fields.first_name))
        .col_expr(Column::LastName, Expr::value(fields.last_name))
        .col_expr(Column::Email, Expr::value(fields.email))
        .col_expr(Column::Phone, Expr::value(fields.phone))
        .col_expr(Column::Address, Expr::value(fields.address))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .col_expr(Column::UpdatedBy, Expr::value(AUDITOR))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Id.eq(id))
        .filter(Column::Version.eq(expected_version))
        .exec_with_returning(db)
        .await?;
    rows.into_iter().next().ok_or(errors::ModelError::StaleVersion { id })
}

/// Remove row `id` for good. Returns whether a row was removed.
pub async fn hard_delete(db: &DatabaseConnection, id: i64) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
