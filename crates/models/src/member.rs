use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{organization, role, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub member_id: i32,
    pub org_id: i32,
    pub role_id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub password_algorithm: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Organization,
    Role,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Organization => Entity::belongs_to(organization::Entity)
                .from(Column::OrgId)
                .to(organization::Column::OrgId)
                .into(),
            Relation::Role => Entity::belongs_to(role::Entity)
                .from(Column::RoleId)
                .to(role::Column::RoleId)
                .into(),
        }
    }
}

impl Related<organization::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organization.def() }
}

impl Related<role::Entity> for Entity {
    fn to() -> RelationDef { Relation::Role.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload; the password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewMember<'a> {
    pub org_id: i32,
    pub role_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub password_algorithm: &'a str,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewMember<'_>) -> Result<Model, ModelError> {
    validation::validate_email(new.email)?;
    validation::validate_name(new.name)?;
    if new.password_hash.trim().is_empty() { return Err(ModelError::Validation("password hash required".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        member_id: NotSet,
        org_id: Set(new.org_id),
        role_id: Set(new.role_id),
        name: Set(new.name.to_string()),
        email: Set(new.email.to_string()),
        password_hash: Set(new.password_hash.to_string()),
        password_algorithm: Set(new.password_algorithm.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn exists_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<bool, ModelError> {
    let n = Entity::find().filter(Column::Email.eq(email)).count(db).await?;
    Ok(n > 0)
}

/// Member plus its role row, for credential checks.
pub async fn find_by_email_with_role<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<(Model, Option<role::Model>)>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .find_also_related(role::Entity)
        .one(db)
        .await?)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    Ok(Entity::find().count(db).await?)
}
