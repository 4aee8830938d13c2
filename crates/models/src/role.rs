use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::member;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub role_id: i32,
    #[sea_orm(unique)]
    pub role_name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Member,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Member => Entity::has_many(member::Entity).into() }
    }
}

impl Related<member::Entity> for Entity {
    fn to() -> RelationDef { Relation::Member.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Exact, case-sensitive match on the role name.
pub async fn find_by_name<C: ConnectionTrait>(db: &C, role_name: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::RoleName.eq(role_name)).one(db).await?)
}

/// Return the named role, inserting it first if missing.
pub async fn ensure<C: ConnectionTrait>(db: &C, role_name: &str) -> Result<Model, ModelError> {
    if role_name.trim().is_empty() { return Err(ModelError::Validation("role name required".into())); }
    if let Some(found) = find_by_name(db, role_name).await? {
        return Ok(found);
    }
    let am = ActiveModel {
        role_id: NotSet,
        role_name: Set(role_name.to_string()),
        created_at: Set(Utc::now().into()),
    };
    match am.insert(db).await.map_err(ModelError::from) {
        Ok(created) => Ok(created),
        // Lost a race with another seeder; the row exists now.
        Err(ModelError::Conflict(_)) => find_by_name(db, role_name)
            .await?
            .ok_or_else(|| ModelError::Db(format!("role {role_name} vanished after conflict"))),
        Err(e) => Err(e),
    }
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    Ok(Entity::find().count(db).await?)
}
