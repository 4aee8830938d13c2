use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::member;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub org_id: i32,
    pub org_name: String,
    pub org_email: String,
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

pub async fn create<C: ConnectionTrait>(db: &C, org_name: &str, org_email: &str) -> Result<Model, ModelError> {
    if org_name.trim().is_empty() { return Err(ModelError::Validation("organization name required".into())); }
    if org_email.trim().is_empty() { return Err(ModelError::Validation("organization email required".into())); }
    let am = ActiveModel {
        org_id: NotSet,
        org_name: Set(org_name.to_string()),
        org_email: Set(org_email.to_string()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    Ok(Entity::find().count(db).await?)
}
