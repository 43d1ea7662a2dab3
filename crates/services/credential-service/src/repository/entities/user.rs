//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Indexed but not unique; uniqueness is checked at registration
    pub username: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: Some(model.id),
            username: model.username,
            password_hash: model.password_hash,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl ActiveModel {
    /// Active model carrying every field of a domain user under `id`
    pub fn from_user(id: Uuid, user: User) -> Self {
        Self {
            id: Set(id),
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            email: Set(user.email),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
