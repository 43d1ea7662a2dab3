//! User repository - persistence contract and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::AppResult;
use domain::{User, UserField};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Storage does not enforce username uniqueness; the credential service
/// checks it before registering.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a user. Assigns an identifier on first store; later stores of
    /// an identified user overwrite the existing record.
    async fn store(&self, user: User) -> AppResult<User>;

    /// Find user by ID
    async fn get(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find the first user whose `field` equals `value`
    async fn find_one(&self, field: UserField, value: &str) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn column(field: UserField) -> user::Column {
        match field {
            UserField::Username => user::Column::Username,
            UserField::Email => user::Column::Email,
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn store(&self, user: User) -> AppResult<User> {
        let model = match user.id {
            None => {
                ActiveModel::from_user(Uuid::new_v4(), user)
                    .insert(&self.db)
                    .await?
            }
            Some(id) => {
                let exists = UserEntity::find_by_id(id).one(&self.db).await?.is_some();
                let active = ActiveModel::from_user(id, user);

                if exists {
                    active.update(&self.db).await?
                } else {
                    active.insert(&self.db).await?
                }
            }
        };

        Ok(User::from(model))
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_one(&self, field: UserField, value: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(Self::column(field).eq(value))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }
}
