use async_trait::async_trait;

use crate::errors::Result;
use crate::users::users_model::User;

/// Trait for the user store.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<User>;
    fn get_by_subject(&self, subject: &str) -> Result<Option<User>>;
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn update_profile(
        &self,
        user_id: &str,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Result<User>;
}

/// Trait for user operations.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<User>;

    /// Upsert on login: creates the account on first sign-in, refreshes
    /// the profile claims on every later one.
    async fn ensure_user(
        &self,
        subject: &str,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Result<User>;
}
