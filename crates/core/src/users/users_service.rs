use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::{Result, ValidationError};
use crate::users::users_model::User;
use crate::users::users_traits::{UserRepositoryTrait, UserServiceTrait};

/// Service for user accounts.
pub struct UserService {
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { user_repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_user(&self, user_id: &str) -> Result<User> {
        self.user_repository.get_user(user_id)
    }

    async fn ensure_user(
        &self,
        subject: &str,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Result<User> {
        if subject.trim().is_empty() {
            return Err(ValidationError::MissingField("subject".to_string()).into());
        }

        match self.user_repository.get_by_subject(subject)? {
            Some(existing) => {
                if existing.email == email && existing.display_name == display_name {
                    return Ok(existing);
                }
                self.user_repository
                    .update_profile(&existing.id, email, display_name)
                    .await
            }
            None => {
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    subject: subject.to_string(),
                    email,
                    display_name,
                    created_at: Utc::now(),
                };
                self.user_repository.insert_user(user).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryUserRepository {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepositoryTrait for MemoryUserRepository {
        fn get_user(&self, user_id: &str) -> Result<User> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
        }

        fn get_by_subject(&self, subject: &str) -> Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.subject == subject)
                .cloned())
        }

        async fn insert_user(&self, user: User) -> Result<User> {
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn update_profile(
            &self,
            user_id: &str,
            email: Option<String>,
            display_name: Option<String>,
        ) -> Result<User> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;
            user.email = email;
            user.display_name = display_name;
            Ok(user.clone())
        }
    }

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserRepository::default()))
    }

    #[tokio::test]
    async fn first_login_creates_the_account() {
        let service = service();
        let user = service
            .ensure_user("auth0|abc", Some("a@b.de".to_string()), None)
            .await
            .unwrap();
        assert_eq!(user.subject, "auth0|abc");
        assert_eq!(service.get_user(&user.id).unwrap(), user);
    }

    #[tokio::test]
    async fn repeat_login_reuses_the_account() {
        let service = service();
        let first = service
            .ensure_user("auth0|abc", Some("a@b.de".to_string()), None)
            .await
            .unwrap();
        let second = service
            .ensure_user("auth0|abc", Some("a@b.de".to_string()), None)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn changed_claims_refresh_the_profile() {
        let service = service();
        let first = service
            .ensure_user("auth0|abc", Some("a@b.de".to_string()), None)
            .await
            .unwrap();
        let second = service
            .ensure_user(
                "auth0|abc",
                Some("new@b.de".to_string()),
                Some("Alex".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.email.as_deref(), Some("new@b.de"));
        assert_eq!(second.display_name.as_deref(), Some("Alex"));
    }

    #[tokio::test]
    async fn empty_subject_is_rejected() {
        let service = service();
        assert!(service.ensure_user("  ", None, None).await.is_err());
    }
}
