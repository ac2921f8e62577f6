use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;
use crate::schema::users::dsl::*;
use foliotrack_core::users::{User, UserRepositoryTrait};
use foliotrack_core::Result;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_user(&self, uid: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        let user_db = users
            .find(uid)
            .first::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        User::try_from(user_db)
    }

    fn get_by_subject(&self, sub: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user_db = users
            .filter(subject.eq(sub))
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        user_db.map(User::try_from).transpose()
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let user_db: UserDB = user.into();
                let result_db = diesel::insert_into(users::table)
                    .values(&user_db)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                User::try_from(result_db)
            })
            .await
    }

    async fn update_profile(
        &self,
        uid: &str,
        new_email: Option<String>,
        new_display_name: Option<String>,
    ) -> Result<User> {
        let uid = uid.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::update(users.find(&uid))
                    .set((email.eq(new_email), display_name.eq(new_display_name)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let result_db = users
                    .find(&uid)
                    .first::<UserDB>(conn)
                    .map_err(StorageError::from)?;
                User::try_from(result_db)
            })
            .await
    }
}
