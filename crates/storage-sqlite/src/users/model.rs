//! Database model for users.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use foliotrack_core::errors::{Error, ValidationError};
use foliotrack_core::users::User;

/// Database model for users
#[derive(
    Queryable,
    Insertable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct UserDB {
    pub id: String,
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: String,
}

impl TryFrom<UserDB> for User {
    type Error = Error;

    fn try_from(db: UserDB) -> Result<Self, Error> {
        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&db.created_at)
            .map_err(ValidationError::DateTimeParse)?
            .with_timezone(&Utc);
        Ok(Self {
            id: db.id,
            subject: db.subject,
            email: db.email,
            display_name: db.display_name,
            created_at,
        })
    }
}

impl From<User> for UserDB {
    fn from(domain: User) -> Self {
        Self {
            id: domain.id,
            subject: domain.subject,
            email: domain.email,
            display_name: domain.display_name,
            created_at: domain.created_at.to_rfc3339(),
        }
    }
}
