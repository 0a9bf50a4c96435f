//! Credential store.
//!
//! # Invariants
//! - `users.email` is unique; a duplicate insert returns `RepoError::Conflict("email")`.
//! - Callers pass emails already normalized.

use crate::db::DbError;
use crate::model::record::UserId;
use crate::model::user::{User, UserCredentials};
use crate::repo::record_repo::{timestamp_column, timestamp_value, uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT id, name, email, password_hash, created_at FROM users";

pub trait UserRepository {
    fn create_user(&self, credentials: &UserCredentials) -> RepoResult<UserId>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, credentials: &UserCredentials) -> RepoResult<UserId> {
        let user = &credentials.user;
        let inserted = self.conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.to_string(),
                user.name.as_str(),
                user.email.as_str(),
                credentials.password_hash.as_str(),
                timestamp_value(user.created_at),
            ],
        );

        match inserted {
            Ok(_) => Ok(user.id),
            Err(err) => {
                let err = DbError::from(err);
                if err.is_constraint_violation() {
                    Err(RepoError::Conflict("email"))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(UserCredentials {
                user: parse_user_row(row)?,
                password_hash: row.get("password_hash")?,
            }));
        }
        Ok(None)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: uuid_column(row, "id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: timestamp_column(row, "created_at")?,
    })
}
