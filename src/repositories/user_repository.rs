// src/repositories/user_repository.rs

use rusqlite::{params, Connection, Row};

use crate::domain::paging::Page;
use crate::domain::user::User;
use crate::error::{AppError, AppResult};

pub trait UserRepository: Send + Sync {
    fn insert(&self, conn: &Connection, username: &str, password_hash: &str) -> AppResult<User>;
    fn get_by_id(&self, conn: &Connection, id: i64) -> AppResult<Option<User>>;
    fn get_by_username(&self, conn: &Connection, username: &str) -> AppResult<Option<User>>;
    fn list(&self, conn: &Connection, page: &Page) -> AppResult<Vec<User>>;
    fn delete(&self, conn: &Connection, id: i64) -> AppResult<usize>;
}

pub struct SqliteUserRepository;

impl SqliteUserRepository {
    pub fn new() -> Self {
        Self
    }

    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
        })
    }
}

impl Default for SqliteUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for SqliteUserRepository {
    fn insert(&self, conn: &Connection, username: &str, password_hash: &str) -> AppResult<User> {
        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash],
        )
        .map_err(AppError::classify_constraint)?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    fn get_by_id(&self, conn: &Connection, id: i64) -> AppResult<Option<User>> {
        let mut stmt =
            conn.prepare("SELECT id, username, password_hash FROM users WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_username(&self, conn: &Connection, username: &str) -> AppResult<Option<User>> {
        let mut stmt =
            conn.prepare("SELECT id, username, password_hash FROM users WHERE username = ?1")?;

        match stmt.query_row(params![username], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list(&self, conn: &Connection, page: &Page) -> AppResult<Vec<User>> {
        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash
             FROM users
             WHERE id > ?1
             ORDER BY id
             LIMIT ?2",
        )?;

        let users: Vec<User> = stmt
            .query_map(params![page.after_id, page.limit], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn delete(&self, conn: &Connection, id: i64) -> AppResult<usize> {
        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;
    use crate::db::migrations::initialize_database;

    fn setup() -> Connection {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_lookup() {
        let conn = setup();
        let repo = SqliteUserRepository::new();

        let user = repo.insert(&conn, "alice", "hash").unwrap();
        assert_eq!(repo.get_by_id(&conn, user.id).unwrap().unwrap(), user);
        assert_eq!(
            repo.get_by_username(&conn, "alice").unwrap().unwrap().id,
            user.id
        );
        assert!(repo.get_by_username(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_maps_to_duplicate_identity() {
        let conn = setup();
        let repo = SqliteUserRepository::new();

        repo.insert(&conn, "alice", "hash").unwrap();
        let err = repo.insert(&conn, "alice", "other").unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity));
    }

    #[test]
    fn test_list_pages_by_id() {
        let conn = setup();
        let repo = SqliteUserRepository::new();

        for name in ["a", "b", "c"] {
            repo.insert(&conn, name, "hash").unwrap();
        }

        let page = repo.list(&conn, &Page::new(1, 10)).unwrap();
        let names: Vec<&str> = page.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_delete_cascades_to_reviews() {
        let conn = setup();
        let repo = SqliteUserRepository::new();

        let user = repo.insert(&conn, "alice", "hash").unwrap();
        conn.execute("INSERT INTO movies (title) VALUES ('title1')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO reviews (rate, text, rated_at, user_id, movie_id)
             VALUES (5, NULL, datetime('now'), ?1, 1)",
            [user.id],
        )
        .unwrap();

        assert_eq!(repo.delete(&conn, user.id).unwrap(), 1);

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
