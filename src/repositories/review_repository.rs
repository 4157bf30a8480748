// src/repositories/review_repository.rs
//
// Review persistence. The (user_id, movie_id) uniqueness lives in the
// schema; this layer only maps rows and surfaces the constraint failure
// with enough detail for the error classifier.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::domain::paging::Page;
use crate::domain::review::Review;
use crate::error::{AppError, AppResult};

pub trait ReviewRepository: Send + Sync {
    fn insert(&self, conn: &Connection, review: &NewReview) -> AppResult<Review>;
    fn get_by_id(&self, conn: &Connection, id: i64) -> AppResult<Option<Review>>;
    fn get_by_user_and_movie(
        &self,
        conn: &Connection,
        user_id: i64,
        movie_id: i64,
    ) -> AppResult<Option<Review>>;
    fn update(
        &self,
        conn: &Connection,
        review_id: i64,
        rate: i32,
        text: Option<&str>,
        rated_at: DateTime<Utc>,
    ) -> AppResult<()>;
    fn delete_by_user_and_movie(
        &self,
        conn: &Connection,
        user_id: i64,
        movie_id: i64,
    ) -> AppResult<usize>;
    fn delete_by_movie(&self, conn: &Connection, movie_id: i64) -> AppResult<usize>;
    fn list_by_movie(&self, conn: &Connection, movie_id: i64, page: &Page)
        -> AppResult<Vec<Review>>;
    fn list_by_user(&self, conn: &Connection, user_id: i64, page: &Page) -> AppResult<Vec<Review>>;
    fn count_for_movie(&self, conn: &Connection, movie_id: i64) -> AppResult<i64>;
    fn count_with_text_for_movie(&self, conn: &Connection, movie_id: i64) -> AppResult<i64>;
    fn movie_ids_reviewed_by_user(&self, conn: &Connection, user_id: i64) -> AppResult<Vec<i64>>;
}

/// Fields for a review row about to be inserted; identity is server-assigned.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub rate: i32,
    pub text: Option<String>,
    pub rated_at: DateTime<Utc>,
    pub user_id: i64,
    pub movie_id: i64,
}

pub struct SqliteReviewRepository;

impl SqliteReviewRepository {
    pub fn new() -> Self {
        Self
    }

    fn row_to_review(row: &Row) -> Result<Review, rusqlite::Error> {
        let rated_at_str: String = row.get("rated_at")?;
        let rated_at = DateTime::parse_from_rfc3339(&rated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Review {
            id: row.get("id")?,
            rate: row.get("rate")?,
            text: row.get("text")?,
            rated_at,
            user_id: row.get("user_id")?,
            movie_id: row.get("movie_id")?,
        })
    }
}

impl Default for SqliteReviewRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewRepository for SqliteReviewRepository {
    fn insert(&self, conn: &Connection, review: &NewReview) -> AppResult<Review> {
        conn.execute(
            "INSERT INTO reviews (rate, text, rated_at, user_id, movie_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                review.rate,
                review.text,
                review.rated_at.to_rfc3339(),
                review.user_id,
                review.movie_id,
            ],
        )
        .map_err(AppError::classify_constraint)?;

        Ok(Review {
            id: conn.last_insert_rowid(),
            rate: review.rate,
            text: review.text.clone(),
            rated_at: review.rated_at,
            user_id: review.user_id,
            movie_id: review.movie_id,
        })
    }

    fn get_by_id(&self, conn: &Connection, id: i64) -> AppResult<Option<Review>> {
        let mut stmt = conn.prepare(
            "SELECT id, rate, text, rated_at, user_id, movie_id
             FROM reviews WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_review) {
            Ok(review) => Ok(Some(review)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_user_and_movie(
        &self,
        conn: &Connection,
        user_id: i64,
        movie_id: i64,
    ) -> AppResult<Option<Review>> {
        let mut stmt = conn.prepare(
            "SELECT id, rate, text, rated_at, user_id, movie_id
             FROM reviews WHERE user_id = ?1 AND movie_id = ?2",
        )?;

        match stmt.query_row(params![user_id, movie_id], Self::row_to_review) {
            Ok(review) => Ok(Some(review)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn update(
        &self,
        conn: &Connection,
        review_id: i64,
        rate: i32,
        text: Option<&str>,
        rated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        conn.execute(
            "UPDATE reviews SET rate = ?1, text = ?2, rated_at = ?3 WHERE id = ?4",
            params![rate, text, rated_at.to_rfc3339(), review_id],
        )?;

        Ok(())
    }

    fn delete_by_user_and_movie(
        &self,
        conn: &Connection,
        user_id: i64,
        movie_id: i64,
    ) -> AppResult<usize> {
        let rows_affected = conn.execute(
            "DELETE FROM reviews WHERE user_id = ?1 AND movie_id = ?2",
            params![user_id, movie_id],
        )?;
        Ok(rows_affected)
    }

    fn delete_by_movie(&self, conn: &Connection, movie_id: i64) -> AppResult<usize> {
        let rows_affected =
            conn.execute("DELETE FROM reviews WHERE movie_id = ?1", params![movie_id])?;
        Ok(rows_affected)
    }

    fn list_by_movie(
        &self,
        conn: &Connection,
        movie_id: i64,
        page: &Page,
    ) -> AppResult<Vec<Review>> {
        let mut stmt = conn.prepare(
            "SELECT id, rate, text, rated_at, user_id, movie_id
             FROM reviews
             WHERE movie_id = ?1 AND id > ?2
             ORDER BY id
             LIMIT ?3",
        )?;

        let reviews: Vec<Review> = stmt
            .query_map(params![movie_id, page.after_id, page.limit], Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    fn list_by_user(&self, conn: &Connection, user_id: i64, page: &Page) -> AppResult<Vec<Review>> {
        let mut stmt = conn.prepare(
            "SELECT id, rate, text, rated_at, user_id, movie_id
             FROM reviews
             WHERE user_id = ?1 AND id > ?2
             ORDER BY id
             LIMIT ?3",
        )?;

        let reviews: Vec<Review> = stmt
            .query_map(params![user_id, page.after_id, page.limit], Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    fn count_for_movie(&self, conn: &Connection, movie_id: i64) -> AppResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE movie_id = ?1",
            params![movie_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn count_with_text_for_movie(&self, conn: &Connection, movie_id: i64) -> AppResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE movie_id = ?1 AND text IS NOT NULL",
            params![movie_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn movie_ids_reviewed_by_user(&self, conn: &Connection, user_id: i64) -> AppResult<Vec<i64>> {
        let mut stmt =
            conn.prepare("SELECT DISTINCT movie_id FROM reviews WHERE user_id = ?1")?;

        let ids: Vec<i64> = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
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
        conn.execute_batch(
            "INSERT INTO users (username, password_hash) VALUES ('alice', 'x'), ('bob', 'y');
             INSERT INTO movies (title) VALUES ('title1'), ('title2');",
        )
        .unwrap();
        conn
    }

    fn new_review(user_id: i64, movie_id: i64, rate: i32, text: Option<&str>) -> NewReview {
        NewReview {
            rate,
            text: text.map(String::from),
            rated_at: Utc::now(),
            user_id,
            movie_id,
        }
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let conn = setup();
        let repo = SqliteReviewRepository::new();

        let review = repo
            .insert(&conn, &new_review(1, 1, 10, Some("very good")))
            .unwrap();

        let fetched = repo.get_by_id(&conn, review.id).unwrap().unwrap();
        assert_eq!(fetched.rate, 10);
        assert_eq!(fetched.text.as_deref(), Some("very good"));
        assert_eq!(fetched.user_id, 1);
        assert_eq!(fetched.movie_id, 1);

        let by_pair = repo.get_by_user_and_movie(&conn, 1, 1).unwrap().unwrap();
        assert_eq!(by_pair.id, review.id);
        assert!(repo.get_by_user_and_movie(&conn, 2, 1).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_pair_maps_to_duplicate_review() {
        let conn = setup();
        let repo = SqliteReviewRepository::new();

        repo.insert(&conn, &new_review(1, 1, 10, None)).unwrap();
        let err = repo.insert(&conn, &new_review(1, 1, 4, None)).unwrap_err();

        assert!(matches!(err, AppError::DuplicateReview));
    }

    #[test]
    fn test_update_overwrites_fields() {
        let conn = setup();
        let repo = SqliteReviewRepository::new();

        let review = repo.insert(&conn, &new_review(1, 1, 10, None)).unwrap();
        let later = Utc::now();
        repo.update(&conn, review.id, 4, Some("changed my mind"), later)
            .unwrap();

        let fetched = repo.get_by_id(&conn, review.id).unwrap().unwrap();
        assert_eq!(fetched.rate, 4);
        assert_eq!(fetched.text.as_deref(), Some("changed my mind"));
    }

    #[test]
    fn test_counts() {
        let conn = setup();
        let repo = SqliteReviewRepository::new();

        repo.insert(&conn, &new_review(1, 1, 10, Some("very good")))
            .unwrap();
        repo.insert(&conn, &new_review(2, 1, 2, None)).unwrap();

        assert_eq!(repo.count_for_movie(&conn, 1).unwrap(), 2);
        assert_eq!(repo.count_with_text_for_movie(&conn, 1).unwrap(), 1);
        assert_eq!(repo.count_for_movie(&conn, 2).unwrap(), 0);
    }

    #[test]
    fn test_list_by_movie_pages_by_id() {
        let conn = setup();
        let repo = SqliteReviewRepository::new();

        // bob reviews movie 2 as well, to prove the movie filter applies
        repo.insert(&conn, &new_review(1, 1, 5, None)).unwrap();
        repo.insert(&conn, &new_review(2, 1, 6, None)).unwrap();
        repo.insert(&conn, &new_review(2, 2, 7, None)).unwrap();

        let first = repo.list_by_movie(&conn, 1, &Page::new(0, 1)).unwrap();
        assert_eq!(first.len(), 1);

        let rest = repo
            .list_by_movie(&conn, 1, &Page::new(first[0].id, 10))
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert!(rest[0].id > first[0].id);
    }

    #[test]
    fn test_movie_ids_reviewed_by_user() {
        let conn = setup();
        let repo = SqliteReviewRepository::new();

        repo.insert(&conn, &new_review(2, 1, 5, None)).unwrap();
        repo.insert(&conn, &new_review(2, 2, 6, None)).unwrap();

        let mut ids = repo.movie_ids_reviewed_by_user(&conn, 2).unwrap();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
        assert!(repo.movie_ids_reviewed_by_user(&conn, 1).unwrap().is_empty());
    }
}
