// src/repositories/movie_repository.rs
//
// Movie persistence, including the derived avg_rating column.

use rusqlite::{params, Connection, Row, ToSql};

use crate::domain::movie::{Movie, MovieDraft};
use crate::domain::paging::MovieQuery;
use crate::error::{AppError, AppResult};

pub trait MovieRepository: Send + Sync {
    fn insert(&self, conn: &Connection, draft: &MovieDraft) -> AppResult<Movie>;
    fn get_by_id(&self, conn: &Connection, id: i64) -> AppResult<Option<Movie>>;
    fn get_by_title(&self, conn: &Connection, title: &str) -> AppResult<Option<Movie>>;
    fn list(&self, conn: &Connection, query: &MovieQuery) -> AppResult<Vec<Movie>>;
    fn delete(&self, conn: &Connection, id: i64) -> AppResult<usize>;

    /// Recompute `avg_rating` from a fresh read of the movie's review rows:
    /// the arithmetic mean of `rate`, or 0.0 when no reviews exist. Writes
    /// the value back and returns it. Idempotent; a no-op over zero movie
    /// rows when the movie was concurrently deleted.
    fn recompute_avg_rating(&self, conn: &Connection, movie_id: i64) -> AppResult<f64>;
}

pub struct SqliteMovieRepository;

impl SqliteMovieRepository {
    pub fn new() -> Self {
        Self
    }

    fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
        Ok(Movie {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            release_year: row.get("release_year")?,
            avg_rating: row.get("avg_rating")?,
        })
    }
}

impl Default for SqliteMovieRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieRepository for SqliteMovieRepository {
    fn insert(&self, conn: &Connection, draft: &MovieDraft) -> AppResult<Movie> {
        conn.execute(
            "INSERT INTO movies (title, description, release_year) VALUES (?1, ?2, ?3)",
            params![draft.title, draft.description, draft.release_year],
        )
        .map_err(AppError::classify_constraint)?;

        let id = conn.last_insert_rowid();

        Ok(Movie {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            release_year: draft.release_year,
            avg_rating: 0.0,
        })
    }

    fn get_by_id(&self, conn: &Connection, id: i64) -> AppResult<Option<Movie>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, description, release_year, avg_rating
             FROM movies WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_title(&self, conn: &Connection, title: &str) -> AppResult<Option<Movie>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, description, release_year, avg_rating
             FROM movies WHERE title = ?1",
        )?;

        match stmt.query_row(params![title], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list(&self, conn: &Connection, query: &MovieQuery) -> AppResult<Vec<Movie>> {
        // The cursor bound and the score bound always apply; the remaining
        // filters AND in only when set. Placeholders are sequential, so SQL
        // and parameter list are built in lockstep.
        let mut sql = String::from(
            "SELECT id, title, description, release_year, avg_rating
             FROM movies WHERE id > ? AND avg_rating < ?",
        );

        let before_score = query.before_score();
        let like_pattern = query.title_contains.as_ref().map(|s| format!("%{}%", s));

        let mut sql_params: Vec<&dyn ToSql> = vec![&query.page.after_id, &before_score];

        if let Some(year) = &query.release_year {
            sql.push_str(" AND release_year = ?");
            sql_params.push(year);
        }
        if let Some(pattern) = &like_pattern {
            sql.push_str(" AND title LIKE ?");
            sql_params.push(pattern);
        }

        if query.sort_by_avg_rating {
            sql.push_str(" ORDER BY avg_rating DESC, id ASC");
        } else {
            sql.push_str(" ORDER BY id ASC");
        }

        sql.push_str(" LIMIT ?");
        sql_params.push(&query.page.limit);

        let mut stmt = conn.prepare(&sql)?;
        let movies: Vec<Movie> = stmt
            .query_map(&sql_params[..], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn delete(&self, conn: &Connection, id: i64) -> AppResult<usize> {
        let rows_affected = conn.execute("DELETE FROM movies WHERE id = ?1", params![id])?;
        Ok(rows_affected)
    }

    fn recompute_avg_rating(&self, conn: &Connection, movie_id: i64) -> AppResult<f64> {
        let avg: Option<f64> = conn.query_row(
            "SELECT AVG(rate) FROM reviews WHERE movie_id = ?1",
            params![movie_id],
            |row| row.get(0),
        )?;
        let avg = avg.unwrap_or(0.0);

        conn.execute(
            "UPDATE movies SET avg_rating = ?1 WHERE id = ?2",
            params![avg, movie_id],
        )?;

        Ok(avg)
    }
}
