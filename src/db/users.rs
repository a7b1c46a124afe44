//! Users repository
//!
//! A user is stored as one `users` row plus its `saved_books` rows, and is
//! always loaded whole: [`UserRecord::saved_books`] holds the embedded list in
//! the order the books were saved. Validation and password hashing happen here,
//! on the way into the store.

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::sqlite_helpers::{json_to_vec, now_iso8601, vec_to_json};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+@.+\..+$").unwrap());

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    password_hash: String,
    pub saved_books: Vec<SavedBookRecord>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRecord {
    /// Number of saved books
    pub fn book_count(&self) -> usize {
        self.saved_books.len()
    }

    /// Compare a plaintext password against the stored hash
    pub async fn is_correct_password(&self, password: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = self.password_hash.clone();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("Password verification task failed")?
            .map_err(|e| anyhow!("Failed to verify password: {}", e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedBookRecord {
    pub book_id: String,
    pub title: String,
    pub description: String,
    pub authors: Vec<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    /// Plaintext; hashed before it reaches the table
    pub password: String,
}

impl CreateUser {
    fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.username.trim().is_empty() {
            problems.push("username: is required");
        }
        if self.email.is_empty() {
            problems.push("email: is required");
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            problems.push("email: must be a valid email address");
        }
        if self.password.is_empty() {
            problems.push("password: is required");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("User validation failed: {}", problems.join(", ")))
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSavedBook {
    pub book_id: String,
    pub title: String,
    pub description: String,
    pub authors: Vec<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl CreateSavedBook {
    fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.book_id.is_empty() {
            problems.push("bookId: is required");
        }
        if self.title.is_empty() {
            problems.push("title: is required");
        }
        if self.description.is_empty() {
            problems.push("description: is required");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Book validation failed: {}", problems.join(", ")))
        }
    }
}

// ============================================================================
// Row loading
// ============================================================================

type UserRow = (String, String, String, String, String, String);
type SavedBookRow = (String, String, String, String, Option<String>, Option<String>);

enum UserLookup<'a> {
    Id(&'a str),
    Email(&'a str),
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

async fn fetch_user(
    conn: &mut SqliteConnection,
    lookup: UserLookup<'_>,
) -> Result<Option<UserRecord>> {
    let (column, value) = match lookup {
        UserLookup::Id(id) => ("id", id),
        UserLookup::Email(email) => ("email", email),
    };
    let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column);

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(value)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(r) = row else {
        return Ok(None);
    };

    let saved_books = fetch_saved_books(conn, &r.0).await?;

    Ok(Some(UserRecord {
        id: r.0,
        username: r.1,
        email: r.2,
        password_hash: r.3,
        saved_books,
        created_at: r.4,
        updated_at: r.5,
    }))
}

async fn fetch_saved_books(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<SavedBookRecord>> {
    let rows = sqlx::query_as::<_, SavedBookRow>(
        r#"
        SELECT book_id, title, description, authors, image, link
        FROM saved_books
        WHERE user_id = ?
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| SavedBookRecord {
            book_id: r.0,
            title: r.1,
            description: r.2,
            authors: json_to_vec(&r.3),
            image: r.4,
            link: r.5,
        })
        .collect())
}

async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed")?
        .map_err(|e| anyhow!("Failed to hash password: {}", e))
}

fn map_write_error(e: sqlx::Error) -> anyhow::Error {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
    {
        return anyhow!("Duplicate key: {}", db_err.message());
    }
    e.into()
}

// ============================================================================
// Repository
// ============================================================================

pub struct UsersRepository {
    pool: SqlitePool,
    password_cost: u32,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool, password_cost: u32) -> Self {
        Self {
            pool,
            password_cost,
        }
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let user = CreateUser {
            username: user.username.trim().to_string(),
            ..user
        };
        user.validate()?;

        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();
        let password_hash = hash_password(user.password, self.password_cost).await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow!("Failed to create user"))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let mut conn = self.pool.acquire().await?;
        fetch_user(&mut conn, UserLookup::Id(id)).await
    }

    /// Get user by email (exact match)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let mut conn = self.pool.acquire().await?;
        fetch_user(&mut conn, UserLookup::Email(email)).await
    }

    /// Add a book to the user's list unless one with the same `book_id` is
    /// already there. Returns the updated user, or `None` if no such user.
    pub async fn add_saved_book(
        &self,
        user_id: &str,
        book: CreateSavedBook,
    ) -> Result<Option<UserRecord>> {
        book.validate()?;

        // The insert is the transaction's first statement so the write lock
        // is taken up front and waits on the busy timeout like any writer.
        let mut tx = self.pool.begin().await?;
        let now = now_iso8601();
        let inserted = sqlx::query(
            r#"
            INSERT INTO saved_books
                (user_id, book_id, title, description, authors, image, link, created_at)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM users WHERE id = ?)
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(vec_to_json(&book.authors))
        .bind(&book.image)
        .bind(&book.link)
        .bind(&now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted > 0 {
            sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
                .bind(&now)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let user = fetch_user(&mut tx, UserLookup::Id(user_id)).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Remove every saved book matching `book_id`. Returns the updated user
    /// (unchanged when nothing matched), or `None` if no such user.
    pub async fn remove_saved_book(
        &self,
        user_id: &str,
        book_id: &str,
    ) -> Result<Option<UserRecord>> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM saved_books WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed > 0 {
            sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
                .bind(now_iso8601())
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let user = fetch_user(&mut tx, UserLookup::Id(user_id)).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Replace the user's password. Tokens already issued stay valid.
    pub async fn update_password(&self, id: &str, password: &str) -> Result<bool> {
        if password.is_empty() {
            return Err(anyhow!("User validation failed: password: is required"));
        }
        let password_hash = hash_password(password.to_string(), self.password_cost).await?;

        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(now_iso8601())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete user (saved books go with it)
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
