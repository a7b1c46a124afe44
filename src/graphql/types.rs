//! GraphQL type definitions
//!
//! These types mirror the store records but are decorated with async-graphql attributes.

use async_graphql::{ID, InputObject, SimpleObject};

use crate::db::{CreateSavedBook, SavedBookRecord, UserRecord};

/// A registered user and their saved books
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    /// Store-assigned identifier
    #[graphql(name = "_id")]
    pub id: ID,
    pub username: String,
    pub email: String,
    /// Number of saved books
    pub book_count: i32,
    /// Saved books, oldest first
    pub saved_books: Vec<Book>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            book_count: i32::try_from(r.book_count()).unwrap_or(i32::MAX),
            id: ID(r.id),
            username: r.username,
            email: r.email,
            saved_books: r.saved_books.into_iter().map(Book::from).collect(),
        }
    }
}

/// A book saved to a user's list
#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    /// Identifier of the book in the external catalogue
    pub book_id: ID,
    pub authors: Vec<String>,
    pub description: String,
    pub title: String,
    /// Cover image URL
    pub image: Option<String>,
    /// Link to the book's page
    pub link: Option<String>,
}

impl From<SavedBookRecord> for Book {
    fn from(r: SavedBookRecord) -> Self {
        Self {
            book_id: ID(r.book_id),
            authors: r.authors,
            description: r.description,
            title: r.title,
            image: r.image,
            link: r.link,
        }
    }
}

/// Result of `addUser` and `login`
#[derive(Debug, Clone, SimpleObject)]
pub struct Auth {
    /// Identity token to send as `Authorization: Bearer <token>`
    pub token: ID,
    pub user: User,
}

/// Book to save
#[derive(Debug, Clone, InputObject)]
pub struct BookInput {
    pub authors: Option<Vec<String>>,
    pub description: String,
    pub title: String,
    pub book_id: String,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl From<BookInput> for CreateSavedBook {
    fn from(input: BookInput) -> Self {
        Self {
            book_id: input.book_id,
            title: input.title,
            description: input.description,
            authors: input.authors.unwrap_or_default(),
            image: input.image,
            link: input.link,
        }
    }
}
