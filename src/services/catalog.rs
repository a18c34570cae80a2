//! Catalog management service
//!
//! CRUD over the five catalog record types, with the cross-record checks
//! that do not belong in a single SQL statement: case-insensitive name
//! uniqueness for genres and languages, ISBN uniqueness for books, and
//! detail-view assembly.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorInput,
        book::{BookDetails, BookInput, BookSummary},
        genre::GenreInput,
        instance::{CreateBookInstance, UpdateBookInstance},
        language::LanguageInput,
        Author, AuthorDetails, Book, BookInstance, Genre, InstanceDetails, Language,
    },
    repository::Repository,
};

/// Genre with the books filed under it
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct GenreDetails {
    pub id: i32,
    pub name: String,
    pub books: Vec<BookSummary>,
}

/// Language with the books written in it
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct LanguageDetails {
    pub id: i32,
    pub name: String,
    pub books: Vec<BookSummary>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Genres

    pub async fn list_genres(&self, limit: i64, offset: i64) -> AppResult<(Vec<Genre>, i64)> {
        self.repository.genres.list(limit, offset).await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<GenreDetails> {
        let genre = self.repository.genres.get_by_id(id).await?;
        let books = self.repository.books.get_by_genre(id).await?;
        Ok(GenreDetails {
            id: genre.id,
            name: genre.name,
            books,
        })
    }

    pub async fn create_genre(&self, input: &GenreInput) -> AppResult<Genre> {
        if self.repository.genres.name_exists(&input.name, None).await? {
            return Err(AppError::Conflict(
                "Genre already exists (case insensitive match)".to_string(),
            ));
        }
        self.repository.genres.create(&input.name).await
    }

    pub async fn update_genre(&self, id: i32, input: &GenreInput) -> AppResult<Genre> {
        if self
            .repository
            .genres
            .name_exists(&input.name, Some(id))
            .await?
        {
            return Err(AppError::Conflict(
                "Genre already exists (case insensitive match)".to_string(),
            ));
        }
        self.repository.genres.update(id, &input.name).await
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await
    }

    // Languages

    pub async fn list_languages(&self, limit: i64, offset: i64) -> AppResult<(Vec<Language>, i64)> {
        self.repository.languages.list(limit, offset).await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<LanguageDetails> {
        let language = self.repository.languages.get_by_id(id).await?;
        let books = self.repository.books.get_by_language(id).await?;
        Ok(LanguageDetails {
            id: language.id,
            name: language.name,
            books,
        })
    }

    pub async fn create_language(&self, input: &LanguageInput) -> AppResult<Language> {
        if self
            .repository
            .languages
            .name_exists(&input.name, None)
            .await?
        {
            return Err(AppError::Conflict(
                "Language already exists (case insensitive match)".to_string(),
            ));
        }
        self.repository.languages.create(&input.name).await
    }

    pub async fn update_language(&self, id: i32, input: &LanguageInput) -> AppResult<Language> {
        if self
            .repository
            .languages
            .name_exists(&input.name, Some(id))
            .await?
        {
            return Err(AppError::Conflict(
                "Language already exists (case insensitive match)".to_string(),
            ));
        }
        self.repository.languages.update(id, &input.name).await
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await
    }

    // Authors

    pub async fn list_authors(&self, limit: i64, offset: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(limit, offset).await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.authors.get_books(id).await?;
        Ok(AuthorDetails::from_author(author, books))
    }

    pub async fn create_author(&self, input: &AuthorInput) -> AppResult<Author> {
        self.repository.authors.create(input).await
    }

    pub async fn update_author(&self, id: i32, input: &AuthorInput) -> AppResult<Author> {
        self.repository.authors.update(id, input).await
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    // Books

    pub async fn list_books(&self, limit: i64, offset: i64) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.list(limit, offset).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let language = match book.language_id {
            Some(language_id) => Some(self.repository.languages.get_by_id(language_id).await?),
            None => None,
        };
        let genres = self.repository.books.get_genres(id).await?;
        let instances = self.repository.instances.get_for_book(id).await?;

        Ok(BookDetails {
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author,
            language,
            genres,
            instances,
        })
    }

    pub async fn create_book(&self, input: &BookInput) -> AppResult<Book> {
        if self.repository.books.isbn_exists(&input.isbn, None).await? {
            return Err(AppError::Conflict(
                "Book with this ISBN already exists".to_string(),
            ));
        }
        self.repository.books.create(input).await
    }

    pub async fn update_book(&self, id: i32, input: &BookInput) -> AppResult<Book> {
        if self
            .repository
            .books
            .isbn_exists(&input.isbn, Some(id))
            .await?
        {
            return Err(AppError::Conflict(
                "Book with this ISBN already exists".to_string(),
            ));
        }
        self.repository.books.update(id, input).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // Book instances

    pub async fn list_instances(
        &self,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<InstanceDetails>, i64)> {
        self.repository.instances.list(limit, offset).await
    }

    pub async fn get_instance(&self, id: Uuid) -> AppResult<InstanceDetails> {
        self.repository.instances.get_details(id).await
    }

    pub async fn create_instance(&self, input: &CreateBookInstance) -> AppResult<BookInstance> {
        // Reject a dangling book reference up front with a 404 rather than
        // letting the foreign key refuse the insert.
        if let Some(book_id) = input.book_id {
            self.repository.books.get_by_id(book_id).await?;
        }
        self.repository.instances.create(input).await
    }

    pub async fn update_instance(
        &self,
        id: Uuid,
        input: &UpdateBookInstance,
    ) -> AppResult<BookInstance> {
        self.repository.instances.update(id, input).await
    }

    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.instances.delete(id).await
    }
}
