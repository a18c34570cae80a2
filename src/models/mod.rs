//! Data models for Bibliotheca

pub mod author;
pub mod book;
pub mod genre;
pub mod instance;
pub mod language;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetails};
pub use book::{Book, BookDetails, BookSummary};
pub use genre::Genre;
pub use instance::{BookInstance, InstanceDetails, LoanStatus};
pub use language::Language;
pub use user::{Borrower, UserClaims};
