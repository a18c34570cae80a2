//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, genres, health, instances, languages, loans, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bibliotheca API",
        version = "0.1.0",
        description = "Library Catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        // Languages
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        languages::update_language,
        languages::delete_language,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Instances
        instances::list_instances,
        instances::get_instance,
        instances::create_instance,
        instances::update_instance,
        instances::delete_instance,
        instances::get_renewal,
        instances::renew_instance,
        // Loans
        loans::my_loans,
        loans::all_loans,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Genres
            crate::models::genre::Genre,
            crate::models::genre::GenreInput,
            crate::services::catalog::GenreDetails,
            // Languages
            crate::models::language::Language,
            crate::models::language::LanguageInput,
            crate::services::catalog::LanguageDetails,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorInput,
            crate::models::author::AuthorDetails,
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetails,
            crate::models::book::BookInput,
            // Instances
            crate::models::instance::BookInstance,
            crate::models::instance::InstanceDetails,
            crate::models::instance::LoanStatus,
            crate::models::instance::CreateBookInstance,
            crate::models::instance::UpdateBookInstance,
            instances::RenewalForm,
            instances::RenewalRequest,
            instances::RenewalResponse,
            // Stats
            crate::services::stats::SiteStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "genres", description = "Genre management"),
        (name = "languages", description = "Language management"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book catalog management"),
        (name = "instances", description = "Physical copy management"),
        (name = "loans", description = "Loan listings and renewals"),
        (name = "stats", description = "Site statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
