//! Borrower model and authentication claims
//!
//! Identity is delegated to a host authentication subsystem: tokens are
//! consumed here, never issued. A token carries the opaque permission
//! strings the actor holds; mutations check for the matching string.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Permission strings understood by the catalog
pub mod perm {
    pub const CAN_MARK_RETURNED: &str = "catalog.can_mark_returned";

    pub const ADD_AUTHOR: &str = "catalog.add_author";
    pub const CHANGE_AUTHOR: &str = "catalog.change_author";
    pub const DELETE_AUTHOR: &str = "catalog.delete_author";

    pub const ADD_BOOK: &str = "catalog.add_book";
    pub const CHANGE_BOOK: &str = "catalog.change_book";
    pub const DELETE_BOOK: &str = "catalog.delete_book";

    pub const ADD_GENRE: &str = "catalog.add_genre";
    pub const CHANGE_GENRE: &str = "catalog.change_genre";
    pub const DELETE_GENRE: &str = "catalog.delete_genre";

    pub const ADD_LANGUAGE: &str = "catalog.add_language";
    pub const CHANGE_LANGUAGE: &str = "catalog.change_language";
    pub const DELETE_LANGUAGE: &str = "catalog.delete_language";

    pub const ADD_BOOKINSTANCE: &str = "catalog.add_bookinstance";
    pub const CHANGE_BOOKINSTANCE: &str = "catalog.change_bookinstance";
    pub const DELETE_BOOKINSTANCE: &str = "catalog.delete_bookinstance";
}

/// Library member able to borrow copies. Mirrors an identity of the host
/// auth subsystem so that deleting one clears `borrower_id` on their loans.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrower {
    pub id: i32,
    pub username: String,
}

/// JWT claims for authenticated actors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    /// Opaque permission strings held by this actor
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Refuse the request unless the actor holds `permission`
    pub fn require(&self, permission: &str) -> Result<(), AppError> {
        if self.has(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Missing permission: {}",
                permission
            )))
        }
    }

    pub fn require_can_mark_returned(&self) -> Result<(), AppError> {
        self.require(perm::CAN_MARK_RETURNED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(permissions: &[&str]) -> UserClaims {
        UserClaims {
            sub: "librarian".to_string(),
            user_id: 7,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp: 4102444800,
            iat: 0,
        }
    }

    #[test]
    fn require_accepts_held_permission() {
        let c = claims(&[perm::ADD_BOOK, perm::CAN_MARK_RETURNED]);
        assert!(c.require(perm::ADD_BOOK).is_ok());
        assert!(c.require_can_mark_returned().is_ok());
    }

    #[test]
    fn require_refuses_missing_permission() {
        let c = claims(&[perm::CHANGE_BOOK]);
        let err = c.require(perm::ADD_BOOK).unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[test]
    fn token_round_trip_preserves_permissions() {
        let c = claims(&[perm::DELETE_GENRE]);
        let token = c.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert!(parsed.has(perm::DELETE_GENRE));
        assert!(!parsed.has(perm::ADD_GENRE));
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let c = claims(&[]);
        let token = c.create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }
}
