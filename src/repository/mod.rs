//! Persistence access layer: single-row reads and writes for users, products and comments.
//!
//! Handlers only see the [`Repository`] trait. [`PgRepository`] is the PostgreSQL
//! implementation used by the server.

mod postgres;

pub use postgres::PgRepository;

use crate::models::{
    Comment, NewComment, NewProduct, NewUser, Product, ProductChanges, ProductDetail, ProductWithUser, User,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("insert returned no row for {0}")]
    NotReturned(&'static str),
}

#[async_trait]
pub trait Repository: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Insert the profile, or overwrite email, name and image of an existing one.
    async fn upsert_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<ProductWithUser>, RepositoryError>;

    /// Products owned by `user_id`, newest first.
    async fn products_by_user(&self, user_id: &str) -> Result<Vec<ProductWithUser>, RepositoryError>;

    async fn product_by_id(&self, id: &str) -> Result<Option<Product>, RepositoryError>;

    /// Product with owner profile and its comments (newest first).
    async fn product_detail(&self, id: &str) -> Result<Option<ProductDetail>, RepositoryError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Apply `changes` and refresh `updated_at`. Returns None when the product is gone.
    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<Option<Product>, RepositoryError>;

    /// Delete the product and its comments. Returns the deleted row.
    async fn delete_product(&self, id: &str) -> Result<Option<Product>, RepositoryError>;

    async fn comment_by_id(&self, id: &str) -> Result<Option<Comment>, RepositoryError>;

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, RepositoryError>;

    async fn delete_comment(&self, id: &str) -> Result<Option<Comment>, RepositoryError>;
}

/// New opaque record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
