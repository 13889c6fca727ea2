//! PostgreSQL repository using runtime-checked `query_as` against the tables created by `store`.

use super::{new_id, Repository, RepositoryError};
use crate::models::{
    Comment, CommentWithUser, NewComment, NewProduct, NewUser, Product, ProductChanges, ProductDetail,
    ProductWithUser, User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

const PRODUCT_COLUMNS: &str = "id, title, description, image_url, user_id, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, content, product_id, user_id, created_at";
const USER_COLUMNS: &str = "id, email, name, image_url, created_at, updated_at";

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load profiles for the given ids in one query.
    async fn users_by_ids(&self, ids: Vec<String>) -> Result<HashMap<String, User>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        tracing::debug!(sql = %sql, count = ids.len(), "query");
        let users: Vec<User> = sqlx::query_as(&sql).bind(&ids).fetch_all(&self.pool).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }

    async fn with_owners(&self, products: Vec<Product>) -> Result<Vec<ProductWithUser>, RepositoryError> {
        let mut ids: Vec<String> = products.iter().map(|p| p.user_id.clone()).collect();
        ids.sort();
        ids.dedup();
        let users = self.users_by_ids(ids).await?;
        Ok(products
            .into_iter()
            .map(|product| {
                let user = users.get(&product.user_id).cloned();
                ProductWithUser { product, user }
            })
            .collect())
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn upsert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, name, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                name = EXCLUDED.name,
                image_url = EXCLUDED.image_url,
                updated_at = NOW()
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row: Option<User> = sqlx::query_as(&sql)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.image_url)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(RepositoryError::NotReturned("user"))
    }

    async fn list_products(&self) -> Result<Vec<ProductWithUser>, RepositoryError> {
        let sql = format!("SELECT {} FROM products ORDER BY created_at DESC", PRODUCT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let products: Vec<Product> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        self.with_owners(products).await
    }

    async fn products_by_user(&self, user_id: &str) -> Result<Vec<ProductWithUser>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM products WHERE user_id = $1 ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        );
        tracing::debug!(sql = %sql, user_id, "query");
        let products: Vec<Product> = sqlx::query_as(&sql).bind(user_id).fetch_all(&self.pool).await?;
        self.with_owners(products).await
    }

    async fn product_by_id(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn product_detail(&self, id: &str) -> Result<Option<ProductDetail>, RepositoryError> {
        let Some(product) = self.product_by_id(id).await? else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT {} FROM comments WHERE product_id = $1 ORDER BY created_at DESC",
            COMMENT_COLUMNS
        );
        let comments: Vec<Comment> = sqlx::query_as(&sql).bind(id).fetch_all(&self.pool).await?;

        let mut ids: Vec<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        ids.push(product.user_id.clone());
        ids.sort();
        ids.dedup();
        let users = self.users_by_ids(ids).await?;

        let comments = comments
            .into_iter()
            .map(|comment| {
                let user = users.get(&comment.user_id).cloned();
                CommentWithUser { comment, user }
            })
            .collect();
        let user = users.get(&product.user_id).cloned();
        Ok(Some(ProductDetail { product, user, comments }))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products (id, title, description, image_url, user_id) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let row: Option<Product> = sqlx::query_as(&sql)
            .bind(new_id())
            .bind(&product.title)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(&product.user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(RepositoryError::NotReturned("product"))
    }

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE products
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.image_url)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_product(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        // comments.product_id is ON DELETE CASCADE
        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {}", PRODUCT_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn comment_by_id(&self, id: &str) -> Result<Option<Comment>, RepositoryError> {
        let sql = format!("SELECT {} FROM comments WHERE id = $1", COMMENT_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, RepositoryError> {
        let sql = format!(
            "INSERT INTO comments (id, content, product_id, user_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            COMMENT_COLUMNS
        );
        let row: Option<Comment> = sqlx::query_as(&sql)
            .bind(new_id())
            .bind(&comment.content)
            .bind(&comment.product_id)
            .bind(&comment.user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(RepositoryError::NotReturned("comment"))
    }

    async fn delete_comment(&self, id: &str) -> Result<Option<Comment>, RepositoryError> {
        let sql = format!("DELETE FROM comments WHERE id = $1 RETURNING {}", COMMENT_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }
}
