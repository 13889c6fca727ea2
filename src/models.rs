//! Stored records and request bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local mirror of an identity-provider user, keyed by the provider's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub product_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Product with its owner's profile; `user` is null when the owner never synced.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithUser {
    #[serde(flatten)]
    pub product: Product,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentWithUser {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: Option<User>,
}

/// Response of GET /api/products/:id.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub user: Option<User>,
    pub comments: Vec<CommentWithUser>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub user_id: String,
}

/// Fields to overwrite on a product; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub product_id: String,
    pub user_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
}

/// Returns the value when present and non-empty. Whitespace counts as a value.
pub fn required(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl CreateProductRequest {
    pub fn into_new_product(self, user_id: String) -> Option<NewProduct> {
        Some(NewProduct {
            title: required(self.title)?,
            description: required(self.description)?,
            image_url: required(self.image_url)?,
            user_id,
        })
    }
}

impl UpdateProductRequest {
    /// Empty values are treated as not supplied so an update never empties a required field.
    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            title: required(self.title),
            description: required(self.description),
            image_url: required(self.image_url),
        }
    }
}

impl SyncUserRequest {
    pub fn into_new_user(self, id: String) -> Option<NewUser> {
        Some(NewUser {
            id,
            email: required(self.email)?,
            name: required(self.name)?,
            image_url: required(self.image_url)?,
        })
    }
}
