//! Shared harness: in-memory repository, token minting, request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use marketplace_api::config::{AuthConfig, AuthKey};
use marketplace_api::models::{
    Comment, CommentWithUser, NewComment, NewProduct, NewUser, Product, ProductChanges, ProductDetail,
    ProductWithUser, User,
};
use marketplace_api::repository::new_id;
use marketplace_api::{app, AppState, Repository, RepositoryError, TokenVerifier};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const FRONTEND: &str = "http://localhost:5173";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    products: Vec<Product>,
    comments: Vec<Comment>,
}

/// Repository over plain vectors. Later inserts sort first, matching `ORDER BY created_at DESC`.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl MemoryRepository {
    /// Make every subsequent call fail like a lost database connection.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn product_count(&self) -> usize {
        self.tables.lock().unwrap().products.len()
    }

    pub fn comment_count(&self) -> usize {
        self.tables.lock().unwrap().comments.len()
    }

    pub fn stored_product(&self, id: &str) -> Option<Product> {
        self.tables.lock().unwrap().products.iter().find(|p| p.id == id).cloned()
    }

    pub fn stored_comment(&self, id: &str) -> Option<Comment> {
        self.tables.lock().unwrap().comments.iter().find(|c| c.id == id).cloned()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn with_owner(tables: &Tables, product: &Product) -> ProductWithUser {
        ProductWithUser {
            product: product.clone(),
            user: tables.users.iter().find(|u| u.id == product.user_id).cloned(),
        }
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()
    }

    async fn upsert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        if let Some(existing) = tables.users.iter_mut().find(|u| u.id == user.id) {
            existing.email = user.email;
            existing.name = user.name;
            existing.image_url = user.image_url;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let stored = User {
            id: user.id,
            email: user.email,
            name: user.name,
            image_url: user.image_url,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn list_products(&self) -> Result<Vec<ProductWithUser>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.iter().rev().map(|p| Self::with_owner(&tables, p)).collect())
    }

    async fn products_by_user(&self, user_id: &str) -> Result<Vec<ProductWithUser>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .map(|p| Self::with_owner(&tables, p))
            .collect())
    }

    async fn product_by_id(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        self.check()?;
        Ok(self.stored_product(id))
    }

    async fn product_detail(&self, id: &str) -> Result<Option<ProductDetail>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let Some(product) = tables.products.iter().find(|p| p.id == id) else {
            return Ok(None);
        };
        let comments = tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.product_id == id)
            .map(|c| CommentWithUser {
                comment: c.clone(),
                user: tables.users.iter().find(|u| u.id == c.user_id).cloned(),
            })
            .collect();
        let ProductWithUser { product, user } = Self::with_owner(&tables, product);
        Ok(Some(ProductDetail { product, user, comments }))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        self.check()?;
        let now = Utc::now();
        let stored = Product {
            id: new_id(),
            title: product.title,
            description: product.description,
            image_url: product.image_url,
            user_id: product.user_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().products.push(stored.clone());
        Ok(stored)
    }

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<Option<Product>, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(product) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            product.title = title;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(image_url) = changes.image_url {
            product.image_url = image_url;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(pos) = tables.products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let removed = tables.products.remove(pos);
        tables.comments.retain(|c| c.product_id != id);
        Ok(Some(removed))
    }

    async fn comment_by_id(&self, id: &str) -> Result<Option<Comment>, RepositoryError> {
        self.check()?;
        Ok(self.stored_comment(id))
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, RepositoryError> {
        self.check()?;
        let stored = Comment {
            id: new_id(),
            content: comment.content,
            product_id: comment.product_id,
            user_id: comment.user_id,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().comments.push(stored.clone());
        Ok(stored)
    }

    async fn delete_comment(&self, id: &str) -> Result<Option<Comment>, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(pos) = tables.comments.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        Ok(Some(tables.comments.remove(pos)))
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryRepository>,
}

pub fn test_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::default());
    let verifier = TokenVerifier::new(&AuthConfig {
        key: AuthKey::Secret(SECRET.into()),
        issuer: None,
        audience: None,
    })
    .unwrap();
    let state = AppState::new(repo.clone(), verifier);
    let router = app(state, FRONTEND).unwrap();
    TestApp { router, repo }
}

/// Signed bearer token for `user_id`, valid for ten minutes.
pub fn token_for(user_id: &str) -> String {
    let claims = serde_json::json!({
        "sub": user_id,
        "exp": Utc::now().timestamp() + 600,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// JSON request, authenticated as `user` when given.
    pub async fn call(&self, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(user)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Create a product owned by `user` and return its id.
    pub async fn seed_product(&self, user: &str, title: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/products",
                Some(user),
                Some(serde_json::json!({
                    "title": title,
                    "description": format!("{title} description"),
                    "imageUrl": "http://img.example/x.png",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    /// Comment on `product_id` as `user` and return the comment id.
    pub async fn seed_comment(&self, user: &str, product_id: &str, content: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                &format!("/api/comments/{product_id}"),
                Some(user),
                Some(serde_json::json!({ "content": content })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}
