//! Router harness for handler tests: in-memory SQLite, one admin user.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use hrms_core::auth::hash_password;
use hrms_db::UserRepository;
use hrms_db::migration::Migrator;
use hrms_shared::AppConfig;
use hrms_shared::config::{DatabaseConfig, JwtSettings, ServerConfig};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, create_router};

pub const ADMIN_EMAIL: &str = "admin@hrms.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub token: String,
}

fn config(async_row_threshold: usize) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            run_migrations: true,
        },
        jwt: JwtSettings {
            secret: "test-secret".into(),
            access_token_expiry_secs: 3600,
        },
        import: hrms_shared::ImportConfig {
            max_upload_bytes: 1024 * 1024,
            async_row_threshold,
        },
        cache: hrms_shared::CacheConfig::default(),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_async_threshold(200).await
    }

    pub async fn with_async_threshold(async_row_threshold: usize) -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        let admin = UserRepository::new(db.clone())
            .create(ADMIN_EMAIL, &hash, "Admin", "admin")
            .await
            .unwrap();

        let state = AppState::new(db, &config(async_row_threshold));
        let token = state
            .jwt_service
            .generate_access_token(admin.id, &admin.email, &admin.role)
            .unwrap();

        Self {
            router: create_router(state.clone()),
            state,
            token,
        }
    }

    /// Sends a JSON request; `token` of `None` sends no Authorization header.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// Sends an authenticated JSON request as the admin.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(&self.token.clone()), body).await
    }

    /// Uploads `bytes` as multipart field `file`.
    pub async fn upload(&self, uri: &str, file_name: &str, bytes: &[u8]) -> (StatusCode, Value) {
        let boundary = "hrms-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.dispatch(request).await
    }

    /// Downloads raw bytes with their status and headers.
    pub async fn download(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, bytes.to_vec())
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}

/// Minimal valid employee payload.
pub fn employee_body(staff_id: &str) -> Value {
    serde_json::json!({
        "organization": "SMRU",
        "staff_id": staff_id,
        "first_name_en": "Aye",
        "last_name_en": "Mya",
        "gender": "Female",
        "date_of_birth": "1990-05-01",
        "status": "Local ID Staff",
    })
}
