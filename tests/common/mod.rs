// tests/common/mod.rs

#![allow(dead_code)]

use std::{str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookswap::{
    config::Config,
    db::{self, MIGRATOR},
    notify::{MailError, Mailer, NotificationDispatcher, OutgoingEmail},
    routes,
    state::AppState,
};
use serde_json::{Value, json};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Forwards every delivered email to the test.
pub struct RecordingMailer {
    tx: mpsc::UnboundedSender<OutgoingEmail>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.tx
            .send(email.clone())
            .map_err(|e| MailError(e.to_string()))
    }
}

/// Rejects every message, like a mail server that is down.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), MailError> {
        Err(MailError("connection refused".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub outbox: mpsc::UnboundedReceiver<OutgoingEmail>,
}

pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    // One connection that never recycles, so the in-memory database lives
    // as long as the pool.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory SQLite");

    MIGRATOR.run(&pool).await.expect("Failed to migrate database");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        upload_dir: std::env::temp_dir().join(format!("bookswap-{}", uuid::Uuid::new_v4())),
        public_base_url: "http://localhost:3000/".parse().unwrap(),
        mail_sender: "noreply@test.local".to_string(),
        loan_days: 7,
    }
}

/// A WAL database file with the production connection settings, for tests
/// that need several connections at once.
pub async fn file_pool() -> SqlitePool {
    let path = std::env::temp_dir().join(format!("bookswap-{}.db", uuid::Uuid::new_v4()));
    db::connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .expect("Failed to open SQLite file")
}

pub async fn spawn_test_app() -> TestApp {
    let (tx, outbox) = mpsc::unbounded_channel();
    spawn_app(memory_pool().await, Arc::new(RecordingMailer { tx }), outbox)
}

/// An app whose mail transport fails every delivery.
pub async fn spawn_app_with_broken_mail() -> TestApp {
    // Nothing is ever recorded; the receiver only keeps `TestApp` uniform.
    let (_tx, outbox) = mpsc::unbounded_channel();
    spawn_app(memory_pool().await, Arc::new(FailingMailer), outbox)
}

pub async fn spawn_file_backed_app() -> TestApp {
    let (tx, outbox) = mpsc::unbounded_channel();
    spawn_app(file_pool().await, Arc::new(RecordingMailer { tx }), outbox)
}

fn spawn_app(
    pool: SqlitePool,
    mailer: Arc<dyn Mailer>,
    outbox: mpsc::UnboundedReceiver<OutgoingEmail>,
) -> TestApp {
    let (notifier, _worker) = NotificationDispatcher::spawn(mailer);

    let state = AppState {
        pool,
        config: test_config(),
        notifier,
    };

    TestApp {
        router: routes::create_router(state.clone()),
        state,
        outbox,
    }
}

/// A registered account and its bearer token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub token: String,
}

impl TestApp {
    /// Sends one request through the router and returns status plus JSON body
    /// (`Value::Null` for an empty body).
    pub async fn call(
        &self,
        method: &str,
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

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, json)
    }

    pub async fn register(&self, name: &str, class_name: &str, division: &str) -> TestUser {
        let email = format!("{}_{}@school.test", name.to_lowercase(), &uuid::Uuid::new_v4().to_string()[..8]);
        let (status, body) = self
            .call(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "password123",
                    "name": name,
                    "class_name": class_name,
                    "division": division,
                    "roll_no": "7",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        TestUser {
            id: body["user"]["id"].as_i64().unwrap(),
            email,
            name: name.to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates an account straight through the user service, skipping password
    /// hashing. The account cannot log in.
    pub async fn insert_user(&self, name: &str) -> i64 {
        let req = bookswap::models::user::RegisterRequest {
            email: format!("{}_{}@school.test", name.to_lowercase(), uuid::Uuid::new_v4()),
            password: "unused".to_string(),
            name: name.to_string(),
            class_name: "8".to_string(),
            division: "D".to_string(),
            roll_no: "1".to_string(),
        };
        bookswap::services::users::create(&self.state.pool, &req, "not-a-hash")
            .await
            .unwrap()
            .id
    }

    /// Lists a book straight through the catalog service.
    pub async fn add_book(&self, owner: &TestUser, title: &str, author: &str) -> i64 {
        let new_book = bookswap::models::book::NewBook {
            title: title.to_string(),
            author: author.to_string(),
            description: None,
        };
        bookswap::services::catalog::create_book(&self.state.pool, owner.id, &new_book, None)
            .await
            .unwrap()
            .id
    }

    /// Waits for the next delivered notification.
    pub async fn next_email(&mut self) -> OutgoingEmail {
        tokio::time::timeout(Duration::from_secs(5), self.outbox.recv())
            .await
            .expect("timed out waiting for a notification")
            .expect("notification worker stopped")
    }

    /// Asserts nothing else was delivered within a short grace period.
    pub async fn assert_no_email(&mut self) {
        let next = tokio::time::timeout(Duration::from_millis(200), self.outbox.recv()).await;
        assert!(next.is_err(), "unexpected notification: {:?}", next);
    }
}
