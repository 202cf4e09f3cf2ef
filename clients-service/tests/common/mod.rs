#![allow(dead_code)]

use clients_service::config::{ClientsConfig, MongoConfig, TelemetryConfig};
use clients_service::services::ClientsDb;
use clients_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::time::Duration;
use tokio::sync::oneshot;

pub fn test_mongo_uri() -> String {
    std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

pub fn test_config(uri: &str, database: &str) -> ClientsConfig {
    ClientsConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        mongodb: MongoConfig {
            uri: Secret::new(uri.to_string()),
            database: database.to_string(),
            collection: "clients".to_string(),
            connect_timeout: Duration::from_secs(2),
        },
        telemetry: TelemetryConfig {
            log_level: "info".to_string(),
            otlp_endpoint: None,
            metrics_port: None,
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: ClientsDb,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("clients_test_{}", uuid::Uuid::new_v4().simple());
        let app = Application::build(test_config(&test_mongo_uri(), &db_name))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            app.run_until_stopped(async {
                rx.await.ok();
            })
            .await
            .ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            shutdown: Some(tx),
        }
    }

    pub async fn seed_clients(&self, n: usize) {
        let docs = (0..n).map(|i| mongodb::bson::doc! { "name": format!("client-{}", i) });
        self.db
            .clients()
            .insert_many(docs, None)
            .await
            .expect("Failed to seed clients");
    }

    pub async fn cleanup(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        self.db.database().drop(None).await.ok();
    }
}
