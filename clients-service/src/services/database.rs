use crate::config::MongoConfig;
use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    error::ErrorKind,
    Client as MongoClient, Collection, Database,
};
use std::time::Duration;
use secrecy::ExposeSecret;
use service_core::error::AppError;

const APP_NAME: &str = "clients-service";

/// Source of the client total served by `GET /clients`.
#[async_trait]
pub trait ClientCounter: Send + Sync {
    async fn count_clients(&self) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct ClientsDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl ClientsDb {
    /// Connect and ping within `config.connect_timeout`.
    ///
    /// Any failure, including the deadline expiring, is returned as a
    /// `DatabaseError`; nothing is retried.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        let timeout = config.connect_timeout;
        tracing::info!(
            uri = %config.redacted_uri(),
            database = %config.database,
            timeout_secs = timeout.as_secs(),
            "Connecting to MongoDB"
        );

        let db = tokio::time::timeout(timeout, Self::establish(config))
            .await
            .map_err(|_| timed_out(timeout))??;

        tracing::info!(database = %config.database, "Connected to MongoDB");
        Ok(db)
    }

    async fn establish(config: &MongoConfig) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(config.uri.expose_secret())
            .await
            .map_err(connection_error)?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client = MongoClient::with_options(options).map_err(connection_error)?;
        let db = client.database(&config.database);

        let this = Self {
            client,
            db,
            collection: config.collection.clone(),
        };
        // Server selection gives up at the same bound as the outer deadline.
        this.run_ping().await.map_err(|e| {
            if matches!(*e.kind, ErrorKind::ServerSelection { .. }) {
                timed_out(config.connect_timeout)
            } else {
                ping_failed(e)
            }
        })?;
        Ok(this)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.run_ping().await.map_err(ping_failed)
    }

    async fn run_ping(&self) -> Result<(), mongodb::error::Error> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn clients(&self) -> Collection<Document> {
        self.db.collection(&self.collection)
    }
}

#[async_trait]
impl ClientCounter for ClientsDb {
    async fn count_clients(&self) -> Result<u64, AppError> {
        self.clients()
            .count_documents(doc! {}, None)
            .await
            .map_err(|e| {
                tracing::error!(collection = %self.collection, "Failed to count clients: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }
}

fn timed_out(timeout: Duration) -> AppError {
    tracing::error!(
        timeout_secs = timeout.as_secs(),
        "MongoDB did not answer before the connect deadline"
    );
    AppError::DatabaseError(anyhow::anyhow!(
        "Mongo connection timed out after {}s",
        timeout.as_secs()
    ))
}

fn ping_failed(e: mongodb::error::Error) -> AppError {
    tracing::error!("Mongo ping failed: {}", e);
    AppError::DatabaseError(anyhow::anyhow!("Mongo ping failed: {}", e))
}

fn connection_error(e: mongodb::error::Error) -> AppError {
    tracing::error!("Mongo connection error: {}", e);
    AppError::DatabaseError(anyhow::anyhow!("Mongo connection error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use std::time::Instant;

    fn config(uri: &str, timeout: Duration) -> MongoConfig {
        MongoConfig {
            uri: Secret::new(uri.to_string()),
            database: "clientsdb".to_string(),
            collection: "clients".to_string(),
            connect_timeout: timeout,
        }
    }

    #[tokio::test]
    async fn malformed_uri_fails_as_connection_error() {
        let result =
            ClientsDb::connect(&config("http://localhost:27017", Duration::from_secs(1))).await;

        match result {
            Err(AppError::DatabaseError(e)) => {
                assert!(e.to_string().starts_with("Mongo connection error"), "{e}")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connect should fail for a non-mongodb scheme"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_fails_within_deadline() {
        let started = Instant::now();
        let result =
            ClientsDb::connect(&config("mongodb://127.0.0.1:1", Duration::from_secs(1))).await;

        assert_timed_out(result, 1);
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "connect took {:?}",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn blackholed_server_reports_same_timeout() {
        // TEST-NET-1: packets go nowhere, so only the deadline ends the attempt.
        let result =
            ClientsDb::connect(&config("mongodb://192.0.2.1:27017", Duration::from_secs(1))).await;

        assert_timed_out(result, 1);
    }

    fn assert_timed_out(result: Result<ClientsDb, AppError>, secs: u64) {
        match result {
            Err(AppError::DatabaseError(e)) => assert_eq!(
                e.to_string(),
                format!("Mongo connection timed out after {}s", secs)
            ),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connect should not succeed"),
        }
    }
}
