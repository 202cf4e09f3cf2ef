use crate::services::record_clients_count;
use crate::startup::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientsCountResponse {
    pub clients_count: u64,
}

/// A failed count is logged and reported as zero clients.
pub async fn clients_count(State(state): State<AppState>) -> Json<ClientsCountResponse> {
    let clients_count = match state.counter.count_clients().await {
        Ok(count) => {
            record_clients_count("ok");
            tracing::debug!(clients_count = count, "Counted clients");
            count
        }
        Err(e) => {
            record_clients_count("error");
            tracing::error!("Failed to count clients, reporting 0: {}", e);
            0
        }
    };

    Json(ClientsCountResponse { clients_count })
}
