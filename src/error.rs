use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Invalid team or player.")]
    InvalidInput,

    #[error("{0}")]
    MalformedRequest(String),

    #[error("Unknown stat category: {stat}")]
    UnknownStat { stat: String },

    #[error("Invalid opponent.")]
    UnknownOpponent,

    #[error("No {stat} data for {player}.")]
    NoData { player: String, stat: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    #[error("{table} table row {row}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        table: &'static str,
        row: usize,
        column: String,
        value: String,
    },
}

impl StatsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StatsError::InvalidInput
            | StatsError::MalformedRequest(_)
            | StatsError::UnknownStat { .. }
            | StatsError::UnknownOpponent => StatusCode::BAD_REQUEST,
            StatsError::NoData { .. } => StatusCode::NOT_FOUND,
            StatsError::Io(_)
            | StatsError::Csv(_)
            | StatsError::MissingColumn { .. }
            | StatsError::InvalidNumber { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message_matches_api_contract() {
        let err = StatsError::InvalidInput;
        assert_eq!(err.to_string(), "Invalid team or player.");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_data_is_not_found() {
        let err = StatsError::NoData {
            player: "Jayson Tatum".to_string(),
            stat: "PTS".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "No PTS data for Jayson Tatum.");
    }

    #[test]
    fn test_load_errors_are_server_errors() {
        let err = StatsError::MissingColumn {
            table: "players",
            column: "Player".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("'Player'"));
    }
}
