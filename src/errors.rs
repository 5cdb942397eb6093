use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Exchange returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected data from exchange: {0}")]
    UnexpectedData(String),

    #[error("IP is being geoblocked, check location or VPN: {0}")]
    Geoblocked(String),
}

impl ExchangeError {
    /// Whether the failure only costs us the current symbol. Transport
    /// failures and geoblocking mean every further request will fail too.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ExchangeError::Status { .. }
            | ExchangeError::Parse(_)
            | ExchangeError::UnexpectedData(_) => true,
            ExchangeError::Http(_) | ExchangeError::Geoblocked(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Anything that reaches this type ends the run.
#[derive(Debug, Error)]
pub enum BackfillError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No ranked symbol matches {symbol} at snapshot {snapshot}")]
    UnresolvedSymbol { symbol: String, snapshot: NaiveDate },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_and_geoblock_are_fatal() {
        let status = ExchangeError::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
        };
        assert!(status.is_recoverable());
        assert!(ExchangeError::UnexpectedData("bad rate".into()).is_recoverable());
        assert!(!ExchangeError::Geoblocked("restricted location".into()).is_recoverable());
    }
}
