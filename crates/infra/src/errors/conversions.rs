//! Conversions from external infrastructure errors into domain errors.

use pavilion_domain::ApiError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ApiError);

impl From<InfraError> for ApiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ApiError> for InfraError {
    fn from(value: ApiError) -> Self {
        InfraError(value)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let classified = if value.is_timeout() {
            ApiError::Network(format!("request timed out: {value}"))
        } else if value.is_connect() {
            ApiError::Network(format!("connection failed: {value}"))
        } else if value.is_request() || value.is_body() {
            ApiError::Network(format!("request failed before a response: {value}"))
        } else if value.is_decode() {
            ApiError::Unknown {
                status: value.status().map(|s| s.as_u16()),
                message: format!("failed to read response body: {value}"),
            }
        } else {
            ApiError::Unknown {
                status: value.status().map(|s| s.as_u16()),
                message: value.to_string(),
            }
        };

        InfraError(classified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connection_refused_maps_to_network() {
        // Bind then drop a listener so the port is closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = reqwest::Client::new();
        let err = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let infra: InfraError = err.into();
        assert!(matches!(ApiError::from(infra), ApiError::Network(_)));
    }
}
