//! Domain store state containers
//!
//! Each store owns the local copy of one resource collection and issues
//! every backend call through the [`Gateway`](crate::ports::Gateway) port.
//! Mutations on soft resources run through the degraded-mode fallback
//! policy; payment-like operations and authentication never do.

pub mod brand;
pub mod meeting;
pub mod product;
pub mod team;

pub use brand::BrandStore;
pub use meeting::MeetingStore;
pub use product::ProductStore;
pub use team::TeamStore;

use pavilion_domain::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Decode a response body into a domain type.
///
/// Backends commonly wrap payloads in a `data` envelope; both shapes are
/// accepted.
pub(crate) fn decode<T: DeserializeOwned>(body: &Value) -> Result<T> {
    let payload = body.get("data").unwrap_or(body);
    serde_json::from_value(payload.clone()).map_err(|err| ApiError::Unknown {
        status: None,
        message: format!("failed to decode response body: {err}"),
    })
}

/// Serialize a request payload.
pub(crate) fn to_payload<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| ApiError::Unknown {
        status: None,
        message: format!("failed to encode request payload: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_accepts_bare_and_enveloped_payloads() {
        let bare = json!({ "id": "1", "name": "Ana", "email": "a@x", "role": "buyer" });
        let wrapped = json!({ "data": bare.clone() });

        let from_bare: pavilion_domain::TeamMember = decode(&bare).unwrap();
        let from_wrapped: pavilion_domain::TeamMember = decode(&wrapped).unwrap();
        assert_eq!(from_bare, from_wrapped);
    }

    #[test]
    fn decode_reports_shape_mismatches() {
        let err = decode::<pavilion_domain::TeamMember>(&json!("not an object")).unwrap_err();
        assert!(matches!(err, ApiError::Unknown { .. }));
    }
}
