//! Auth service - session establishment and teardown
//!
//! Wraps the `/auth/*` surface. Authentication is the one place the
//! degraded-mode fallback must never apply: every failure here surfaces.

use std::sync::Arc;

use pavilion_common::session::SessionManager;
use pavilion_domain::{ApiError, RequestDescriptor, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::ports::Gateway;

/// Service wrapping authentication operations
pub struct AuthService {
    gateway: Arc<dyn Gateway>,
    session: Arc<SessionManager>,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(gateway: Arc<dyn Gateway>, session: Arc<SessionManager>) -> Self {
        Self { gateway, session }
    }

    /// Log in and store the returned bearer token.
    ///
    /// # Errors
    /// Propagates the classified error on failure, or `Unknown` when the
    /// backend response carries no token.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let descriptor = RequestDescriptor::post("/auth/login")
            .json(json!({ "email": email, "password": password }));
        let response = self.gateway.send(descriptor).await?;

        let token = response
            .body()
            .get("token")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ApiError::Unknown {
                status: Some(response.status()),
                message: "login response did not include a token".into(),
            })?;

        self.session.set_token(token).await.map_err(storage_error)?;
        debug!("login succeeded; session established");
        Ok(())
    }

    /// Register a new account. Does not establish a session.
    ///
    /// # Errors
    /// Propagates the classified error on failure.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let descriptor = RequestDescriptor::post("/auth/register")
            .json(json!({ "name": name, "email": email, "password": password }));
        self.gateway.send(descriptor).await?;
        Ok(())
    }

    /// Check whether the current session is still valid on the backend.
    ///
    /// # Errors
    /// `Unauthorized` when the token was rejected (the gateway has already
    /// torn the session down by the time this returns).
    pub async fn check_session(&self) -> Result<()> {
        self.gateway.send(RequestDescriptor::get("/auth/session")).await?;
        Ok(())
    }

    /// Verify a one-time password sent to the given address.
    ///
    /// # Errors
    /// Propagates the classified error on failure.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<()> {
        let descriptor = RequestDescriptor::post("/auth/verify-otp")
            .json(json!({ "email": email, "code": code }));
        self.gateway.send(descriptor).await?;
        Ok(())
    }

    /// Request a fresh one-time password.
    ///
    /// # Errors
    /// Propagates the classified error on failure.
    pub async fn resend_otp(&self, email: &str) -> Result<()> {
        let descriptor =
            RequestDescriptor::post("/auth/resend-otp").json(json!({ "email": email }));
        self.gateway.send(descriptor).await?;
        Ok(())
    }

    /// Start a password reset for the given address.
    ///
    /// # Errors
    /// Propagates the classified error on failure.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let descriptor =
            RequestDescriptor::post("/auth/password-reset").json(json!({ "email": email }));
        self.gateway.send(descriptor).await?;
        Ok(())
    }

    /// Change the password of the authenticated account.
    ///
    /// # Errors
    /// Propagates the classified error on failure.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<()> {
        let descriptor = RequestDescriptor::post("/auth/change-password")
            .json(json!({ "currentPassword": current, "newPassword": new }));
        self.gateway.send(descriptor).await?;
        Ok(())
    }

    /// Log out: best-effort notification to the backend, then local teardown.
    ///
    /// The token and every cached response are cleared even when the backend
    /// call fails; staying logged in locally would be worse.
    ///
    /// # Errors
    /// Returns `Unknown` only when token storage itself fails.
    pub async fn logout(&self) -> Result<()> {
        if let Err(err) = self.gateway.send(RequestDescriptor::post("/auth/logout")).await {
            warn!(error = %err, "logout request failed; clearing session locally anyway");
        }

        self.session.clear().await.map_err(storage_error)?;
        self.gateway.clear_cached_responses();
        Ok(())
    }
}

fn storage_error(message: String) -> ApiError {
    ApiError::Unknown { status: None, message: format!("token storage: {message}") }
}
