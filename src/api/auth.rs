// Authentication endpoints
// register / login persist the returned token and user to the session store,
// the way the web client wrote them to localStorage.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, ApiResult};
use crate::session::Session;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload of successful register/login responses.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl ApiClient {
    /// Register a new account and persist the session.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        tracing::info!(email = %request.email, "Registering user");

        let auth: AuthResponse = self
            .send(self.http().post(self.url("/auth/register")).json(request))
            .await?;

        self.store_session(&auth)?;
        Ok(auth)
    }

    /// Log in and persist the session.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        tracing::info!(%email, "Logging in");

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .send(self.http().post(self.url("/auth/login")).json(&request))
            .await?;

        if auth.token.is_empty() {
            return Err(ApiError::UnexpectedShape(
                "login response carried an empty token".to_string(),
            ));
        }

        self.store_session(&auth)?;
        Ok(auth)
    }

    /// Fetch the authenticated user's profile (`GET /auth/me`).
    pub async fn profile(&self) -> ApiResult<User> {
        let token = self.bearer()?;
        self.send(self.http().get(self.url("/auth/me")).bearer_auth(token))
            .await
    }

    /// Drop the stored session. Purely local, like the web client's logout.
    pub fn logout(&self) -> ApiResult<()> {
        self.session()
            .clear()
            .map_err(|e| ApiError::Session(e.to_string()))
    }

    /// The locally cached user, without a network round-trip.
    pub fn current_user(&self) -> Option<User> {
        self.session().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    fn store_session(&self, auth: &AuthResponse) -> ApiResult<()> {
        let session = Session {
            token: auth.token.clone(),
            user: auth.user.clone(),
        };
        self.session()
            .save(&session)
            .map_err(|e| ApiError::Session(e.to_string()))
    }
}
