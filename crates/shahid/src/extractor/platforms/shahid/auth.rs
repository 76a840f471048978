use std::fmt;

use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::api::{ShahidApi, read_json_or_fault};
use super::models::{LoginRequest, LoginResponse, LoginUser};
use crate::extractor::error::ExtractorError;
use crate::extractor::utils::str_or_none;

/// Account credentials. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account fields the web front end needs to bind a session.
#[derive(Debug)]
struct SessionContext {
    first_name: String,
    last_name: String,
    user_name: String,
    subscriber_id: String,
    session_id: String,
}

impl TryFrom<LoginUser> for SessionContext {
    type Error = ExtractorError;

    fn try_from(user: LoginUser) -> Result<Self, Self::Error> {
        let missing =
            |field: &str| ExtractorError::Auth(format!("login response has no {field}"));

        Ok(Self {
            user_name: user
                .email
                .filter(|email| !email.is_empty())
                .ok_or_else(|| missing("email"))?,
            subscriber_id: str_or_none(&user.id)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| missing("id"))?,
            session_id: user
                .session_id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| missing("sessionId"))?,
            first_name: user.first_name.unwrap_or_default(),
            last_name: user.last_name.unwrap_or_default(),
        })
    }
}

impl SessionContext {
    fn into_form(self) -> [(&'static str, String); 6] {
        [
            ("firstName", self.first_name),
            ("lastName", self.last_name),
            ("userName", self.user_name.clone()),
            ("csg_user_name", self.user_name),
            ("subscriberId", self.subscriber_id),
            ("sessionId", self.session_id),
        ]
    }
}

impl ShahidApi {
    /// Logs in and binds the session to this client's cookie store.
    ///
    /// Runs the login call, then posts the returned account fields to the
    /// context endpoint. Both steps must succeed before signed calls see the
    /// session. Login faults, and a user record without email, id or session id,
    /// fail with [`ExtractorError::Auth`].
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), ExtractorError> {
        info!("Logging in to Shahid as {}", credentials.username());
        let endpoints = self.options().endpoints.clone();

        let response = self
            .extractor()
            .post(&endpoints.login_url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/json; charset=UTF-8",
            )
            .body(serde_json::to_vec(&LoginRequest {
                email: &credentials.username,
                password: &credentials.password,
                basic: "false",
            })?)
            .send()
            .await?;
        self.extractor_mut()
            .parse_and_store_cookies(response.headers());

        let LoginResponse { user } = read_json_or_fault(response, ExtractorError::Auth).await?;
        let context = SessionContext::try_from(user)?;
        debug!("Populating context for subscriber {}", context.subscriber_id);

        let response = self
            .extractor()
            .post(&endpoints.populate_context_url)
            .form(&context.into_form())
            .send()
            .await?
            .error_for_status()?;
        self.extractor_mut()
            .parse_and_store_cookies(response.headers());

        info!("Logged in to Shahid");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_context_form() {
        let user: LoginUser = serde_json::from_value(json!({
            "firstName": "Sara",
            "lastName": "Ali",
            "email": "sara@example.com",
            "id": 42,
            "sessionId": "s-1",
        }))
        .unwrap();

        let form = SessionContext::try_from(user).unwrap().into_form();
        assert_eq!(form[2], ("userName", "sara@example.com".to_string()));
        assert_eq!(form[3], ("csg_user_name", "sara@example.com".to_string()));
        assert_eq!(form[4], ("subscriberId", "42".to_string()));
        assert_eq!(form[5], ("sessionId", "s-1".to_string()));
    }

    #[test]
    fn test_session_context_requires_session_fields() {
        let user: LoginUser = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            SessionContext::try_from(user),
            Err(ExtractorError::Auth(message)) if message.contains("email")
        ));

        let user: LoginUser = serde_json::from_value(json!({
            "email": "sara@example.com",
            "id": 42,
        }))
        .unwrap();
        assert!(matches!(
            SessionContext::try_from(user),
            Err(ExtractorError::Auth(message)) if message.contains("sessionId")
        ));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("sara@example.com", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("sara@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
