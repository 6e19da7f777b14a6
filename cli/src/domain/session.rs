//! Device session: where to connect and with which credentials.

use std::fmt;

use crate::domain::error::SessionError;

/// Username/password pair used once at login.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One authenticated interaction with a device.
#[derive(Debug, Clone)]
pub struct Session {
    base_address: String,
    credentials: Credentials,
}

impl Session {
    /// Build a session from a device address and credentials.
    ///
    /// A bare host (`192.168.1.1`) becomes `https://192.168.1.1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address, username or password is empty.
    pub fn new(address: &str, credentials: Credentials) -> Result<Self, SessionError> {
        let address = address.trim().trim_end_matches('/');
        if address.is_empty() {
            return Err(SessionError::EmptyAddress);
        }
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        let base_address = if address.contains("://") {
            address.to_string()
        } else {
            format!("https://{address}")
        };
        Ok(Self {
            base_address,
            credentials,
        })
    }

    #[must_use]
    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
