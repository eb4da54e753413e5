//! YouTrack authentication

/// Permanent-token credentials for the YouTrack REST API.
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
