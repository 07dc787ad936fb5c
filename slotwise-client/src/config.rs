//! Client configuration

/// Configuration for connecting to the backend API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Tenant/owner identifier scoping every request
    pub owner: String,

    /// Optional project identifier
    pub project: Option<String>,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new configuration for the given tenant
    pub fn new(base_url: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            owner: owner.into(),
            project: None,
            token: None,
            timeout: 30,
        }
    }

    /// Set the project identifier
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080", "default")
    }
}
