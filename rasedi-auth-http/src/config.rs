use serde::{Deserialize, Serialize};

/// Production endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.rasedi.com";
/// Version segment of every route
pub const DEFAULT_UPSTREAM_VERSION: u32 = 1;

/// Which gateway environment requests are routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  Test,
  #[default]
  Live,
}

impl Environment {
  /// Test keys carry `test` in their id
  pub fn from_key_id(key_id: &str) -> Self {
    if key_id.contains("test") {
      Self::Test
    } else {
      Self::Live
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Test => "test",
      Self::Live => "live",
    }
  }
}

impl std::fmt::Display for Environment {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Routing of API calls. Only the relative url takes part in the request signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  pub upstream_version: u32,
  pub environment: Environment,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      upstream_version: DEFAULT_UPSTREAM_VERSION,
      environment: Environment::default(),
    }
  }
}

impl ApiConfig {
  /// Default endpoint, environment picked from the key id
  pub fn for_key_id(key_id: &str) -> Self {
    Self {
      environment: Environment::from_key_id(key_id),
      ..Default::default()
    }
  }

  /// `/v<version>/payment/rest/<environment><path>`
  pub fn relative_url(&self, path: &str) -> String {
    format!("/v{}/payment/rest/{}{}", self.upstream_version, self.environment, path)
  }

  pub fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), self.relative_url(path))
  }
}
