use crate::core::client::{TadoClient, BASE_URL};
use crate::core::service::TadoService;
use crate::utils::error::{Result, TadoError};
use crate::utils::validation::{validate_non_empty_string, validate_secret, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Account file, e.g.
///
/// ```toml
/// [account]
/// username = "me@example.com"
/// password = "${TADO_PASSWORD}"
///
/// [api]
/// base_url = "https://my.tado.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub account: AccountConfig,
    pub api: Option<ApiConfig>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

impl TomlConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: AccountConfig {
                username: username.into(),
                password: password.into(),
            },
            api: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the value of the environment variable `VAR`.
    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TadoError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> &str {
        self.api
            .as_ref()
            .and_then(|api| api.base_url.as_deref())
            .unwrap_or(BASE_URL)
    }

    pub fn build_client(&self) -> Result<TadoClient> {
        TadoClient::with_base_url(self.base_url())
    }

    /// Validates the configuration and opens a session for its account.
    pub fn build_service(&self) -> Result<TadoService<TadoClient>> {
        self.validate()?;
        let client = self.build_client()?;
        Ok(TadoService::new(
            client,
            self.account.username.clone(),
            self.account.password.clone(),
        ))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("account.username", &self.account.username)?;
        validate_secret("account.password", &self.account.password)?;
        validate_url("api.base_url", self.base_url())?;
        Ok(())
    }
}
