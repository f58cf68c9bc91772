use std::time::Duration;

use url::Url;

use crate::Result;
use crate::auth::Credentials;

/// Production integrator host (XML endpoint family).
pub const DEFAULT_INTEGRATOR_URL: &str = "http://gw.edostavka.ru:11443/";

/// Production JSON calculator endpoint.
pub const DEFAULT_CALCULATOR_URL: &str =
    "http://api.cdek.ru/calculator/calculate_price_by_json.php";

/// Client bootstrap configuration.
///
/// Endpoints default to the provider's fixed production URLs; overriding
/// them is mainly for tests. The optional timeout is the only deadline in
/// the system and applies at the transport boundary.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub integrator_url: Url,
    pub calculator_url: Url,
    pub credentials: Credentials,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self {
            integrator_url: Url::parse(DEFAULT_INTEGRATOR_URL)?,
            calculator_url: Url::parse(DEFAULT_CALCULATOR_URL)?,
            credentials,
            timeout: None,
        })
    }

    pub fn from_raw(account: &str, secret: &str) -> Result<Self> {
        Self::new(Credentials::new(account, secret))
    }

    #[must_use]
    pub fn with_integrator_url(mut self, url: Url) -> Self {
        self.integrator_url = url;
        self
    }

    #[must_use]
    pub fn with_calculator_url(mut self, url: Url) -> Self {
        self.calculator_url = url;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::ClientConfig;

    #[test]
    fn defaults_point_at_the_production_endpoints() {
        let config = ClientConfig::from_raw("acct", "secret").expect("default config");

        assert_eq!(config.integrator_url.as_str(), "http://gw.edostavka.ru:11443/");
        assert_eq!(
            config.integrator_url.join("pvzlist.php").expect("join").as_str(),
            "http://gw.edostavka.ru:11443/pvzlist.php"
        );
        assert!(config.timeout.is_none());
    }
}
