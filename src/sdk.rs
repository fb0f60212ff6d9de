//! SDK entry point
//!
//! [`Malipo`] holds one client per configured provider. It is an ordinary
//! value: build it from a [`Config`], share it behind an `Arc`, and build
//! as many as needed (for example one per merchant account).

use std::sync::Arc;

use crate::config::Config;
use crate::error::{MalipoError, Result};
use crate::providers::{OneKhusa, PawaPay, PayChangu};

/// Names of every provider the SDK knows about.
pub const PROVIDERS: [&str; 3] = ["paychangu", "pawapay", "onekhusa"];

/// Clients for the configured payment providers.
///
/// # Examples
///
/// ```no_run
/// use malipo::config::{Config, PawaPayConfig};
/// use malipo::Malipo;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     pawapay: Some(PawaPayConfig::new("api-token")),
///     ..Config::default()
/// };
/// let sdk = Malipo::from_config(&config)?;
/// let balances = sdk.require_pawapay()?.wallets().balances().await?;
/// println!("{}", balances);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Malipo {
    paychangu: Option<Arc<PayChangu>>,
    pawapay: Option<Arc<PawaPay>>,
    onekhusa: Option<Arc<OneKhusa>>,
}

impl Malipo {
    /// Validates `config` and builds a client for each configured provider.
    ///
    /// # Errors
    ///
    /// Returns the first validation or client construction failure.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let paychangu = config
            .paychangu
            .as_ref()
            .map(PayChangu::new)
            .transpose()?
            .map(Arc::new);
        let pawapay = config
            .pawapay
            .as_ref()
            .map(|c| PawaPay::new(c, config.environment))
            .transpose()?
            .map(Arc::new);
        let onekhusa = config
            .onekhusa
            .as_ref()
            .map(|c| OneKhusa::new(c, config.environment))
            .transpose()?
            .map(Arc::new);

        let sdk = Self {
            paychangu,
            pawapay,
            onekhusa,
        };
        tracing::info!(
            providers = ?sdk.configured_providers(),
            environment = %config.environment,
            "Malipo SDK initialized"
        );
        Ok(sdk)
    }

    /// Replaces the PayChangu client.
    pub fn with_paychangu(mut self, client: PayChangu) -> Self {
        self.paychangu = Some(Arc::new(client));
        self
    }

    /// Replaces the pawaPay client.
    pub fn with_pawapay(mut self, client: PawaPay) -> Self {
        self.pawapay = Some(Arc::new(client));
        self
    }

    /// Replaces the OneKhusa client.
    pub fn with_onekhusa(mut self, client: OneKhusa) -> Self {
        self.onekhusa = Some(Arc::new(client));
        self
    }

    /// The PayChangu client, if configured.
    pub fn paychangu(&self) -> Option<&Arc<PayChangu>> {
        self.paychangu.as_ref()
    }

    /// The pawaPay client, if configured.
    pub fn pawapay(&self) -> Option<&Arc<PawaPay>> {
        self.pawapay.as_ref()
    }

    /// The OneKhusa client, if configured.
    pub fn onekhusa(&self) -> Option<&Arc<OneKhusa>> {
        self.onekhusa.as_ref()
    }

    /// The PayChangu client, or [`MalipoError::ProviderNotConfigured`].
    pub fn require_paychangu(&self) -> Result<&Arc<PayChangu>> {
        self.paychangu
            .as_ref()
            .ok_or_else(|| MalipoError::ProviderNotConfigured("paychangu".to_string()).into())
    }

    /// The pawaPay client, or [`MalipoError::ProviderNotConfigured`].
    pub fn require_pawapay(&self) -> Result<&Arc<PawaPay>> {
        self.pawapay
            .as_ref()
            .ok_or_else(|| MalipoError::ProviderNotConfigured("pawapay".to_string()).into())
    }

    /// The OneKhusa client, or [`MalipoError::ProviderNotConfigured`].
    pub fn require_onekhusa(&self) -> Result<&Arc<OneKhusa>> {
        self.onekhusa
            .as_ref()
            .ok_or_else(|| MalipoError::ProviderNotConfigured("onekhusa".to_string()).into())
    }

    /// Names of the providers that have a client.
    pub fn configured_providers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.paychangu.is_some() {
            names.push(PROVIDERS[0]);
        }
        if self.pawapay.is_some() {
            names.push(PROVIDERS[1]);
        }
        if self.onekhusa.is_some() {
            names.push(PROVIDERS[2]);
        }
        names
    }
}
