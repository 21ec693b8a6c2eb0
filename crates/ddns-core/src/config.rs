//! Configuration types for the DDNS updater
//!
//! A [`DdnsConfig`] describes one invocation: which command to run, where the
//! public IP comes from, which provider and credential to use, and which
//! records to look at. The binary builds it from the command line.

use serde::{Deserialize, Serialize};

/// Invocation parameters for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Command to execute
    #[serde(default)]
    pub command: Command,

    /// Public IP discovery settings
    #[serde(default)]
    pub ip: IpConfig,

    /// DNS provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// DNS records to inspect or update
    #[serde(default)]
    pub records: Vec<RecordConfig>,

    /// Skip the interactive confirmation before updating a record
    #[serde(default)]
    pub assume_yes: bool,
}

impl DdnsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    ///
    /// `update` always needs records, a provider and a credential. `list`
    /// without records only reports the public IP, so it needs neither.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let needs_provider = match self.command {
            Command::Update => {
                if self.records.is_empty() {
                    return Err(crate::Error::config(
                        "No domains configured (use -d <domain>)",
                    ));
                }
                true
            }
            Command::List => !self.records.is_empty(),
        };

        if needs_provider {
            self.provider.validate()?;
        }

        for record in &self.records {
            record.validate()?;
        }

        self.ip.validate()
    }
}

/// Command to run against the configured records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Resolve and print, never mutate
    #[default]
    List,
    /// Resolve and write the public IP where it differs
    Update,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::List => f.write_str("list"),
            Command::Update => f.write_str("update"),
        }
    }
}

/// IP version whose reflector set is queried
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    /// IPv4 only
    #[default]
    V4,
    /// IPv6 only
    V6,
    /// IPv6 reflectors first, then IPv4
    Both,
}

impl IpVersion {
    /// Derive the version from repeated `-4` / `-6` flags
    ///
    /// Each `-4` counts 4 and each `-6` counts 6. A total of 10 or more
    /// selects both sets, exactly 6 selects IPv6, anything else IPv4.
    pub fn from_flag_counts(v4: u8, v6: u8) -> Self {
        let total = u32::from(v4) * 4 + u32::from(v6) * 6;
        match total {
            t if t >= 10 => IpVersion::Both,
            6 => IpVersion::V6,
            _ => IpVersion::V4,
        }
    }
}

/// Public IP discovery configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpConfig {
    /// Reflector set to use when no override list is given
    #[serde(default)]
    pub version: IpVersion,

    /// Literal address that bypasses discovery entirely
    #[serde(default)]
    pub forced: Option<String>,

    /// Reflector URLs replacing the built-in list
    #[serde(default)]
    pub reflectors: Vec<String>,
}

impl IpConfig {
    /// Validate the IP configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if let Some(ref forced) = self.forced
            && forced.trim().is_empty()
        {
            return Err(crate::Error::config("Forced IP address cannot be empty"));
        }

        for url in &self.reflectors {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "Reflector URL must use HTTP or HTTPS scheme. Got: {}",
                    url
                )));
            }
        }

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier as registered in the
    /// [`ProviderRegistry`](crate::ProviderRegistry)
    #[serde(default)]
    pub name: Option<String>,

    /// Literal API token or path to a token file
    ///
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub credential: Option<String>,
}

// Custom Debug implementation that hides the credential
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("credential", &self.credential.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl ProviderConfig {
    /// Create a provider configuration
    pub fn new(name: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            credential: Some(credential.into()),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.as_deref().is_none_or(str::is_empty) {
            return Err(crate::Error::config(
                "No DNS provider selected (use -D <provider>)",
            ));
        }
        if self.credential.as_deref().is_none_or(str::is_empty) {
            return Err(crate::Error::config(
                "No provider credential given (use -T <token or file>)",
            ));
        }
        Ok(())
    }

    /// Get the provider type name
    pub fn type_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// DNS record to inspect or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Fully qualified record name (e.g. "my.example.com")
    pub name: String,

    /// Explicit zone, skipping zone derivation
    #[serde(default)]
    pub zone: Option<String>,
}

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone: None,
        }
    }

    /// Set an explicit zone
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Parse a `-d` argument, either `fqdn` or `zone:fqdn`
    ///
    /// The split happens at the first `:`. An empty zone part means no
    /// override, and a single trailing `.` on the name is dropped.
    pub fn parse(arg: &str) -> Self {
        let (zone, name) = match arg.split_once(':') {
            Some((zone, name)) => (Some(zone.trim()), name),
            None => (None, arg),
        };

        let name = name.trim();
        let name = name.strip_suffix('.').unwrap_or(name);

        Self {
            name: name.to_string(),
            zone: zone.filter(|z| !z.is_empty()).map(str::to_string),
        }
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.is_empty() {
            return Err(crate::Error::config("Domain name cannot be empty"));
        }
        if self.name.split('.').any(str::is_empty) {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                self.name
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for RecordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.zone {
            Some(ref zone) => write!(f, "{}:{}", zone, self.name),
            None => f.write_str(&self.name),
        }
    }
}
