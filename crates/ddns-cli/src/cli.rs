use clap::{ArgAction, Parser, ValueEnum};
use ddns_core::config::{Command, DdnsConfig, IpConfig, IpVersion, ProviderConfig, RecordConfig};

macro_rules! env_prefix {
    () => {
        "DDNS_"
    };
}

/// Variable overriding the `-v` count when larger
pub const VERBOSE_ENV: &str = concat!(env_prefix!(), "VERBOSE");

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "ddns",
    author,
    version,
    about = "Point DNS records at this host's public IP address",
    long_about = None
)]
pub struct Cli {
    /// Use the IPv4 reflectors (default). Combine with -6 to try IPv6 first, then IPv4
    #[arg(short = '4', action = ArgAction::Count)]
    pub ipv4: u8,

    /// Use the IPv6 reflectors
    #[arg(short = '6', action = ArgAction::Count)]
    pub ipv6: u8,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Assume yes to all update prompts
    #[arg(short = 'Y', long = "yes", action = ArgAction::SetTrue)]
    pub assume_yes: bool,

    /// Domain to manage, optionally prefixed with its zone. Repeatable
    #[arg(short = 'd', long = "domain", value_name = "[ZONE:]DOMAIN")]
    pub domains: Vec<String>,

    /// DNS provider to use
    #[arg(
        short = 'D',
        long,
        value_name = "PROVIDER",
        env = concat!(env_prefix!(), "PROVIDER")
    )]
    pub provider: Option<String>,

    /// Use this address instead of asking the reflectors
    #[arg(
        short = 'i',
        long = "ip",
        value_name = "ADDR",
        env = concat!(env_prefix!(), "IP")
    )]
    pub ip: Option<String>,

    /// Reflector URLs replacing the built-in list, separated by commas or whitespace
    #[arg(short = 'P', long = "reflector", value_name = "URL")]
    pub reflectors: Vec<String>,

    /// API token, or path to a file with a `key = value` token entry
    #[arg(
        short = 'T',
        long = "token",
        value_name = "CREDENTIAL",
        env = concat!(env_prefix!(), "TOKEN"),
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// What to do with the domains
    #[arg(value_enum, default_value_t = CommandArg::List)]
    pub command: CommandArg,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum CommandArg {
    /// Show the public IP and each record's current content
    List,
    /// Point records at the public IP
    Update,
}

impl From<CommandArg> for Command {
    fn from(value: CommandArg) -> Self {
        match value {
            CommandArg::List => Command::List,
            CommandArg::Update => Command::Update,
        }
    }
}

impl Cli {
    /// Build the run configuration from the parsed arguments
    ///
    /// No validation happens here; see [`DdnsConfig::validate`].
    pub fn into_config(self) -> DdnsConfig {
        DdnsConfig {
            command: self.command.into(),
            ip: IpConfig {
                version: IpVersion::from_flag_counts(self.ipv4, self.ipv6),
                forced: self.ip,
                reflectors: split_reflectors(&self.reflectors),
            },
            provider: ProviderConfig {
                name: self.provider,
                credential: self.token,
            },
            records: self
                .domains
                .iter()
                .map(|domain| RecordConfig::parse(domain))
                .collect(),
            assume_yes: self.assume_yes,
        }
    }
}

/// Flatten `-P` values, each of which may hold several URLs
fn split_reflectors(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
