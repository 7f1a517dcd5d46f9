use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;

/// Lowest non-privileged port a caller may request explicitly.
pub const MIN_PORT: u16 = 1024;

/// Word list used when no dictionary is given.
pub const DEFAULT_DICTIONARY: &str = "/usr/share/dict/words";

/// Runtime configuration for the `crackserver` binary.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file is honoured too).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "crackserver",
    version,
    about = "A multi-client TCP service for crypt hashing and dictionary cracking"
)]
pub struct CliArgs {
    /// Maximum number of simultaneously connected clients.
    ///
    /// Further connections wait in the listen backlog until a session ends.
    /// Use 0 for no limit.
    ///
    /// Environment variable: `MAX_CONNECTIONS`
    #[arg(long = "maxconn", env = "MAX_CONNECTIONS", default_value_t = 0)]
    pub max_connections: usize,

    /// TCP port to listen on, either 0 (let the OS choose) or 1024-65535.
    ///
    /// The effective port is printed to stderr once listening.
    ///
    /// Environment variable: `PORT`
    #[arg(long, env = "PORT", default_value_t = 0)]
    pub port: u16,

    /// Newline-delimited word list searched by `crack` requests.
    ///
    /// Environment variable: `DICTIONARY`
    #[arg(long, env = "DICTIONARY", default_value = DEFAULT_DICTIONARY)]
    pub dictionary: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `None` means unlimited.
    pub max_connections: Option<usize>,
    pub port: u16,
    pub dictionary: PathBuf,
}

impl ServerConfig {
    /// Address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.port != 0 && args.port < MIN_PORT {
            bail!(
                "PORT ({}) must be 0 or between {} and {}",
                args.port,
                MIN_PORT,
                u16::MAX
            );
        }

        Ok(Self {
            max_connections: (args.max_connections > 0).then_some(args.max_connections),
            port: args.port,
            dictionary: args.dictionary,
        })
    }
}
