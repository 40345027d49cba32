//! Server configuration
//!
//! Everything the server needs is carried in one [`ServerConfig`] value
//! handed to [`crate::Server`] at construction.

use crate::{Error, Result};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
    /// Base directory for `/files/` routes; `None` disables them
    pub directory: Option<PathBuf>,
    pub workers: usize,
    /// Budget for reading one whole request
    pub read_timeout: Duration,
    pub max_head_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 4221,
            directory: None,
            workers: num_cpus::get(),
            read_timeout: Duration::from_secs(30),
            max_head_bytes: 8 * 1024,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Request size and time limits applied per connection
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub read_timeout: Duration,
    pub max_head_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        ServerConfig::default().limits()
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the file directory; an empty path leaves file routes disabled
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        self.directory = (!directory.as_os_str().is_empty()).then_some(directory);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn max_head_bytes(mut self, bytes: usize) -> Self {
        self.max_head_bytes = bytes;
        self
    }

    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    pub fn limits(&self) -> Limits {
        Limits {
            read_timeout: self.read_timeout,
            max_head_bytes: self.max_head_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Resolve `hostname:port` to a bindable address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.hostname.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| Error::Config(format!("cannot resolve {}: {}", self.hostname, e)))?
            .next()
            .ok_or_else(|| Error::Config(format!("no address for {}", self.hostname)))
    }

    /// Build a configuration from command-line arguments (program name excluded)
    ///
    /// Accepts `--directory`, `--port`, `--host` and `--workers`, each as
    /// `--flag value` or `--flag=value`.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg, None),
            };

            let mut value = || {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| Error::Config(format!("missing value for {}", flag)))
            };

            match flag.as_str() {
                "--directory" => config = config.directory(value()?),
                "--host" => config = config.hostname(value()?),
                "--port" => config = config.port(parse_number(&flag, &value()?)?),
                "--workers" => config = config.workers(parse_number(&flag, &value()?)?),
                _ => return Err(Error::Config(format!("unknown argument: {}", flag))),
            }
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {}: {:?}", flag, value)))
}
