pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, Validate,
};
use clap::Parser;
use toml_config::GatewayToml;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = ".";

/// Command line and environment options. Anything left unset here may be
/// filled from the TOML file given with `--config`.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "picks-gateway")]
#[command(about = "Read-only JSON gateway and static host for the predictions frontend")]
pub struct GatewayConfig {
    #[arg(long, env = "GATEWAY_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "STATIC_DIR", help = "Directory holding index.html and assets")]
    pub static_dir: Option<String>,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    #[arg(long = "config", env = "GATEWAY_CONFIG", help = "Optional TOML config file")]
    pub config_file: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl GatewayConfig {
    /// Loads the `--config` file, if any, underneath the CLI/env values.
    pub fn resolve(mut self) -> Result<Self> {
        if let Some(path) = self.config_file.clone() {
            let file = GatewayToml::from_file(&path)?;
            self.merge_file(file);
        }
        Ok(self)
    }

    /// Fills fields that are still unset from `file`; flags set on the
    /// command line win.
    pub fn merge_file(&mut self, file: GatewayToml) {
        if let Some(server) = file.server {
            self.host = self.host.take().or(server.host);
            self.port = self.port.or(server.port);
            self.static_dir = self.static_dir.take().or(server.static_dir);
        }
        if let Some(supabase) = file.supabase {
            self.supabase_url = self.supabase_url.take().or(supabase.url);
            self.supabase_key = self.supabase_key.take().or(supabase.key);
        }
        if let Some(logging) = file.logging {
            self.verbose = self.verbose || logging.verbose.unwrap_or(false);
            self.json_logs = self.json_logs || logging.json.unwrap_or(false);
        }
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

impl ConfigProvider for GatewayConfig {
    fn supabase_url(&self) -> Option<&str> {
        non_blank(self.supabase_url.as_deref())
    }

    fn supabase_key(&self) -> Option<&str> {
        non_blank(self.supabase_key.as_deref())
    }

    fn static_dir(&self) -> &str {
        self.static_dir.as_deref().unwrap_or(DEFAULT_STATIC_DIR)
    }
}

/// An empty `SUPABASE_URL=` counts as unset.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Validate for GatewayConfig {
    /// Credentials are not checked here: missing or unusable ones only
    /// leave the connection disconnected.
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", self.host())?;
        validate_positive_number("server.port", usize::from(self.port()), 1)?;
        validate_path("server.static_dir", self.static_dir())?;
        Ok(())
    }
}
