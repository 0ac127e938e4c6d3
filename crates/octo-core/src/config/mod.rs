//! Server connection configuration
//!
//! Settings are read from, in order:
//! - an explicit `--config` path
//! - `<config_dir>/octo/octo.toml`
//! - the legacy `~/.config/octopus/cli_config.json`

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{ConfigFormat, parse_config_file, parse_legacy_json_str, parse_octo_toml_str};
pub use paths::{CONFIG_FILE_NAME, legacy_config_path, primary_config_path};
pub use schema::{DEFAULT_TIMEOUT_SECS, OctoConfig, ServerConfig};
pub use store::ConfigStore;
