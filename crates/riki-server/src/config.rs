use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use riki_diff::{DiffConfig, DiffStrategy, SpanStyle};
use riki_query::{FirstEditPolicy, QueryConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings, usually read from a TOML file.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory for page history snapshots. `None` keeps history in memory only.
    pub data_dir: Option<PathBuf>,
    pub first_edit: FirstEditPolicy,
    /// Largest LCS table the diff engine builds before switching to Myers.
    pub max_table_cells: usize,
    /// Request body limit for recording edits.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            data_dir: None,
            first_edit: FirstEditPolicy::default(),
            max_table_cells: DiffConfig::default().max_table_cells,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Query settings derived from this config. Markup is always HTML.
    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            first_edit: self.first_edit,
            diff: DiffConfig {
                strategy: DiffStrategy::Auto,
                max_table_cells: self.max_table_cells,
            },
            style: SpanStyle::html(),
        }
    }
}
