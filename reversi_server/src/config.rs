use std::path::{Path, PathBuf};

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 既定の待ち受けポート。
pub const DEFAULT_PORT: u16 = 3000;

/// ポートを上書きする環境変数。
pub const PORT_ENV: &str = "PORT";

/// 設定の読み込み・検証エラー。
#[derive(Debug, Display, Error, From)]
pub enum ConfigError {
    /// ファイルを読めなかった。
    #[display("failed to read config file {}: {source}", path.display())]
    #[from(ignore)]
    FileRead {
        /// 設定ファイルのパス。
        path: PathBuf,
        /// 原因。
        source: std::io::Error,
    },
    /// TOML として解釈できなかった。
    #[display("failed to parse TOML: {_0}")]
    Parse(toml::de::Error),
    /// 値が不正。
    #[display("invalid config: {message}")]
    #[from(ignore)]
    Validation {
        /// 理由。
        message: String,
    },
}

/// ログの出力形式。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// 1行1イベントの JSON。
    Json,
    /// 人が読むための整形出力。
    #[default]
    Pretty,
}

/// ログ設定。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` 形式のフィルタ（`RUST_LOG` が優先）。
    pub filter: String,
    /// 出力形式。
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: String::from("info"),
            format: LogFormat::Pretty,
        }
    }
}

/// サーバー設定（TOML から読み込み可能）。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 待ち受けアドレス。
    pub host: String,
    /// ログ設定。
    pub log: LogConfig,
    /// 待ち受けポート。
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            log: LogConfig::default(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// TOML ファイルから読み込んで検証する。
    ///
    /// # Errors
    ///
    /// 読み込み・解釈・検証のいずれかに失敗した場合。
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    /// ファイルがあれば読み込み、無ければ既定値を返す。
    ///
    /// # Errors
    ///
    /// ファイルが存在し、読み込みか検証に失敗した場合。
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// TOML 文字列から読み込んで検証する。
    ///
    /// # Errors
    ///
    /// 解釈か検証に失敗した場合。
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `PORT` 環境変数の値でポートを上書きする（解釈できない値は無視）。
    pub fn apply_port_env(&mut self, value: Option<&str>) {
        let Some(raw) = value else {
            return;
        };
        match raw.trim().parse::<u16>() {
            Ok(port) => self.port = port,
            Err(err) => warn!(value = raw, error = %err, "ignoring unparsable {PORT_ENV}"),
        }
    }

    /// 値を検証する。
    ///
    /// # Errors
    ///
    /// ホストが空、またはポートが 0 の場合。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: String::from("host must not be empty"),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::Validation {
                message: String::from("port must be > 0"),
            });
        }
        Ok(())
    }
}
