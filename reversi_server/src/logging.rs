use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

/// グローバルな `tracing` サブスクライバを設定する。
///
/// `RUST_LOG` があればそれを、無ければ設定ファイルのフィルタを使う。
///
/// # Errors
///
/// フィルタが解釈できない、または既にサブスクライバが設定済みの場合。
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(value) => value,
        Err(_err) => EnvFilter::try_new(&config.filter)
            .with_context(|| format!("invalid log filter {:?}", config.filter))?,
    };

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    installed.map_err(|err| anyhow::anyhow!(err))
}
