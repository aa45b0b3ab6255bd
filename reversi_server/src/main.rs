//! オンライン対局サーバーの起動。

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use reversi_server::config::{LogFormat, PORT_ENV, ServerConfig};
use reversi_server::{logging, new_sessions, router};
use tracing::info;

/// コマンドライン引数。
#[derive(Debug, Parser)]
#[command(name = "reversi_server", about = "Reversi online room server")]
struct Cli {
    /// 設定ファイル（TOML）。無ければ既定値を使う。
    #[arg(long, default_value = "reversi_server.toml")]
    config: PathBuf,

    /// 待ち受けアドレス。
    #[arg(long)]
    host: Option<String>,

    /// JSON 形式でログを出す。
    #[arg(long)]
    log_json: bool,

    /// 待ち受けポート（`PORT` 環境変数より優先）。
    #[arg(long)]
    port: Option<u16>,
}

/// 設定ファイル、環境変数、引数の順に重ねて最終的な設定を作る。
fn resolve_config(cli: Cli) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    config.apply_port_env(std::env::var(PORT_ENV).ok().as_deref());
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.log_json {
        config.log.format = LogFormat::Json;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = resolve_config(Cli::parse())?;
    logging::init(&config.log)?;

    let app = router(new_sessions());
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;

    info!(host = %config.host, port = config.port, log = %config.log.format, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
