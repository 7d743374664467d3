/*
 * Responsibility
 * - tokio runtime 起動
 * - report-only の有効化 (authz::set_report_only は main.rs からしか呼べない)
 * - app::run() の呼び出し (それ以外のロジックは置かない)
 */
use anyhow::Result;

use hello_authz::{app, authz, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    app::init_tracing();

    if config.authz_report_only {
        authz::set_report_only(|msg| tracing::warn!(target: "authz", "{msg}"));
    }

    app::run(config).await
}
