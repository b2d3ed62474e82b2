//! # Widgets API Lambda
//!
//! API Gateway プロキシ統合の背後で、サーバー版と同じルーターを Lambda として実行する。
//!
//! ```bash
//! cargo build -p widgets-api --features lambda --bin widgets-lambda --release
//! ```

use lambda_http::Error;
use widgets_api::{app_builder::build_app, config::ApiConfig, deployment::REST_API_NAME};
use widgets_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing(&TracingConfig::from_env("widgets-lambda"));

    // Lambda ではホスト・ポートは使わず、ステージ設定のみ参照する
    let config = ApiConfig::from_env()?;
    tracing::info!(
        "{} を Lambda として起動します (stage: {})",
        REST_API_NAME,
        config.stage.stage_name
    );

    lambda_http::run(build_app(&config.stage)).await
}
