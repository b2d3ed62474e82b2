//! # Widgets API サーバー
//!
//! Widget の一覧・作成・更新・削除を受け付ける REST API サーバー。
//! 永続化は行わず、各ハンドラは受け取った内容を確認メッセージとともに返す。
//!
//! ## 環境変数
//!
//! 設定項目は [`widgets_api::config`] を参照。ログ出力は以下で制御する。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,widgets=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p widgets-api
//!
//! # 本番環境（環境変数を直接指定）
//! WIDGETS_PORT=8080 LOG_FORMAT=json cargo run -p widgets-api --release
//! ```

use anyhow::Context as _;
use tokio::net::TcpListener;
use widgets_api::{app_builder::build_app, config::ApiConfig, deployment::REST_API_NAME};
use widgets_shared::observability::{TracingConfig, init_tracing};

/// Widgets API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. ルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env("widgets-api"));
    let _tracing_guard = tracing::info_span!("app", service = "widgets-api").entered();

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "{} を起動します: {}:{} (stage: {})",
        REST_API_NAME,
        config.host,
        config.port,
        config.stage.stage_name
    );

    let app = build_app(&config.stage);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("{}:{} へのバインドに失敗しました", config.host, config.port))?;
    let addr = listener
        .local_addr()
        .context("バインドアドレスの取得に失敗しました")?;
    tracing::info!("{} が起動しました: {}", REST_API_NAME, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("サーバーが異常終了しました")?;

    tracing::info!("{} を停止しました", REST_API_NAME);
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
///
/// シグナルハンドラの登録に失敗した場合はそのシグナルを待たない。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+C ハンドラの登録に失敗しました: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM ハンドラの登録に失敗しました: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl+C を受信しました。シャットダウンします"),
        () = terminate => tracing::info!("SIGTERM を受信しました。シャットダウンします"),
    }
}
