//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health
//! ```
//!
//! デプロイ宣言には含まれない運用向けエンドポイント。アクセスログの対象外。

use axum::Json;
use widgets_shared::HealthResponse;

/// ヘルスチェックエンドポイント
///
/// 常に 200 OK と Cargo.toml のバージョンを返す。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
