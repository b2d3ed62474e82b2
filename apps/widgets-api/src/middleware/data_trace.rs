//! # データトレースミドルウェア
//!
//! ステージ設定でデータトレースが有効な場合に、リクエストとレスポンスのボディを
//! DEBUG レベルでログに出力する。
//!
//! ## ログフィールド
//!
//! | フィールド | 内容 |
//! |-----------|------|
//! | `log.kind` | `"data_trace"` 固定 |
//! | `http.direction` | `"request"` / `"response"` |
//! | `http.body_bytes` | ボディのバイト数 |
//! | `http.body` | ボディ（UTF-8 として解釈、[`MAX_LOGGED_BODY_BYTES`] で切り詰め） |
//! | `http.body_truncated` | 切り詰めたかどうか |
//!
//! 長さが分かっていて [`MAX_BUFFERED_BODY_BYTES`] 以下のボディだけをバッファリングし、
//! 読み取った内容を下流に渡し直す。それ以外のボディは読まずにそのまま通し、
//! トレースしなかったことだけを記録する。ボディの上限判定は各ハンドラの抽出器に任せる。

use std::borrow::Cow;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::Request,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// バッファリングするボディの上限（axum の `DefaultBodyLimit` と同じ 2 MiB）
pub const MAX_BUFFERED_BODY_BYTES: usize = 2 * 1024 * 1024;

/// ログに出力するボディの上限
pub const MAX_LOGGED_BODY_BYTES: usize = 4096;

/// リクエスト・レスポンスのボディをログに出力する
pub async fn data_trace(request: Request, next: Next) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let body = if is_bufferable(&body) {
        let bytes = axum::body::to_bytes(body, MAX_BUFFERED_BODY_BYTES)
            .await
            .map_err(|e| ApiError::BadRequest(format!("リクエストボディの読み取りに失敗: {e}")))?;
        trace_body("request", &bytes);
        Body::from(bytes)
    } else {
        trace_skipped("request", &body);
        body
    };

    let response = next.run(Request::from_parts(parts, body)).await;

    let (parts, body) = response.into_parts();
    let body = if is_bufferable(&body) {
        let bytes = axum::body::to_bytes(body, MAX_BUFFERED_BODY_BYTES)
            .await
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("レスポンスボディの読み取りに失敗: {e}")))?;
        trace_body("response", &bytes);
        Body::from(bytes)
    } else {
        trace_skipped("response", &body);
        body
    };

    Ok(Response::from_parts(parts, body))
}

fn is_bufferable(body: &Body) -> bool {
    body.size_hint()
        .upper()
        .is_some_and(|upper| upper <= MAX_BUFFERED_BODY_BYTES as u64)
}

fn trace_body(direction: &'static str, bytes: &Bytes) {
    let body = loggable_prefix(bytes);

    tracing::debug!(
        log.kind = "data_trace",
        http.direction = direction,
        http.body_bytes = bytes.len() as u64,
        http.body = %body,
        http.body_truncated = bytes.len() > MAX_LOGGED_BODY_BYTES,
        "データトレース"
    );
}

fn trace_skipped(direction: &'static str, body: &Body) {
    tracing::debug!(
        log.kind = "data_trace",
        http.direction = direction,
        http.body_size_hint = ?body.size_hint().upper(),
        "ボディが大きいか長さ不明のためトレースしません"
    );
}

/// ログ用にボディ先頭を UTF-8 として取り出す
///
/// 切り詰め位置で分断されたマルチバイト文字は落とす。
fn loggable_prefix(bytes: &[u8]) -> Cow<'_, str> {
    let prefix = &bytes[..bytes.len().min(MAX_LOGGED_BODY_BYTES)];
    match std::str::from_utf8(prefix) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) if e.error_len().is_none() => String::from_utf8_lossy(&prefix[..e.valid_up_to()]),
        Err(_) => String::from_utf8_lossy(prefix),
    }
}
