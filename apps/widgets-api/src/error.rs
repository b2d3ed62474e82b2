//! # Widgets API エラー定義
//!
//! API 層のエラーと、RFC 9457 形式の HTTP レスポンスへの変換を定義する。
//!
//! ## エラーの階層
//!
//! ```text
//! ドメイン層エラー (DomainError)
//!        ↓ From
//! API エラー (ApiError)
//!        ↓ IntoResponse
//! HTTP レスポンス (StatusCode + ErrorResponse)
//! ```

use axum::{
    Json,
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use widgets_domain::DomainError;
use widgets_shared::ErrorResponse;

/// Widgets API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 不正なリクエスト（400）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// ルートが存在しない（404）
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// リクエストボディが上限を超えている（413）
    #[error("リクエストボディが大きすぎます")]
    PayloadTooLarge,

    /// 内部エラー（500）
    ///
    /// 詳細はログにのみ出力し、クライアントには固定メッセージを返す。
    #[error("内部エラー: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MalformedBody(_) | DomainError::Validation(_) => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

/// パスパラメータの抽出失敗（UTF-8 として不正な識別子など）
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            Self::Internal(anyhow::anyhow!(rejection.body_text()))
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

/// リクエストボディの読み取り失敗
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge,
            status if status.is_server_error() => {
                Self::Internal(anyhow::anyhow!(rejection.body_text()))
            }
            _ => Self::BadRequest(rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = match self {
            ApiError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            ApiError::NotFound(detail) => ErrorResponse::not_found(detail),
            ApiError::PayloadTooLarge => {
                ErrorResponse::payload_too_large("リクエストボディが大きすぎます")
            }
            ApiError::Internal(err) => {
                // セキュリティ: 内部エラー詳細はログのみ
                tracing::error!(error.kind = "internal", "内部エラー: {:?}", err);
                ErrorResponse::internal_error()
            }
        };

        let status = StatusCode::from_u16(error_response.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(error_response)).into_response()
    }
}
