//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! Widgets API が返すエラーボディを提供する。
//!
//! 問題の種類は [`ProblemType`] で列挙し、`type` URI・`title`・`status` は
//! 種類から一意に決まる。呼び出し側が指定するのは `detail` のみ。
//!
//! axum の `IntoResponse` 変換は API 層で行う。

use serde::{Deserialize, Serialize};

/// `type` URI のベースパス
const PROBLEM_TYPE_BASE: &str = "https://widgets.example.com/errors";

/// Widgets API が返しうる問題の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    /// ボディや識別子が解釈できない
    BadRequest,
    /// どのルートにも一致しない
    NotFound,
    /// ボディがバッファ上限を超えている
    PayloadTooLarge,
    /// サーバー内部の失敗
    InternalError,
}

impl ProblemType {
    /// `type` URI の末尾
    pub fn slug(self) -> &'static str {
        match self {
            Self::BadRequest => "bad-request",
            Self::NotFound => "not-found",
            Self::PayloadTooLarge => "payload-too-large",
            Self::InternalError => "internal-error",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::PayloadTooLarge => "Payload Too Large",
            Self::InternalError => "Internal Server Error",
        }
    }

    /// HTTP ステータスコード
    pub fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::PayloadTooLarge => 413,
            Self::InternalError => 500,
        }
    }
}

/// エラーレスポンス本体
///
/// `type` フィールドは Rust の予約語のため `error_type` として保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    /// 問題の種類と詳細からレスポンスを組み立てる
    pub fn from_problem(problem: ProblemType, detail: impl Into<String>) -> Self {
        Self {
            error_type: format!("{PROBLEM_TYPE_BASE}/{}", problem.slug()),
            title:      problem.title().to_string(),
            status:     problem.status(),
            detail:     detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::from_problem(ProblemType::BadRequest, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::from_problem(ProblemType::NotFound, detail)
    }

    pub fn payload_too_large(detail: impl Into<String>) -> Self {
        Self::from_problem(ProblemType::PayloadTooLarge, detail)
    }

    /// 500 Internal Server Error
    ///
    /// detail は固定値。原因はログにのみ出力する。
    pub fn internal_error() -> Self {
        Self::from_problem(ProblemType::InternalError, "内部エラーが発生しました")
    }
}
