//! # ドメイン層エラー定義
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `MalformedBody` | 400 Bad Request | リクエストボディが JSON として不正 |
//! | `Validation` | 400 Bad Request | 識別子などの入力値の検証失敗 |

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、RFC 9457 形式のレスポンスに変換する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// リクエストボディが JSON としてパースできない
    ///
    /// 保持する文字列は serde_json のエラーメッセージ（行・列を含む）。
    #[error("リクエストボディが不正な JSON です: {0}")]
    MalformedBody(String),

    /// バリデーションエラー
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
