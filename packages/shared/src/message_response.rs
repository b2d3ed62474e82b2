//! # メッセージレスポンスエンベロープ
//!
//! Widgets API の統一レスポンス形式 `{ "message": String, "data"?: T }` を提供する。

use serde::{Deserialize, Serialize};

/// 人間可読なメッセージと任意のペイロードを持つレスポンス型
///
/// `data` が `None` の場合はフィールドごと省略される。
/// 削除のようにエコーするデータが無い操作では [`MessageResponse::message_only`] を使う。
///
/// ## 使用例
///
/// ```
/// use widgets_shared::MessageResponse;
///
/// let response = MessageResponse::new("Widget created", 42);
/// assert_eq!(response.message, "Widget created");
/// assert_eq!(response.data, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data:    Option<T>,
}

impl<T> MessageResponse<T> {
    /// データ付きのレスポンスを作成する
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data:    Some(data),
        }
    }

    /// メッセージのみのレスポンスを作成する
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data:    None,
        }
    }
}
