//! # Widget
//!
//! Widget の値オブジェクトと、各操作が返す応答メッセージを定義する。
//!
//! ## 設計判断
//!
//! Widget にはスキーマも保存先も存在しない。ID の採番、存在確認、重複検出は
//! 一切行わず、受け取った値をそのまま応答に埋め込む。
//!
//! ## 使用例
//!
//! ```rust
//! use widgets_domain::widget::{WidgetId, WidgetOperation, WidgetPayload};
//!
//! let payload = WidgetPayload::parse(br#"{"name":"Gear"}"#).unwrap();
//! assert_eq!(payload.as_value()["name"], "Gear");
//!
//! let id = WidgetId::new("42").unwrap();
//! assert_eq!(WidgetOperation::Delete(&id).message(), "Widget 42 deleted");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainError;

// =========================================================================
// WidgetId（識別子）
// =========================================================================

/// Widget の識別子
///
/// パスパラメータの文字列をそのまま保持する。数値や UUID としての解釈はしない
/// （`"42"` も `"gear-01"` も有効）。
///
/// # 不変条件
///
/// - 空文字列ではない
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(String);

impl WidgetId {
    /// 文字列から識別子を作成する
    ///
    /// # エラー
    ///
    /// 空文字列の場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation(
                "Widget ID は空にできません".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// WidgetPayload（リクエストボディ）
// =========================================================================

/// Widget 作成・更新リクエストのボディ
///
/// 任意の JSON 値を保持する（オブジェクトに限らない）。
/// スキーマ検証は行わず、応答の `data` にそのままエコーされる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetPayload(Value);

impl WidgetPayload {
    /// 生のボディバイト列をパースする
    ///
    /// - 空のボディ（0 バイト）は空オブジェクト `{}` として扱う
    /// - それ以外は JSON としてパースする。空白のみのボディは不正な JSON とみなす
    ///
    /// # エラー
    ///
    /// JSON として不正な場合は `DomainError::MalformedBody` を返す。
    pub fn parse(body: &[u8]) -> Result<Self, DomainError> {
        if body.is_empty() {
            return Ok(Self::empty());
        }
        serde_json::from_slice(body)
            .map(Self)
            .map_err(|e| DomainError::MalformedBody(e.to_string()))
    }

    /// 空オブジェクト `{}` のペイロード
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

// =========================================================================
// WidgetOperation（操作と応答メッセージ）
// =========================================================================

/// Widget に対する操作
///
/// 各操作の応答メッセージと、ビジネスイベントログの `event.action` を決定する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetOperation<'a> {
    List,
    Create,
    Update(&'a WidgetId),
    Delete(&'a WidgetId),
}

impl WidgetOperation<'_> {
    /// 応答の `message` に入る人間可読なメッセージ
    pub fn message(&self) -> String {
        match self {
            Self::List => "Widgets retrieved".to_string(),
            Self::Create => "Widget created".to_string(),
            Self::Update(id) => format!("Widget {id} updated"),
            Self::Delete(id) => format!("Widget {id} deleted"),
        }
    }

    /// ビジネスイベントログの `event.action`
    pub fn event_action(&self) -> &'static str {
        match self {
            Self::List => "widget.listed",
            Self::Create => "widget.created",
            Self::Update(_) => "widget.updated",
            Self::Delete(_) => "widget.deleted",
        }
    }
}
