//! # Widgets ドメイン層
//!
//! Widget に関するドメインモデルを定義する。
//!
//! Widget は名目上のエンティティであり、スキーマも永続化先も持たない。
//! このクレートが扱うのは以下の3点のみ:
//!
//! - [`widget::WidgetId`]: パスから受け取った識別子（検証せずそのまま保持）
//! - [`widget::WidgetPayload`]: リクエストボディの JSON（空ボディは `{}`）
//! - [`widget::WidgetOperation`]: 各操作の応答メッセージとイベント名
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層エラー
//! - [`widget`] - Widget の値オブジェクトと操作

pub mod error;
pub mod widget;

pub use error::DomainError;
