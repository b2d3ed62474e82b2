//! # Widgets API
//!
//! Widget の一覧・作成・更新・削除を受け付ける REST API。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────┐     ┌────────────────┐     ┌──────────────────┐
//! │  Client  │────▶│  API Gateway   │────▶│  Widgets API     │
//! │          │     │  / axum Router │     │  (4 ハンドラ)     │
//! └──────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! 各ハンドラは互いに独立しており、共有状態を持たない。
//! どのルートがどのハンドラに対応するかは [`deployment::ROUTES`] の静的テーブルで宣言し、
//! [`app_builder::build_app`] がそのテーブルからルーターを組み立てる。
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`deployment`] - ルート宣言とステージ設定
//! - [`app_builder`] - ルーターとミドルウェアの構築
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - データトレースミドルウェア

pub mod app_builder;
pub mod config;
pub mod deployment;
pub mod error;
pub mod handler;
pub mod middleware;

#[cfg(test)]
pub(crate) mod test_support;
