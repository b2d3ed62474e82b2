//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは状態を持たず、ドメイン層の値オブジェクトで入力を解釈する

pub mod health;
pub mod widget;

pub use health::health_check;
pub use widget::{create_widget, delete_widget, fallback, list_widgets, update_widget};
