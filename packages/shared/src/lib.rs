//! # Widgets Service 共有ユーティリティ
//!
//! Widgets Service のすべてのクレートで使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - HTTP 層（widgets-api）から依存され、ドメイン層には依存しない
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - tower / tracing などの Observability 依存は `observability` feature に閉じ込める

#[cfg(feature = "observability")]
pub mod access_log;
pub mod error_response;
pub mod event_log;
pub mod health;
pub mod message_response;
pub mod observability;

pub use error_response::{ErrorResponse, ProblemType};
pub use health::HealthResponse;
pub use message_response::MessageResponse;
