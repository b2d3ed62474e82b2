//! # ビジネスイベントログ
//!
//! ビジネスイベントを `jq` でフィルタしやすい構造化ログとして出力するマクロと、
//! フィールド値の定数を提供する。
//!
//! [`log_business_event!`] は `event.kind = "business_event"` マーカーを自動付与するため、
//! `jq 'select(.["event.kind"] == "business_event")'` で抽出できる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`event.action`）を使用する。JSON 出力ではフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを付与し、`tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（例: `widget.created`）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const WIDGET: &str = "widget";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const WIDGET: &str = "widget";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
    }
}
