//! # デプロイ宣言
//!
//! HTTP メソッド + パステンプレートとハンドラの対応表、およびステージ設定を
//! 静的に宣言する。
//!
//! この宣言自体は実行時の振る舞いを持たない。
//! [`crate::app_builder::build_app`] がこの表を読み、axum のルーターに変換する。
//!
//! ## ルート一覧
//!
//! | メソッド | パス | ハンドラ | 認可 |
//! |----------|------|----------|------|
//! | GET | `/` | ListWidgets | なし |
//! | GET | `/widgets` | ListWidgets | なし |
//! | POST | `/widgets` | CreateWidget | なし |
//! | PUT | `/widgets/{id}` | UpdateWidget | なし |
//! | DELETE | `/widgets/{id}` | DeleteWidget | なし |

use std::fmt;

use widgets_shared::access_log::MethodLoggingLevel;

/// REST API 名
pub const REST_API_NAME: &str = "Widgets Service";

/// ルート宣言の一覧
pub const ROUTES: &[RouteDeclaration] = &[
    RouteDeclaration::open(HttpMethod::Get, "/", WidgetHandler::ListWidgets),
    RouteDeclaration::open(HttpMethod::Get, "/widgets", WidgetHandler::ListWidgets),
    RouteDeclaration::open(HttpMethod::Post, "/widgets", WidgetHandler::CreateWidget),
    RouteDeclaration::open(HttpMethod::Put, "/widgets/{id}", WidgetHandler::UpdateWidget),
    RouteDeclaration::open(HttpMethod::Delete, "/widgets/{id}", WidgetHandler::DeleteWidget),
];

/// ルートに割り当て可能な HTTP メソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// ハンドラユニット
///
/// 各ユニットは独立しており、互いを呼び出さない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetHandler {
    ListWidgets,
    CreateWidget,
    UpdateWidget,
    DeleteWidget,
}

impl WidgetHandler {
    /// ハンドラユニット名（起動ログに出力）
    pub fn name(self) -> &'static str {
        match self {
            Self::ListWidgets => "GetWidgetsHandler",
            Self::CreateWidget => "CreateWidgetHandler",
            Self::UpdateWidget => "UpdateWidgetHandler",
            Self::DeleteWidget => "DeleteWidgetHandler",
        }
    }
}

/// ルートの認可方式
///
/// 現在のすべてのルートは認証なし（公開）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    None,
}

/// 1 ルート分の宣言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDeclaration {
    pub method:        HttpMethod,
    /// axum 形式のパステンプレート（パラメータは `{name}`）
    pub path:          &'static str,
    pub handler:       WidgetHandler,
    pub authorization: Authorization,
}

impl RouteDeclaration {
    /// 認証なしのルートを宣言する
    pub const fn open(method: HttpMethod, path: &'static str, handler: WidgetHandler) -> Self {
        Self {
            method,
            path,
            handler,
            authorization: Authorization::None,
        }
    }
}

/// ステージ設定
///
/// デプロイ時に決まるロギング関連のオプション。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOptions {
    /// ステージ名（例: `prod`）
    pub stage_name:         String,
    /// アクセスログのレベル
    pub logging_level:      MethodLoggingLevel,
    /// リクエスト・レスポンスボディをトレースするか
    pub data_trace_enabled: bool,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            stage_name:         "prod".to_string(),
            logging_level:      MethodLoggingLevel::Info,
            data_trace_enabled: true,
        }
    }
}
