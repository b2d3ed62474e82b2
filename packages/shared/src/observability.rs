//! # Observability 基盤
//!
//! Widgets Service のログ出力設定と、Request ID・リクエストスパンの構築を提供する。
//!
//! ## 環境変数
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|------------|------|
//! | `LOG_FORMAT` | `pretty` | `json` / `pretty`（大文字小文字は区別しない） |
//! | `RUST_LOG` | [`DEFAULT_LOG_FILTER`] | `EnvFilter` のディレクティブ |

/// Request ID を運ぶ HTTP ヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `RUST_LOG` 未設定時のフィルタ（`widgets_*` クレートのみ DEBUG）
pub const DEFAULT_LOG_FILTER: &str = "info,widgets=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 イベント 1 行の JSON（ログ基盤への取り込み用）
    Json,
    /// 人間が読みやすい形式
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する
    ///
    /// 不明な値は [`Pretty`](LogFormat::Pretty) として扱い、stderr に警告を出す。
    /// トレーシング初期化前に呼ばれるため `tracing` は使えない。
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" | "" => Self::Pretty,
            _ => {
                eprintln!("WARNING: LOG_FORMAT={value:?} は不明な値です。pretty で出力します");
                Self::Pretty
            }
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// サービス名（初期化ログに出力）
    pub service_name:      String,
    pub log_format:        LogFormat,
    /// `EnvFilter` に渡すディレクティブ
    pub filter_directives: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            filter_directives: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// 環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// キー参照関数から設定を読み取る
    ///
    /// `lookup` はキーに対応する値を返す。未設定のキーは `None`。
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let log_format = lookup("LOG_FORMAT")
            .map(|value| LogFormat::parse(&value))
            .unwrap_or_default();
        let filter_directives = lookup("RUST_LOG")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            service_name: service_name.into(),
            log_format,
            filter_directives,
        }
    }
}

/// グローバルサブスクライバを初期化する
///
/// JSON モードではイベントフィールドをトップレベルに展開し、現在のスパン
/// （`request_id` を持つ `request` スパン）を `span` フィールドに含める。
/// ディレクティブが解釈できない場合は [`DEFAULT_LOG_FILTER`] を使う。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_new(&config.filter_directives).unwrap_or_else(|e| {
        eprintln!(
            "WARNING: RUST_LOG={:?} を解釈できません ({e})。{DEFAULT_LOG_FILTER} を使います",
            config.filter_directives
        );
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!(
        service = %config.service_name,
        log_format = ?config.log_format,
        filter = %config.filter_directives,
        "トレーシングを初期化しました"
    );
}

/// UUID v7 で Request ID を生成する `MakeRequestId` 実装
///
/// UUID v7 はタイムスタンプを含むため、ログを Request ID でソートすると時系列順になる。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// `TraceLayer` 用のリクエストスパンを構築する
///
/// `SetRequestIdLayer` の内側で呼ばれるため、`x-request-id` ヘッダーは常に設定済み。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("JSON", LogFormat::Json)]
    #[case(" json ", LogFormat::Json)]
    #[case("pretty", LogFormat::Pretty)]
    #[case("", LogFormat::Pretty)]
    #[case("yaml", LogFormat::Pretty)]
    fn test_log_formatの解釈(#[case] input: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::parse(input), expected);
    }

    #[test]
    fn test_環境変数が未設定ならデフォルト() {
        let config = TracingConfig::from_lookup("widgets-api", lookup_from(&[]));

        assert_eq!(config, TracingConfig::new("widgets-api", LogFormat::Pretty));
        assert_eq!(config.filter_directives, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_環境変数から形式とフィルタを読む() {
        let config = TracingConfig::from_lookup(
            "widgets-lambda",
            lookup_from(&[("LOG_FORMAT", "json"), ("RUST_LOG", "warn")]),
        );

        assert_eq!(config.service_name, "widgets-lambda");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.filter_directives, "warn");
    }

    #[test]
    fn test_空のrust_logはデフォルトフィルタになる() {
        let config = TracingConfig::from_lookup("widgets-api", lookup_from(&[("RUST_LOG", "  ")]));

        assert_eq!(config.filter_directives, DEFAULT_LOG_FILTER);
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_make_request_idがuuid_v7を生成する() {
        use tower_http::request_id::MakeRequestId;

        let request = http::Request::builder().uri("/widgets").body(()).unwrap();
        let request_id = MakeRequestUuidV7
            .make_request_id(&request)
            .expect("Request ID が生成されること");

        let uuid = uuid::Uuid::parse_str(request_id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(uuid.get_version(), Some(uuid::Version::SortRand));
    }
}
