//! # アクセスログミドルウェア
//!
//! HTTP リクエスト完了時に、ステータスとレイテンシを1行に集約した
//! サマリログを出力する tower Layer。
//!
//! ステージ設定のロギングレベル（[`MethodLoggingLevel`]）に従って出力対象を絞り込む:
//!
//! | レベル | 出力対象 |
//! |--------|----------|
//! | `off` | なし |
//! | `error` | ステータス 400 以上、および Service エラー |
//! | `info` | すべてのリクエスト |
//!
//! TraceLayer のスパン内に配置することで、スパンフィールド（`request_id` など）が
//! JSON ログに自動的に含まれる。
//!
//! ```text
//! TraceLayer → AccessLogLayer → [他のミドルウェア] → handler
//! ```

use std::{
    fmt,
    future::Future,
    pin::Pin,
    str::FromStr,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response};
use thiserror::Error;
use tower::{Layer, Service};

/// ヘルスチェックパスかどうかを判定する（完全一致）
fn is_health_check_path(path: &str) -> bool {
    path == "/health"
}

/// ステージのメソッドロギングレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodLoggingLevel {
    /// ログを出力しない
    Off,
    /// エラーレスポンスのみ出力する
    Error,
    /// すべてのリクエストを出力する
    #[default]
    Info,
}

/// 不明なロギングレベル文字列
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("不明なロギングレベルです: {0:?}（off / error / info のいずれか）")]
pub struct UnknownLoggingLevel(pub String);

impl FromStr for MethodLoggingLevel {
    type Err = UnknownLoggingLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "info" => Ok(Self::Info),
            _ => Err(UnknownLoggingLevel(s.to_string())),
        }
    }
}

impl fmt::Display for MethodLoggingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Info => "info",
        };
        f.write_str(s)
    }
}

impl MethodLoggingLevel {
    /// 指定ステータスのレスポンスをログ出力すべきかを判定する
    fn should_log(self, status: u16) -> bool {
        match self {
            Self::Off => false,
            Self::Error => status >= 400,
            Self::Info => true,
        }
    }
}

/// アクセスログを出力する Layer
///
/// `log.kind = "access"` マーカー付きのサマリログを出力する。
/// `/health` は出力対象外。
#[derive(Clone, Copy, Debug)]
pub struct AccessLogLayer {
    level: MethodLoggingLevel,
}

impl AccessLogLayer {
    pub fn new(level: MethodLoggingLevel) -> Self {
        Self { level }
    }
}

impl<S> Layer<S> for AccessLogLayer {
    type Service = AccessLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessLogService {
            inner,
            level: self.level,
        }
    }
}

/// [`AccessLogLayer`] が生成する Service 実装
#[derive(Clone, Debug)]
pub struct AccessLogService<S> {
    inner: S,
    level: MethodLoggingLevel,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AccessLogService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // clone-swap パターン: poll_ready で得た readiness を保持する inner を使う
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let level = self.level;
        if level == MethodLoggingLevel::Off || is_health_check_path(req.uri().path()) {
            return Box::pin(async move { inner.call(req).await });
        }

        let start = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if level.should_log(status) {
                        tracing::info!(
                            log.kind = "access",
                            http.status_code = status,
                            http.latency_ms = latency_ms,
                            "リクエスト完了"
                        );
                    }
                }
                Err(err) => {
                    tracing::error!(
                        log.kind = "access",
                        http.latency_ms = latency_ms,
                        error.message = %err,
                        "リクエスト処理エラー"
                    );
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        sync::{Arc, Mutex},
    };

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    // テスト用のダミー Service
    #[derive(Clone)]
    struct DummyService {
        status: http::StatusCode,
    }

    impl Service<Request<()>> for DummyService {
        type Error = Infallible;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
        type Response = Response<()>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: Request<()>) -> Self::Future {
            let status = self.status;
            Box::pin(async move { Ok(Response::builder().status(status).body(()).unwrap()) })
        }
    }

    // テスト用のエラーを返す Service
    #[derive(Clone)]
    struct ErrorService;

    impl Service<Request<()>> for ErrorService {
        type Error = String;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
        type Response = Response<()>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: Request<()>) -> Self::Future {
            Box::pin(async { Err("internal service error".to_string()) })
        }
    }

    /// テスト用にログイベントをキャプチャする Layer
    #[derive(Clone)]
    struct CaptureLayer {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level:   tracing::Level,
        message: String,
        fields:  Vec<(String, String)>,
    }

    impl CapturedEvent {
        fn field(&self, name: &str) -> Option<&str> {
            self.fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut visitor = FieldVisitor::default();
            event.record(&mut visitor);

            self.events.lock().unwrap().push(CapturedEvent {
                level:   *event.metadata().level(),
                message: visitor.message.unwrap_or_default(),
                fields:  visitor.fields,
            });
        }
    }

    #[derive(Default)]
    struct FieldVisitor {
        message: Option<String>,
        fields:  Vec<(String, String)>,
    }

    impl tracing::field::Visit for FieldVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.message = Some(format!("{:?}", value));
            } else {
                self.fields
                    .push((field.name().to_string(), format!("{:?}", value)));
            }
        }

        fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.message = Some(value.to_string());
            } else {
                self.fields
                    .push((field.name().to_string(), value.to_string()));
            }
        }
    }

    /// 返り値の `DefaultGuard` はスコープに保持すること（ドロップでリセット）
    fn setup_capture() -> (
        tracing::subscriber::DefaultGuard,
        Arc<Mutex<Vec<CapturedEvent>>>,
    ) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let capture = CaptureLayer {
            events: events.clone(),
        };
        let subscriber = tracing_subscriber::registry().with(capture);
        let guard = tracing::subscriber::set_default(subscriber);
        (guard, events)
    }

    fn build_request(path: &str) -> Request<()> {
        Request::builder().uri(path).body(()).unwrap()
    }

    // ===== MethodLoggingLevel テスト =====

    #[rstest]
    #[case("off", MethodLoggingLevel::Off)]
    #[case("error", MethodLoggingLevel::Error)]
    #[case("info", MethodLoggingLevel::Info)]
    #[case("INFO", MethodLoggingLevel::Info)]
    fn test_from_strで既知のレベルを変換する(
        #[case] input: &str,
        #[case] expected: MethodLoggingLevel,
    ) {
        assert_eq!(input.parse::<MethodLoggingLevel>(), Ok(expected));
    }

    #[test]
    fn test_from_strで不明なレベルはエラーになる() {
        assert_eq!(
            "verbose".parse::<MethodLoggingLevel>(),
            Err(UnknownLoggingLevel("verbose".to_string()))
        );
    }

    #[test]
    fn test_displayとfrom_strが対応している() {
        for level in [
            MethodLoggingLevel::Off,
            MethodLoggingLevel::Error,
            MethodLoggingLevel::Info,
        ] {
            assert_eq!(level.to_string().parse::<MethodLoggingLevel>(), Ok(level));
        }
    }

    // ===== AccessLogService テスト =====

    #[tokio::test]
    async fn test_infoレベルで正常リクエストのアクセスログが出力される() {
        let (_guard, events) = setup_capture();

        let mut sut = AccessLogLayer::new(MethodLoggingLevel::Info).layer(DummyService {
            status: http::StatusCode::CREATED,
        });

        let response = sut.call(build_request("/widgets")).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::CREATED);

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1, "1つのログイベントが出力されること");
        assert_eq!(captured[0].level, tracing::Level::INFO);
        assert_eq!(captured[0].message, "リクエスト完了");
        assert_eq!(captured[0].field("log.kind"), Some("access"));
        assert_eq!(captured[0].field("http.status_code"), Some("201"));
        assert!(captured[0].field("http.latency_ms").is_some());
    }

    #[tokio::test]
    async fn test_errorレベルでは成功レスポンスを出力しない() {
        let (_guard, events) = setup_capture();

        let mut sut = AccessLogLayer::new(MethodLoggingLevel::Error).layer(DummyService {
            status: http::StatusCode::OK,
        });

        sut.call(build_request("/widgets")).await.unwrap();

        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_errorレベルでは400以上のレスポンスを出力する() {
        let (_guard, events) = setup_capture();

        let mut sut = AccessLogLayer::new(MethodLoggingLevel::Error).layer(DummyService {
            status: http::StatusCode::BAD_REQUEST,
        });

        sut.call(build_request("/widgets")).await.unwrap();

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].field("http.status_code"), Some("400"));
    }

    #[tokio::test]
    async fn test_offレベルでは何も出力しない() {
        let (_guard, events) = setup_capture();

        let mut sut = AccessLogLayer::new(MethodLoggingLevel::Off).layer(DummyService {
            status: http::StatusCode::INTERNAL_SERVER_ERROR,
        });

        sut.call(build_request("/widgets")).await.unwrap();

        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ヘルスチェックパスはスキップされる() {
        let (_guard, events) = setup_capture();

        let mut sut = AccessLogLayer::new(MethodLoggingLevel::Info).layer(DummyService {
            status: http::StatusCode::OK,
        });

        sut.call(build_request("/health")).await.unwrap();

        assert!(events.lock().unwrap().is_empty());
    }

    #[rstest]
    #[case("/healthz")]
    #[case("/health-report")]
    #[case("/health/detail")]
    #[tokio::test]
    async fn test_healthに似た別のパスはスキップしない(#[case] path: &str) {
        let (_guard, events) = setup_capture();

        let mut sut = AccessLogLayer::new(MethodLoggingLevel::Info).layer(DummyService {
            status: http::StatusCode::NOT_FOUND,
        });

        sut.call(build_request(path)).await.unwrap();

        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_serviceエラー時にerrorレベルで出力される() {
        let (_guard, events) = setup_capture();

        let mut sut = AccessLogLayer::new(MethodLoggingLevel::Error).layer(ErrorService);

        let result = sut.call(build_request("/widgets/1")).await;
        assert!(result.is_err());

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].level, tracing::Level::ERROR);
        assert_eq!(captured[0].message, "リクエスト処理エラー");
        assert_eq!(
            captured[0].field("error.message"),
            Some("internal service error")
        );
    }
}
