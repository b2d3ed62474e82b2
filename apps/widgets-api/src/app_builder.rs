//! # アプリケーション構築
//!
//! デプロイ宣言（[`ROUTES`]）とステージ設定からルーターを組み立てる。
//! `main.rs` と Lambda バイナリはどちらもこの関数でルーターを得る。

use axum::{
    Router,
    middleware::from_fn,
    routing::{MethodFilter, MethodRouter, get, on},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use widgets_shared::{
    access_log::AccessLogLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};

use crate::{
    deployment::{HttpMethod, ROUTES, RouteDeclaration, StageOptions, WidgetHandler},
    handler::{
        create_widget,
        delete_widget,
        fallback,
        health_check,
        list_widgets,
        update_widget,
    },
    middleware::data_trace,
};

/// ルーターを構築する
///
/// 同じパスに複数のメソッドが宣言されている場合、axum が 1 つの
/// `MethodRouter` にマージする。宣言にないメソッドは 405 になる。
pub fn build_app(stage: &StageOptions) -> Router {
    tracing::info!(
        stage = %stage.stage_name,
        logging_level = %stage.logging_level,
        data_trace = stage.data_trace_enabled,
        "ステージ設定"
    );

    let mut router = ROUTES
        .iter()
        .fold(Router::new(), |router, route| {
            tracing::debug!(
                method = %route.method,
                path = route.path,
                handler = route.handler.name(),
                authorization = ?route.authorization,
                "ルートを登録"
            );
            router.route(route.path, method_router(route))
        })
        .route("/health", get(health_check))
        .fallback(fallback);

    if stage.data_trace_enabled {
        router = router.layer(from_fn(data_trace));
    }

    // レイヤー順序: 下に書いたものが外側
    // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
    // 2. TraceLayer: request_id を含むスパンを作成
    // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
    // 4. AccessLogLayer: ステージのロギングレベルに従い 1 行サマリを出力
    router
        .layer(AccessLogLayer::new(stage.logging_level))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

fn method_router(route: &RouteDeclaration) -> MethodRouter {
    let filter = MethodFilter::from(route.method);
    match route.handler {
        WidgetHandler::ListWidgets => on(filter, list_widgets),
        WidgetHandler::CreateWidget => on(filter, create_widget),
        WidgetHandler::UpdateWidget => on(filter, update_widget),
        WidgetHandler::DeleteWidget => on(filter, delete_widget),
    }
}

impl From<HttpMethod> for MethodFilter {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }
}
