//! # Widget ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /` / `GET /widgets` - 一覧（常に空）
//! - `POST /widgets` - 作成（ボディをエコー）
//! - `PUT /widgets/{id}` - 更新（ボディをエコー）
//! - `DELETE /widgets/{id}` - 削除
//!
//! Widget の保存先は存在しないため、作成・更新・削除は常に成功する。
//! 存在確認や ID 採番は行わない。

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path,
        rejection::{BytesRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::Value;
use widgets_domain::widget::{WidgetId, WidgetOperation, WidgetPayload};
use widgets_shared::{
    MessageResponse,
    event_log::event,
    log_business_event,
};

use crate::error::ApiError;

/// GET / , GET /widgets
///
/// ## レスポンス
///
/// - `200 OK`: `{ "message": "Widgets retrieved", "data": [] }`
#[tracing::instrument(skip_all)]
pub async fn list_widgets() -> impl IntoResponse {
    let widgets: Vec<Value> = Vec::new();
    let operation = WidgetOperation::List;

    log_business_event!(
        event.category = event::category::WIDGET,
        event.action = operation.event_action(),
        event.entity_type = event::entity_type::WIDGET,
        event.result = event::result::SUCCESS,
        widget.count = widgets.len() as u64,
        "Widget 一覧取得"
    );

    let response = MessageResponse::new(operation.message(), widgets);
    (StatusCode::OK, Json(response))
}

/// POST /widgets
///
/// ボディを JSON としてパースし、そのまま `data` に入れて返す。
/// 空のボディは `{}` として扱う。
///
/// ## レスポンス
///
/// - `201 Created`: `{ "message": "Widget created", "data": <body> }`
/// - `400 Bad Request`: ボディが不正な JSON
/// - `413 Payload Too Large`: ボディがバッファ上限を超えている
#[tracing::instrument(skip_all)]
pub async fn create_widget(
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = WidgetPayload::parse(&body?)?;
    let operation = WidgetOperation::Create;

    log_business_event!(
        event.category = event::category::WIDGET,
        event.action = operation.event_action(),
        event.entity_type = event::entity_type::WIDGET,
        event.result = event::result::SUCCESS,
        "Widget 作成"
    );

    let response = MessageResponse::new(operation.message(), payload);
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /widgets/{id}
///
/// ## レスポンス
///
/// - `200 OK`: `{ "message": "Widget {id} updated", "data": <body> }`
/// - `400 Bad Request`: ボディが不正な JSON、または識別子が UTF-8 として不正
/// - `413 Payload Too Large`: ボディがバッファ上限を超えている
#[tracing::instrument(skip_all, fields(widget_id = tracing::field::Empty))]
pub async fn update_widget(
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let widget_id = extract_widget_id(path)?;
    let payload = WidgetPayload::parse(&body?)?;
    let operation = WidgetOperation::Update(&widget_id);

    log_business_event!(
        event.category = event::category::WIDGET,
        event.action = operation.event_action(),
        event.entity_type = event::entity_type::WIDGET,
        event.entity_id = %widget_id,
        event.result = event::result::SUCCESS,
        "Widget 更新"
    );

    let response = MessageResponse::new(operation.message(), payload);
    Ok((StatusCode::OK, Json(response)))
}

/// DELETE /widgets/{id}
///
/// リクエストボディは読まない。
///
/// ## レスポンス
///
/// - `200 OK`: `{ "message": "Widget {id} deleted" }`
/// - `400 Bad Request`: 識別子が UTF-8 として不正
#[tracing::instrument(skip_all, fields(widget_id = tracing::field::Empty))]
pub async fn delete_widget(
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let widget_id = extract_widget_id(path)?;
    let operation = WidgetOperation::Delete(&widget_id);

    log_business_event!(
        event.category = event::category::WIDGET,
        event.action = operation.event_action(),
        event.entity_type = event::entity_type::WIDGET,
        event.entity_id = %widget_id,
        event.result = event::result::SUCCESS,
        "Widget 削除"
    );

    let response = MessageResponse::<Value>::message_only(operation.message());
    Ok((StatusCode::OK, Json(response)))
}

/// パスパラメータから識別子を取り出し、現在のスパンに記録する
fn extract_widget_id(path: Result<Path<String>, PathRejection>) -> Result<WidgetId, ApiError> {
    let Path(id) = path?;
    let widget_id = WidgetId::new(id)?;
    tracing::Span::current().record("widget_id", widget_id.as_str());
    Ok(widget_id)
}

/// どのルートにも一致しなかったリクエスト
pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("{} に一致するルートはありません", uri.path()))
}
