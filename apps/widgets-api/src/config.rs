//! # Widgets API 設定
//!
//! 環境変数からサーバーとステージの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `WIDGETS_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `WIDGETS_PORT` | No | `3000` | ポート番号 |
//! | `WIDGETS_STAGE_NAME` | No | `prod` | ステージ名 |
//! | `WIDGETS_LOGGING_LEVEL` | No | `info` | アクセスログのレベル（`off` / `error` / `info`） |
//! | `WIDGETS_DATA_TRACE` | No | `true` | リクエスト・レスポンスボディのトレース |

use std::{env, num::ParseIntError};

use thiserror::Error;
use widgets_shared::access_log::{MethodLoggingLevel, UnknownLoggingLevel};

use crate::deployment::StageOptions;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// 設定読み込み時のエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("WIDGETS_PORT は有効なポート番号である必要があります: {value:?}")]
    InvalidPort {
        value:  String,
        #[source]
        source: ParseIntError,
    },

    #[error("WIDGETS_LOGGING_LEVEL が不正です")]
    InvalidLoggingLevel(#[from] UnknownLoggingLevel),

    #[error("{key} は true / false のいずれかである必要があります: {value:?}")]
    InvalidBool { key: &'static str, value: String },
}

/// Widgets API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host:  String,
    /// ポート番号
    pub port:  u16,
    /// ステージ設定（ロギングレベル・データトレース）
    pub stage: StageOptions,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// キー参照関数から設定を読み込む
    ///
    /// `lookup` はキーに対応する値を返す。未設定のキーは `None`。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("WIDGETS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("WIDGETS_PORT") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        let defaults = StageOptions::default();

        let stage_name = lookup("WIDGETS_STAGE_NAME").unwrap_or(defaults.stage_name);

        let logging_level = match lookup("WIDGETS_LOGGING_LEVEL") {
            Some(value) => value.parse::<MethodLoggingLevel>()?,
            None => defaults.logging_level,
        };

        let data_trace_enabled = match lookup("WIDGETS_DATA_TRACE") {
            Some(value) => parse_bool("WIDGETS_DATA_TRACE", value)?,
            None => defaults.data_trace_enabled,
        };

        Ok(Self {
            host,
            port,
            stage: StageOptions {
                stage_name,
                logging_level,
                data_trace_enabled,
            },
        })
    }
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBool { key, value }),
    }
}
