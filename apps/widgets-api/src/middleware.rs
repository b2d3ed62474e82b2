//! # ミドルウェア
//!
//! Widgets API 用のミドルウェアを提供する。

pub mod data_trace;

pub use data_trace::data_trace;
