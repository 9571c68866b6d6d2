//! Impls - Sink の実装
//!
//! # 含まれる実装
//! - **RecordingSink**: 呼び出しを記録（テスト・埋め込み用）
//! - **TextSink**: `Create: Player {1,Victor}` 形式の行出力
//! - **JsonSink**: JSON Lines 出力

pub mod json_sink;
pub mod recording_sink;
pub mod text_sink;

pub use self::json_sink::JsonSink;
pub use self::recording_sink::RecordingSink;
pub use self::text_sink::TextSink;
