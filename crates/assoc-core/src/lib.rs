//! assoc-core
//!
//! 型ごとに「新規 (create)」「更新 (update)」「追跡なし (send)」を判定して
//! Sink に送る change-classification registry。
//!
//! # モジュール構成
//! - **domain**: Payload trait, ChangeKind, Transmission
//! - **ports**: 抽象化レイヤー（Sink, Clock）
//! - **typed**: Identity, Pool, Registry, PayloadCodec
//! - **impls**: Sink の実装（RecordingSink, TextSink, JsonSink）
//! - **error**: CodecError

pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod typed;

pub use self::domain::{ChangeKind, Payload, Transmission};
pub use self::error::CodecError;
pub use self::ports::Sink;
pub use self::typed::{Command, Identity, PayloadCodec, Registry, by_key};
