//! ChangeKind - 分類結果と送信記録

use std::fmt;

use serde::{Deserialize, Serialize};

use super::payload::Payload;

/// ChangeKind は 1 回の process が Sink に出した呼び出しの種類
///
/// - `Send`: 追跡対象外（Pool なし、または predicate なしの Pool）
/// - `Create`: 初めて見る identity
/// - `Update`: 既に保存されている identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Send,
    Create,
    Update,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Send => "send",
            ChangeKind::Create => "create",
            ChangeKind::Update => "update",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::Send => "Send",
            ChangeKind::Create => "Create",
            ChangeKind::Update => "Update",
        };
        f.write_str(label)
    }
}

/// Transmission は Sink が受け取った 1 回分の呼び出し
///
/// body は payload を serde_json::Value にしたもの。
/// RecordingSink がテストや埋め込み用途で使います。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transmission {
    pub change: ChangeKind,
    pub payload: &'static str,
    pub body: serde_json::Value,
}

impl Transmission {
    pub fn capture<T: Payload>(change: ChangeKind, obj: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            change,
            payload: T::NAME,
            body: serde_json::to_value(obj)?,
        })
    }
}
