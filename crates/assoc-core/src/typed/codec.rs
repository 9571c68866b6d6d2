//! PayloadCodec - 型のないコマンドを型付き Registry につなぐ
//!
//! JSON のコマンド列（スクリプトやメッセージ）は payload 名しか持っていません。
//! PayloadCodec は payload 名から `TypedCodec<T>` を引き、
//! `serde_json::Value` を T に戻してから Registry の型付き API を呼びます。
//!
//! identity の登録はコードで行う操作なので、コマンドにはありません。

use std::collections::HashMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::registry::Registry;
use crate::domain::{ChangeKind, Payload};
use crate::error::CodecError;
use crate::ports::Sink;

/// Command は Registry への 1 操作
///
/// # JSON 形式
/// ```text
/// {"op":"process","payload":"player","value":{"id":1,"name":"Victor"}}
/// {"op":"erase","payload":"player","value":{"id":1,"name":"x"}}
/// {"op":"erase_pool","payload":"player"}
/// {"op":"erase_all"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Process {
        payload: String,
        value: serde_json::Value,
    },
    Erase {
        payload: String,
        value: serde_json::Value,
    },
    ErasePool {
        payload: String,
    },
    EraseAll,
}

/// Applied は apply の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Processed(ChangeKind),
    Erased(usize),
    PoolDropped(bool),
    AllDropped(usize),
}

/// DynCodec は object-safe な codec
trait DynCodec<S> {
    fn process(
        &self,
        registry: &mut Registry<S>,
        value: serde_json::Value,
    ) -> Result<ChangeKind, CodecError>;
    fn erase(
        &self,
        registry: &mut Registry<S>,
        value: serde_json::Value,
    ) -> Result<usize, CodecError>;
    fn erase_pool(&self, registry: &mut Registry<S>) -> bool;
}

struct TypedCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Payload + DeserializeOwned> TypedCodec<T> {
    fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn decode(value: serde_json::Value) -> Result<T, CodecError> {
        serde_json::from_value(value).map_err(|source| CodecError::Decode {
            payload: T::NAME.to_string(),
            source,
        })
    }
}

impl<S: Sink, T: Payload + DeserializeOwned> DynCodec<S> for TypedCodec<T> {
    fn process(
        &self,
        registry: &mut Registry<S>,
        value: serde_json::Value,
    ) -> Result<ChangeKind, CodecError> {
        let obj = Self::decode(value)?;
        Ok(registry.process(obj))
    }

    fn erase(
        &self,
        registry: &mut Registry<S>,
        value: serde_json::Value,
    ) -> Result<usize, CodecError> {
        let obj = Self::decode(value)?;
        Ok(registry.erase(&obj))
    }

    fn erase_pool(&self, registry: &mut Registry<S>) -> bool {
        registry.erase_pool::<T>()
    }
}

/// PayloadCodec は payload 名ごとの codec を管理
///
/// # 使用例
/// ```ignore
/// let mut codec = PayloadCodec::new();
/// codec.register::<Player>()?;
///
/// let cmd: Command = serde_json::from_str(line)?;
/// codec.apply(&mut registry, cmd)?;
/// ```
pub struct PayloadCodec<S> {
    codecs: HashMap<&'static str, Box<dyn DynCodec<S>>>,
}

impl<S: Sink> PayloadCodec<S> {
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// T を `T::NAME` で登録する。同じ名前の二重登録はエラー
    pub fn register<T: Payload + DeserializeOwned>(&mut self) -> Result<(), CodecError> {
        if self.codecs.contains_key(T::NAME) {
            return Err(CodecError::AlreadyRegistered(T::NAME.to_string()));
        }
        self.codecs.insert(T::NAME, Box::new(TypedCodec::<T>::new()));
        Ok(())
    }

    pub fn apply(
        &self,
        registry: &mut Registry<S>,
        command: Command,
    ) -> Result<Applied, CodecError> {
        let applied = match command {
            Command::Process { payload, value } => {
                Applied::Processed(self.codec(&payload)?.process(registry, value)?)
            }
            Command::Erase { payload, value } => {
                Applied::Erased(self.codec(&payload)?.erase(registry, value)?)
            }
            Command::ErasePool { payload } => {
                Applied::PoolDropped(self.codec(&payload)?.erase_pool(registry))
            }
            Command::EraseAll => Applied::AllDropped(registry.erase_all()),
        };
        debug!(?applied, "applied command");
        Ok(applied)
    }

    /// 登録済み payload 名（ソート済み）
    pub fn payloads(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.codecs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn codec(&self, payload: &str) -> Result<&dyn DynCodec<S>, CodecError> {
        self.codecs
            .get(payload)
            .map(|c| c.as_ref())
            .ok_or_else(|| CodecError::UnknownPayload(payload.to_string()))
    }
}

impl<S: Sink> Default for PayloadCodec<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::fixtures::{Point, Record};
    use crate::impls::RecordingSink;
    use serde_json::json;

    fn setup() -> (PayloadCodec<RecordingSink>, Registry<RecordingSink>) {
        let mut codec = PayloadCodec::new();
        codec.register::<Record>().unwrap();
        codec.register::<Point>().unwrap();

        let mut registry = Registry::new(RecordingSink::new());
        registry.register::<Record>(|a: &Record, b: &Record| a.id == b.id);
        (codec, registry)
    }

    fn parse(line: &str) -> Command {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn command_json_shape() {
        assert_eq!(
            parse(r#"{"op":"process","payload":"record","value":{"id":1,"name":"A"}}"#),
            Command::Process {
                payload: "record".to_string(),
                value: json!({ "id": 1, "name": "A" }),
            }
        );
        assert_eq!(
            parse(r#"{"op":"erase_pool","payload":"record"}"#),
            Command::ErasePool {
                payload: "record".to_string()
            }
        );
        assert_eq!(parse(r#"{"op":"erase_all"}"#), Command::EraseAll);
    }

    #[test]
    fn commands_drive_typed_registry() {
        let (codec, mut registry) = setup();

        let create = parse(r#"{"op":"process","payload":"record","value":{"id":1,"name":"A"}}"#);
        let update = parse(r#"{"op":"process","payload":"record","value":{"id":1,"name":"B"}}"#);
        let send = parse(r#"{"op":"process","payload":"point","value":{"x":1.0,"y":2.0}}"#);
        let erase = parse(r#"{"op":"erase","payload":"record","value":{"id":1,"name":"x"}}"#);

        assert_eq!(
            codec.apply(&mut registry, create.clone()).unwrap(),
            Applied::Processed(ChangeKind::Create)
        );
        assert_eq!(
            codec.apply(&mut registry, update).unwrap(),
            Applied::Processed(ChangeKind::Update)
        );
        assert_eq!(
            codec.apply(&mut registry, send).unwrap(),
            Applied::Processed(ChangeKind::Send)
        );
        assert_eq!(codec.apply(&mut registry, erase).unwrap(), Applied::Erased(1));
        assert_eq!(
            codec.apply(&mut registry, create).unwrap(),
            Applied::Processed(ChangeKind::Create)
        );
    }

    #[test]
    fn erase_pool_and_erase_all() {
        let (codec, mut registry) = setup();
        let drop_record = parse(r#"{"op":"erase_pool","payload":"record"}"#);

        assert_eq!(
            codec.apply(&mut registry, drop_record.clone()).unwrap(),
            Applied::PoolDropped(true)
        );
        assert_eq!(
            codec.apply(&mut registry, drop_record).unwrap(),
            Applied::PoolDropped(false)
        );
        assert_eq!(
            codec.apply(&mut registry, Command::EraseAll).unwrap(),
            Applied::AllDropped(0)
        );
    }

    #[test]
    fn unknown_payload_is_rejected() {
        let (codec, mut registry) = setup();
        let cmd = parse(r#"{"op":"erase_pool","payload":"ghost"}"#);
        let err = codec.apply(&mut registry, cmd).unwrap_err();
        assert!(matches!(err, CodecError::UnknownPayload(name) if name == "ghost"));
    }

    #[test]
    fn decode_failure_reports_payload() {
        let (codec, mut registry) = setup();
        let cmd = parse(r#"{"op":"process","payload":"record","value":{"id":"one"}}"#);
        let err = codec.apply(&mut registry, cmd).unwrap_err();
        assert!(matches!(err, CodecError::Decode { ref payload, .. } if payload == "record"));
        assert!(registry.sink().transmissions().is_empty());
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut codec = PayloadCodec::<RecordingSink>::new();
        codec.register::<Record>().unwrap();
        let result = codec.register::<Record>();
        assert!(matches!(result, Err(CodecError::AlreadyRegistered(_))));
        assert_eq!(codec.payloads(), vec!["record"]);
    }
}
