//! デモ用の payload 型と登録内容

use std::fmt;

use assoc_core::{CodecError, PayloadCodec, Payload, Registry, Sink, by_key};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i32,
    pub name: String,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {{{},{}}}", self.id, self.name)
    }
}

impl Payload for Player {
    const NAME: &'static str = "player";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub code: i32,
    pub value: f64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position {{{},{:.6}}}", self.code, self.value)
    }
}

impl Payload for Position {
    const NAME: &'static str = "position";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teleportation {
    pub x: f32,
    pub y: f32,
}

impl fmt::Display for Teleportation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Teleportation {{{:.6},{:.6}}}", self.x, self.y)
    }
}

impl Payload for Teleportation {
    const NAME: &'static str = "teleportation";
}

/// Player は id、Position は code で identity を決める。Teleportation は登録しない
pub fn register<S: Sink>(registry: &mut Registry<S>) {
    registry.register::<Player>(|a: &Player, b: &Player| a.id == b.id);
    registry.register(by_key(|p: &Position| p.code));
}

/// スクリプトから扱える payload の codec
pub fn codec<S: Sink>() -> Result<PayloadCodec<S>, CodecError> {
    let mut codec = PayloadCodec::new();
    codec.register::<Player>()?;
    codec.register::<Position>()?;
    codec.register::<Teleportation>()?;
    Ok(codec)
}

/// 組み込みのデモシーケンス
pub fn run<S: Sink>(registry: &mut Registry<S>) {
    registry.process(Player {
        id: 1,
        name: "Victor".to_string(),
    });
    registry.process(Player {
        id: 1,
        name: "Toto".to_string(),
    });
    registry.process(Position {
        code: 42,
        value: 1.5,
    });
    registry.process(Position {
        code: 42,
        value: 2.25,
    });
    registry.process(Player {
        id: 2,
        name: "EVA".to_string(),
    });
    registry.process(Teleportation { x: 10.0, y: 20.0 });

    registry.erase(&Player {
        id: 1,
        name: "mort".to_string(),
    });
}
