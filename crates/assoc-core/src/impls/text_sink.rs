//! TextSink - 1 呼び出し 1 行のテキスト出力

use std::io::Write;

use tracing::warn;

use crate::domain::{ChangeKind, Payload};
use crate::ports::Sink;

/// TextSink は `<Change>: <Display>` の形式で 1 行ずつ書き出す
///
/// ```text
/// Create: Player {1,Victor}
/// Update: Player {1,Toto}
/// Send: Teleportation {10.000000,20.000000}
/// ```
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line<T: Payload>(&mut self, change: ChangeKind, obj: &T) {
        if let Err(e) = writeln!(self.out, "{change}: {obj}") {
            warn!(payload = T::NAME, %change, error = %e, "failed to write transmission");
        }
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn send<T: Payload>(&mut self, obj: &T) {
        self.line(ChangeKind::Send, obj);
    }

    fn send_create<T: Payload>(&mut self, obj: &T) {
        self.line(ChangeKind::Create, obj);
    }

    fn send_update<T: Payload>(&mut self, obj: &T) {
        self.line(ChangeKind::Update, obj);
    }
}
