//! RecordingSink - 呼び出しを記録する Sink（テスト・埋め込み用）

use tracing::warn;

use crate::domain::{ChangeKind, Payload, Transmission};
use crate::ports::Sink;

/// RecordingSink は受け取った呼び出しを順番に記録
#[derive(Debug, Default)]
pub struct RecordingSink {
    transmissions: Vec<Transmission>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transmissions(&self) -> &[Transmission] {
        &self.transmissions
    }

    /// 記録を取り出して空にする
    pub fn take(&mut self) -> Vec<Transmission> {
        std::mem::take(&mut self.transmissions)
    }

    pub fn count(&self, change: ChangeKind) -> usize {
        self.transmissions
            .iter()
            .filter(|t| t.change == change)
            .count()
    }

    fn record<T: Payload>(&mut self, change: ChangeKind, obj: &T) {
        match Transmission::capture(change, obj) {
            Ok(t) => self.transmissions.push(t),
            Err(e) => warn!(payload = T::NAME, %change, error = %e, "failed to record payload"),
        }
    }
}

impl Sink for RecordingSink {
    fn send<T: Payload>(&mut self, obj: &T) {
        self.record(ChangeKind::Send, obj);
    }

    fn send_create<T: Payload>(&mut self, obj: &T) {
        self.record(ChangeKind::Create, obj);
    }

    fn send_update<T: Payload>(&mut self, obj: &T) {
        self.record(ChangeKind::Update, obj);
    }
}
