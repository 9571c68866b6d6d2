//! Sink port - 分類結果の送信先の抽象化
//!
//! Sink は fire-and-forget です。戻り値も失敗の通知もありません。
//! 実装側で起きた I/O エラーなどは実装側でログに残して握りつぶします。

use crate::domain::{ChangeKind, Payload};

/// Sink は Registry が分類した payload を受け取る
///
/// process 1 回につき、必ずどれか 1 つのメソッドが 1 回だけ呼ばれます。
///
/// # 実装
/// - RecordingSink: 呼び出しを記録（テスト用）
/// - TextSink: `Create: Player {1,Victor}` 形式で書き出し
/// - JsonSink: JSON Lines で書き出し
pub trait Sink {
    /// 追跡対象外の payload
    fn send<T: Payload>(&mut self, obj: &T);

    /// 初めて見る identity
    fn send_create<T: Payload>(&mut self, obj: &T);

    /// 既に保存されている identity
    fn send_update<T: Payload>(&mut self, obj: &T);

    fn transmit<T: Payload>(&mut self, change: ChangeKind, obj: &T) {
        match change {
            ChangeKind::Send => self.send(obj),
            ChangeKind::Create => self.send_create(obj),
            ChangeKind::Update => self.send_update(obj),
        }
    }
}

/// 呼び出し側が所有する Sink を借用したまま Registry に渡せるようにする
impl<S: Sink> Sink for &mut S {
    fn send<T: Payload>(&mut self, obj: &T) {
        (**self).send(obj)
    }

    fn send_create<T: Payload>(&mut self, obj: &T) {
        (**self).send_create(obj)
    }

    fn send_update<T: Payload>(&mut self, obj: &T) {
        (**self).send_update(obj)
    }
}
