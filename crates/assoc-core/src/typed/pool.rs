//! Pool - 1 つの型に対する identity 判定と保存済み entry
//!
//! # 二層構造
//! - **表層（Typed）**: `Pool<T>` - 要素型を知っている
//! - **内部（Dyn）**: `DynPool` - object-safe, Registry の HashMap に格納するため

use std::any::Any;

use tracing::trace;

use super::identity::Identity;
use crate::domain::{ChangeKind, Payload};
use crate::ports::Sink;

/// Pool は型 T の identity 判定と、これまでに create された entry を保持
///
/// - identity が `None` の Pool は追跡しない。何も保存せず、常に `send` する
/// - entries は挿入順。重複の検査は新しく来た payload に対してだけ行う
pub struct Pool<T> {
    identity: Option<Box<dyn Identity<T>>>,
    entries: Vec<T>,
}

impl<T: Payload> Pool<T> {
    pub fn new(identity: impl Identity<T>) -> Self {
        Self {
            identity: Some(Box::new(identity)),
            entries: Vec::new(),
        }
    }

    pub fn untracked() -> Self {
        Self {
            identity: None,
            entries: Vec::new(),
        }
    }

    /// payload を分類して Sink に 1 回だけ送る
    ///
    /// 一致した場合も保存済みの entry は置き換えない。
    pub fn process<S: Sink>(&mut self, sink: &mut S, obj: T) -> ChangeKind {
        let Some(identity) = self.identity.as_deref() else {
            sink.send(&obj);
            return ChangeKind::Send;
        };

        let change = if self.entries.iter().any(|e| identity.same(e, &obj)) {
            sink.send_update(&obj);
            ChangeKind::Update
        } else {
            sink.send_create(&obj);
            self.entries.push(obj);
            ChangeKind::Create
        };
        trace!(payload = T::NAME, %change, entries = self.entries.len(), "classified");
        change
    }

    /// identity が一致する entry を全て削除し、削除した数を返す
    pub fn erase(&mut self, obj: &T) -> usize {
        let Some(identity) = self.identity.as_deref() else {
            return 0;
        };
        let before = self.entries.len();
        self.entries.retain(|e| !identity.same(e, obj));
        before - self.entries.len()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn is_tracked(&self) -> bool {
        self.identity.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// DynPool は要素型を消した Pool
///
/// `Box<dyn DynPool>` として TypeId ごとに格納し、
/// 使う時は `as_any_mut` から `Pool<T>` に downcast します。
pub trait DynPool {
    fn payload_name(&self) -> &'static str;
    fn len(&self) -> usize;
    fn is_tracked(&self) -> bool;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Payload> DynPool for Pool<T> {
    fn payload_name(&self) -> &'static str {
        T::NAME
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_tracked(&self) -> bool {
        self.identity.is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::fixtures::Record;
    use crate::impls::RecordingSink;
    use serde_json::json;

    fn by_id() -> Pool<Record> {
        Pool::new(|a: &Record, b: &Record| a.id == b.id)
    }

    #[test]
    fn untracked_pool_always_sends() {
        let mut sink = RecordingSink::new();
        let mut pool = Pool::<Record>::untracked();

        assert_eq!(pool.process(&mut sink, Record::new(1, "A")), ChangeKind::Send);
        assert_eq!(pool.process(&mut sink, Record::new(1, "A")), ChangeKind::Send);
        assert!(pool.is_empty());
        assert!(!pool.is_tracked());
        assert_eq!(sink.count(ChangeKind::Send), 2);
    }

    #[test]
    fn first_sighting_creates_and_stores() {
        let mut sink = RecordingSink::new();
        let mut pool = by_id();

        let change = pool.process(&mut sink, Record::new(1, "A"));
        assert_eq!(change, ChangeKind::Create);
        assert_eq!(pool.entries(), &[Record::new(1, "A")]);
        assert_eq!(sink.transmissions()[0].body, json!({ "id": 1, "name": "A" }));
    }

    #[test]
    fn match_updates_without_overwriting() {
        let mut sink = RecordingSink::new();
        let mut pool = by_id();

        pool.process(&mut sink, Record::new(1, "A"));
        let change = pool.process(&mut sink, Record::new(1, "B"));

        assert_eq!(change, ChangeKind::Update);
        assert_eq!(pool.entries(), &[Record::new(1, "A")]);
        let last = sink.transmissions().last().unwrap();
        assert_eq!(last.change, ChangeKind::Update);
        assert_eq!(last.body, json!({ "id": 1, "name": "B" }));
    }

    #[test]
    fn never_matching_identity_is_append_only() {
        let mut sink = RecordingSink::new();
        let mut pool = Pool::new(|_: &Record, _: &Record| false);

        for _ in 0..3 {
            assert_eq!(pool.process(&mut sink, Record::new(1, "A")), ChangeKind::Create);
        }
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn erase_removes_every_match() {
        let mut sink = RecordingSink::new();
        // 同値関係ではない判定: 既存の id が incoming 以上なら一致
        let mut pool = Pool::new(|existing: &Record, incoming: &Record| existing.id >= incoming.id);
        pool.process(&mut sink, Record::new(1, "A"));
        pool.process(&mut sink, Record::new(2, "B"));
        pool.process(&mut sink, Record::new(3, "C"));
        assert_eq!(sink.count(ChangeKind::Create), 3);
        let sent = sink.transmissions().len();

        let removed = pool.erase(&Record::new(2, "any"));
        assert_eq!(removed, 2);
        assert_eq!(pool.entries(), &[Record::new(1, "A")]);
        assert_eq!(sink.transmissions().len(), sent);
    }

    #[test]
    fn erase_missing_identity_is_noop() {
        let mut sink = RecordingSink::new();
        let mut pool = by_id();
        pool.process(&mut sink, Record::new(1, "A"));
        let sent = sink.transmissions().len();

        assert_eq!(pool.erase(&Record::new(2, "A")), 0);
        assert_eq!(pool.len(), 1);
        assert_eq!(sink.transmissions().len(), sent);
    }

    #[test]
    fn erase_on_untracked_pool_is_noop() {
        let mut pool = Pool::<Record>::untracked();
        assert_eq!(pool.erase(&Record::new(1, "A")), 0);
    }

    #[test]
    fn dyn_pool_downcasts_to_concrete_type() {
        let mut boxed: Box<dyn DynPool> = Box::new(by_id());
        assert_eq!(boxed.payload_name(), "record");
        assert!(boxed.is_tracked());
        assert!(boxed.as_any_mut().downcast_mut::<Pool<Record>>().is_some());
        assert!(boxed.as_any().downcast_ref::<Pool<String>>().is_none());
    }
}
