//! Registry - 型ごとの Pool の登録と振り分け
//!
//! # 内部実装
//! - `HashMap<TypeId, Box<dyn DynPool>>` で型消去された Pool を管理
//! - 登録と参照は同じ `TypeId::of::<T>()` をキーにするので、
//!   downcast 先の `Pool<T>` は構築上必ず一致する
//! - Registry は Sink と全ての Pool を所有する（グローバル状態なし）

use std::any::TypeId;
use std::collections::HashMap;

use tracing::{debug, trace};

use super::identity::Identity;
use super::pool::{DynPool, Pool};
use crate::domain::{ChangeKind, Payload};
use crate::ports::Sink;

/// Registry は payload の型で Pool を選び、分類結果を Sink に送る
///
/// # 使用例
/// ```ignore
/// let mut registry = Registry::new(TextSink::new(std::io::stdout()));
/// registry.register::<Player>(|a: &Player, b: &Player| a.id == b.id);
///
/// registry.process(Player { id: 1, name: "Victor".into() }); // Create
/// registry.process(Player { id: 1, name: "Toto".into() });   // Update
/// registry.process(Teleportation { x: 10.0, y: 20.0 });      // Send
/// ```
///
/// # 並行性
/// 全ての変更操作は `&mut self` を取ります。
/// 複数スレッドから使う場合は Registry 全体を 1 つの lock で包んでください。
pub struct Registry<S> {
    sink: S,
    pools: HashMap<TypeId, Box<dyn DynPool>>,
}

impl<S: Sink> Registry<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            pools: HashMap::new(),
        }
    }

    /// T の Pool を identity 付きで登録する
    ///
    /// 既に登録されていれば Pool ごと置き換え、保存済みの entry は捨てる。
    pub fn register<T: Payload>(&mut self, identity: impl Identity<T>) {
        self.install(Pool::<T>::new(identity));
    }

    /// identity なしの Pool を登録する。T は常に `send` される
    pub fn register_untracked<T: Payload>(&mut self) {
        self.install(Pool::<T>::untracked());
    }

    fn install<T: Payload>(&mut self, pool: Pool<T>) {
        let tracked = pool.is_tracked();
        let replaced = self
            .pools
            .insert(TypeId::of::<T>(), Box::new(pool))
            .is_some();
        debug!(payload = T::NAME, tracked, replaced, "registered pool");
    }

    /// obj を分類して Sink に 1 回だけ送る
    ///
    /// T の Pool がなければ `send` する。Pool は暗黙には作られない。
    pub fn process<T: Payload>(&mut self, obj: T) -> ChangeKind {
        match pool_mut::<T>(&mut self.pools) {
            Some(pool) => pool.process(&mut self.sink, obj),
            None => {
                trace!(payload = T::NAME, "no pool, plain send");
                self.sink.send(&obj);
                ChangeKind::Send
            }
        }
    }

    /// identity が obj と一致する entry を全て削除し、削除した数を返す
    ///
    /// Sink には何も送らない。Pool がなければ何もしない。
    pub fn erase<T: Payload>(&mut self, obj: &T) -> usize {
        let Some(pool) = pool_mut::<T>(&mut self.pools) else {
            return 0;
        };
        let removed = pool.erase(obj);
        debug!(payload = T::NAME, removed, "erased entries");
        removed
    }

    /// T の Pool を identity と entry ごと削除する。Pool があったかを返す
    pub fn erase_pool<T: Payload>(&mut self) -> bool {
        let removed = self.pools.remove(&TypeId::of::<T>());
        if let Some(pool) = &removed {
            debug!(payload = T::NAME, entries = pool.len(), "dropped pool");
        }
        removed.is_some()
    }

    /// 全ての Pool を削除し、削除した Pool の数を返す
    pub fn erase_all(&mut self) -> usize {
        let dropped = self.pools.len();
        self.pools.clear();
        debug!(pools = dropped, "dropped all pools");
        dropped
    }

    pub fn is_registered<T: Payload>(&self) -> bool {
        self.pools.contains_key(&TypeId::of::<T>())
    }

    /// T の保存済み entry（挿入順）。Pool がなければ `None`
    pub fn entries<T: Payload>(&self) -> Option<&[T]> {
        self.pools
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Pool<T>>()
            .map(Pool::entries)
    }

    /// 登録済み payload 名（ソート済み）
    pub fn registered_payloads(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.pools.values().map(|p| p.payload_name()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

fn pool_mut<T: Payload>(pools: &mut HashMap<TypeId, Box<dyn DynPool>>) -> Option<&mut Pool<T>> {
    pools
        .get_mut(&TypeId::of::<T>())?
        .as_any_mut()
        .downcast_mut::<Pool<T>>()
}
