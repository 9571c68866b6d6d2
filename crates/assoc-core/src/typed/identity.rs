//! Identity - 同じエンティティかどうかを判定する strategy
//!
//! 型の `PartialEq` ではなく、呼び出し側が渡した判定で identity を決めます。
//! closure でも struct でも実装できるので、外部の状態を捕まえた判定も書けます。

use std::marker::PhantomData;

/// Identity は既存の entry と新しい payload が同じエンティティかを判定
///
/// 同値関係である必要はありません。
/// Pool は update 判定では最初の一致だけを使い、erase では一致した全てを消します。
///
/// # 使用例
/// ```ignore
/// registry.register::<Player>(|a: &Player, b: &Player| a.id == b.id);
/// registry.register::<Player>(by_key(|p: &Player| p.id));
/// ```
pub trait Identity<T>: 'static {
    fn same(&self, existing: &T, incoming: &T) -> bool;
}

impl<T, F> Identity<T> for F
where
    F: Fn(&T, &T) -> bool + 'static,
{
    fn same(&self, existing: &T, incoming: &T) -> bool {
        self(existing, incoming)
    }
}

/// 取り出したキーの等値で判定する Identity
pub struct ByKey<T, K, F> {
    key: F,
    _marker: PhantomData<fn(&T) -> K>,
}

/// `key` が返す値が等しければ同じエンティティとみなす
pub fn by_key<T, K, F>(key: F) -> ByKey<T, K, F>
where
    F: Fn(&T) -> K + 'static,
    K: PartialEq,
{
    ByKey {
        key,
        _marker: PhantomData,
    }
}

impl<T, K, F> Identity<T> for ByKey<T, K, F>
where
    T: 'static,
    K: PartialEq + 'static,
    F: Fn(&T) -> K + 'static,
{
    fn same(&self, existing: &T, incoming: &T) -> bool {
        (self.key)(existing) == (self.key)(incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payload::fixtures::Record;
    use std::cell::Cell;
    use std::rc::Rc;

    fn check<T>(identity: &impl Identity<T>, a: &T, b: &T) -> bool {
        identity.same(a, b)
    }

    #[test]
    fn closure_is_identity() {
        let by_id = |a: &Record, b: &Record| a.id == b.id;
        assert!(check(&by_id, &Record::new(1, "A"), &Record::new(1, "B")));
        assert!(!check(&by_id, &Record::new(1, "A"), &Record::new(2, "A")));
    }

    #[test]
    fn by_key_compares_extracted_keys() {
        let identity = by_key(|r: &Record| r.name.to_lowercase());
        assert!(identity.same(&Record::new(1, "Eva"), &Record::new(2, "EVA")));
        assert!(!identity.same(&Record::new(1, "Eva"), &Record::new(1, "Victor")));
    }

    #[test]
    fn closure_can_capture_external_state() {
        let offset = Rc::new(Cell::new(0));
        let shared = offset.clone();
        let identity = move |a: &Record, b: &Record| a.id + shared.get() == b.id;

        assert!(identity.same(&Record::new(1, "A"), &Record::new(1, "A")));
        offset.set(10);
        assert!(!identity.same(&Record::new(1, "A"), &Record::new(1, "A")));
        assert!(identity.same(&Record::new(1, "A"), &Record::new(11, "A")));
    }
}
