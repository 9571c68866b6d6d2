//! Typed - 型ごとの Pool と振り分け
//!
//! # 二層構造
//! - **表層（Typed）**: `Pool<T>`, `Identity<T>` - 型安全
//! - **内部（Dyn）**: `DynPool` - object-safe, type erasure
//!
//! Registry は TypeId で `DynPool` を引き、同じ型引数で `Pool<T>` に戻します。

pub mod codec;
pub mod identity;
pub mod pool;
pub mod registry;

pub use self::codec::{Applied, Command, PayloadCodec};
pub use self::identity::{ByKey, Identity, by_key};
pub use self::pool::{DynPool, Pool};
pub use self::registry::Registry;
