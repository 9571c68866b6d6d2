//! Ports - 抽象化レイヤー
//!
//! Registry の外側にあるもの（送信先、時刻）への interface です。

pub mod clock;
pub mod sink;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::sink::Sink;
