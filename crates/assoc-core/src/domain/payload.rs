//! Payload trait - 転送されるデータ型の定義
//!
//! Registry に流れる全ての型はこの trait を実装します。

use std::fmt;

use serde::Serialize;

/// Payload は Registry と Sink を通過するデータ型
///
/// # 使用例
/// ```ignore
/// #[derive(Serialize)]
/// struct Player {
///     id: i32,
///     name: String,
/// }
///
/// impl fmt::Display for Player {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "Player {{{},{}}}", self.id, self.name)
///     }
/// }
///
/// impl Payload for Player {
///     const NAME: &'static str = "player";
/// }
/// ```
///
/// # Trait Bounds
/// - `Serialize`: JSON 出力と記録のため
/// - `Display`: テキスト出力のため
/// - `'static`: TypeId をキーにした型消去のため
pub trait Payload: Serialize + fmt::Display + 'static {
    /// ログ、JSON 出力、コマンドで使う payload 名
    const NAME: &'static str;
}
