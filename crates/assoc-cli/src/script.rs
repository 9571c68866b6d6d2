//! JSON Lines のコマンドスクリプト
//!
//! 空行と `#` で始まる行は読み飛ばします。

use std::io::BufRead;

use assoc_core::typed::Applied;
use assoc_core::{Command, PayloadCodec, Registry, Sink};
use tracing::info;

use crate::error::CliError;

/// 1 行ずつ Command に変換する。行番号は 1 始まり
pub fn parse<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, Command), CliError>> {
    reader.lines().enumerate().filter_map(|(idx, line)| {
        let line_no = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(source) => {
                return Some(Err(CliError::Read {
                    line: line_no,
                    source,
                }));
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        Some(
            serde_json::from_str::<Command>(trimmed)
                .map(|cmd| (line_no, cmd))
                .map_err(|source| CliError::Parse {
                    line: line_no,
                    source,
                }),
        )
    })
}

/// スクリプトを最後まで適用し、適用したコマンド数を返す
///
/// 最初のエラーで止まる。それまでに適用したコマンドは取り消さない。
pub fn apply<R: BufRead, S: Sink>(
    reader: R,
    codec: &PayloadCodec<S>,
    registry: &mut Registry<S>,
) -> Result<usize, CliError> {
    let mut applied = 0;
    for entry in parse(reader) {
        let (line, command) = entry?;
        let result = codec
            .apply(registry, command)
            .map_err(|source| CliError::Apply { line, source })?;
        if let Applied::Erased(removed) = result {
            info!(line, removed, "erase");
        }
        applied += 1;
    }
    Ok(applied)
}
