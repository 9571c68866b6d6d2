use thiserror::Error;

/// CodecError は PayloadCodec の登録と適用のエラー
///
/// Registry 自体の操作は失敗しません。
/// 失敗しうるのは payload 名と JSON を型に戻す部分だけです。
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("codec for payload '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("no codec registered for payload '{0}'")]
    UnknownPayload(String),

    #[error("failed to decode payload '{payload}': {source}")]
    Decode {
        payload: String,
        #[source]
        source: serde_json::Error,
    },
}
