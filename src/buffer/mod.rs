mod dump;
mod patch;

pub use dump::DumpReader;
pub use patch::{OffsetBase, PatchStream, ReadWriteSeek};

use std::io;

/// バッファ操作のエラー
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 巻き戻し幅がシーク可能な範囲を超えた
    #[error("cannot rewind by {0} bytes")]
    RewindTooFar(usize),

    #[error("offset {offset:#x} is past the end of the file ({len:#x} bytes)")]
    OutOfBounds { offset: u64, len: u64 },
}

/// パッチ書き込みのエラー
///
/// 書き込みと巻き戻しのどちらで失敗したかを区別する。
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// 書き込み自体が失敗した（巻き戻しは行っていない）
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// 書き込みは完了したがカーソルを戻せなかった
    #[error("wrote {written} bytes but could not rewind: {source}")]
    Rewind {
        written: usize,
        #[source]
        source: BufferError,
    },
}

impl From<BufferError> for io::Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}

impl From<PatchError> for io::Error {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::Write(e) => e,
            PatchError::Rewind { source, .. } => source.into(),
        }
    }
}
