use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::debug;

use super::{BufferError, DumpReader, PatchError};

/// 読み込み・書き込み・シークができる元データ
pub trait ReadWriteSeek: Read + Write + Seek {}

impl<T: Read + Write + Seek + ?Sized> ReadWriteSeek for T {}

/// ダンプのアドレス欄の基準
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetBase {
    /// 読み出しを始めた位置を 00000000 とする
    #[default]
    Relative,
    /// ファイル先頭からの位置
    Absolute,
}

/// 読み出すとダンプテキスト、書き込むと生バイトの上書きになるストリーム
///
/// 書き込み後はカーソルを書き込み前の位置に戻すので、続けて読み出すと
/// 書き換えた範囲がそのまま表示される。バッファリングもトランザクションも
/// 持たず、カーソル以外に保持するのは `read` で持ち越したエラーだけ。
pub struct PatchStream<S> {
    /// 対象データ
    source: S,
    /// アドレス欄の基準
    offset_base: OffsetBase,
    /// 前回の `read` で出力の後に起きたエラー（次の `read` で返す）
    deferred: Option<io::Error>,
}

impl<S: ReadWriteSeek> PatchStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            offset_base: OffsetBase::Relative,
            deferred: None,
        }
    }

    pub fn offset_base(mut self, base: OffsetBase) -> Self {
        self.offset_base = base;
        self
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// 現在位置から始まる1回分のダンプ
    ///
    /// 残りの行テキストとアドレスは返したリーダーの中で引き継がれるので、
    /// `io::copy` などでまとめて読む場合はこちらを使う。
    pub fn pass(&mut self) -> io::Result<DumpReader<&mut S>> {
        let base = match self.offset_base {
            OffsetBase::Relative => 0,
            OffsetBase::Absolute => self.source.stream_position()?,
        };
        debug!(base, "starting dump pass");
        Ok(DumpReader::with_base_offset(&mut self.source, base))
    }

    /// 現在位置に `bytes` を上書きし、カーソルを書き込み前に戻す
    ///
    /// 書き込みが失敗した場合は巻き戻しを行わない。途中まで書けていても
    /// そのまま残る。
    pub fn patch(&mut self, bytes: &[u8]) -> Result<usize, PatchError> {
        self.source.write_all(bytes).map_err(PatchError::Write)?;
        self.rewind(bytes.len()).map_err(|source| PatchError::Rewind {
            written: bytes.len(),
            source,
        })?;
        debug!(len = bytes.len(), "patched bytes");
        Ok(bytes.len())
    }

    /// 書き込んだ分だけカーソルを戻す
    fn rewind(&mut self, written: usize) -> Result<u64, BufferError> {
        let back = i64::try_from(written).map_err(|_| BufferError::RewindTooFar(written))?;
        let pos = self.source.seek(SeekFrom::Current(-back))?;
        debug!(written, pos, "rewound after write");
        Ok(pos)
    }

    /// 元データの長さ（カーソル位置は変えない）
    pub fn source_len(&mut self) -> io::Result<u64> {
        let pos = self.source.stream_position()?;
        let len = self.source.seek(SeekFrom::End(0))?;
        if pos != len {
            self.source.seek(SeekFrom::Start(pos))?;
        }
        Ok(len)
    }
}

impl<S: ReadWriteSeek> Read for PatchStream<S> {
    /// 呼び出しごとに新しい `DumpReader` で読み出す
    ///
    /// アドレスは毎回数え直し、バッファに収まらなかった行の残りは捨てられる。
    /// 出力の後に起きた元データのエラーは捨てずに次の呼び出しで返す。
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }

        let (n, pending) = {
            let mut reader = self.pass()?;
            let n = reader.read(buf)?;
            (n, reader.take_pending_error())
        };
        if let Some(err) = pending {
            debug!(%err, "deferring source error to next read");
            self.deferred = Some(err);
        }
        Ok(n)
    }
}

impl<S: ReadWriteSeek> Write for PatchStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.source.write(buf)?;
        self.rewind(n)?;
        Ok(n)
    }

    // 既定の実装は巻き戻した位置に繰り返し書き込んでしまう
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.patch(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.source.flush()
    }
}

impl<S: ReadWriteSeek> Seek for PatchStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.source.seek(pos)
    }
}
