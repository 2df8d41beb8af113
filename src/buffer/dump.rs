use std::io::{self, ErrorKind, Read};

use tracing::trace;

use crate::ui::{BYTES_PER_LINE, DumpLine};

/// チャンク読み込みの終わり方
enum ChunkEnd {
    /// 16バイト揃った
    Full,
    /// 終端に達した
    Eof,
    /// 元データがエラーを返した
    Failed(io::Error),
}

/// 元データのバイト列をダンプテキストとして読み出すリーダー
///
/// 16バイトごとに1行を生成し、呼び出し側のバッファに収まらなかった分は
/// 次の呼び出しまで保持する。アドレス欄には、このリーダーが生成されてから
/// 実際に読み込んだバイト数を表示する（元データのシーク位置とは無関係）。
pub struct DumpReader<R> {
    /// 元データ
    source: R,
    /// 読み込み済みバイト数（アドレス欄用）
    offset: u64,
    /// バッファに収まらなかった行テキスト（最大1行）
    leftover: Vec<u8>,
    /// leftover の読み出し位置
    leftover_pos: usize,
    /// 次の呼び出しで返すエラー
    pending_error: Option<io::Error>,
}

impl<R: Read> DumpReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_base_offset(source, 0)
    }

    /// アドレス欄を `base` から数え始める
    pub fn with_base_offset(source: R, base: u64) -> Self {
        Self {
            source,
            offset: base,
            leftover: Vec::new(),
            leftover_pos: 0,
            pending_error: None,
        }
    }

    /// 次の行のアドレス
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 持ち越し中のエラーを取り出す
    ///
    /// リーダーを使い捨てる側が、エラーを落とさずに引き継ぐために使う。
    pub(crate) fn take_pending_error(&mut self) -> Option<io::Error> {
        self.pending_error.take()
    }

    /// 16バイト揃うまで読み込む
    ///
    /// 短い読み込みは続けて読み直し、終端かエラーで打ち切る。
    /// ループは毎回進むか抜けるので最大16回で終わる（Interrupted を除く）。
    fn fill_chunk(&mut self, chunk: &mut [u8; BYTES_PER_LINE]) -> (usize, ChunkEnd) {
        let mut filled = 0;
        while filled < BYTES_PER_LINE {
            match self.source.read(&mut chunk[filled..]) {
                Ok(0) => return (filled, ChunkEnd::Eof),
                Ok(n) => filled += n.min(BYTES_PER_LINE - filled),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return (filled, ChunkEnd::Failed(e)),
            }
        }
        (filled, ChunkEnd::Full)
    }

    /// 1行を生成して leftover に置く
    fn emit_line(&mut self, chunk: &[u8; BYTES_PER_LINE], filled: usize) {
        debug_assert_eq!(self.leftover_pos, self.leftover.len());
        self.leftover.clear();
        self.leftover_pos = 0;

        // カウンタが0の間はレンダラ本来の 00000000 と同じ
        DumpLine::new(self.offset, chunk).render_into(&mut self.leftover);
        trace!(offset = self.offset, filled, "rendered dump line");

        // 0埋めした分は数えない
        self.offset += filled as u64;
    }

    /// leftover を `buf` にできるだけ書き出す
    fn drain_leftover(&mut self, buf: &mut [u8]) -> usize {
        let pending = &self.leftover[self.leftover_pos..];
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        self.leftover_pos += n;
        n
    }
}

impl<R: Read> Read for DumpReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        // 前回の残りを先に返す
        let mut written = self.drain_leftover(buf);

        while written < buf.len() {
            if let Some(err) = self.pending_error.take() {
                if written == 0 {
                    return Err(err);
                }
                // 書き出し済みの分を先に返し、エラーは次回に回す
                self.pending_error = Some(err);
                break;
            }

            let mut chunk = [0u8; BYTES_PER_LINE];
            let (filled, end) = self.fill_chunk(&mut chunk);
            if filled > 0 {
                self.emit_line(&chunk, filled);
                written += self.drain_leftover(&mut buf[written..]);
            }

            match end {
                ChunkEnd::Full => {}
                ChunkEnd::Eof => break,
                ChunkEnd::Failed(err) => self.pending_error = Some(err),
            }
        }

        Ok(written)
    }
}
