use std::fmt::Display;
use std::io::{BufRead, ErrorKind, Read, Seek, SeekFrom, Write};

use anyhow::Result;
use tracing::{debug, info};

use super::{Command, HexInput, decode_hex};
use crate::buffer::{BufferError, PatchStream, ReadWriteSeek};

/// ダンプ表示用のコピーバッファサイズ
const COPY_BUF_SIZE: usize = 8 * 1024;

/// 行入力によるパッチ操作
///
/// 毎回ファイル全体のダンプを表示し、オフセットと16進値を尋ねて書き込む。
/// 元データの I/O エラーは表示して続行し、出力先への書き込みエラーだけを返す。
pub struct App<S> {
    /// 編集中のストリーム
    stream: PatchStream<S>,
    /// 終了フラグ
    should_quit: bool,
}

impl<S: ReadWriteSeek> App<S> {
    pub fn new(stream: PatchStream<S>) -> Self {
        Self {
            stream,
            should_quit: false,
        }
    }

    /// 終了すべきかどうか
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn into_inner(self) -> PatchStream<S> {
        self.stream
    }

    /// 入力が終わるか quit されるまでループする
    pub fn run<I: BufRead, O: Write>(&mut self, mut input: I, mut output: O) -> Result<()> {
        while !self.should_quit {
            self.step(&mut input, &mut output)?;
        }
        output.flush()?;
        Ok(())
    }

    /// 1巡分: ダンプ表示 → オフセット入力 → 16進入力 → 書き込み
    pub fn step<I: BufRead, O: Write>(&mut self, input: &mut I, output: &mut O) -> Result<()> {
        self.show_dump(output)?;

        writeln!(output)?;
        write!(output, "Edit which offset?  ")?;
        output.flush()?;

        let Some(line) = self.read_reply(input, output)? else {
            return Ok(());
        };
        let offset = match Command::parse(&line) {
            Ok(Command::Quit) => {
                self.should_quit = true;
                return Ok(());
            }
            Ok(Command::Edit(offset)) => offset,
            Err(e) => return report(output, e),
        };
        if let Err(e) = self.check_offset(offset) {
            return report(output, e);
        }

        writeln!(output, "Type in your new hex values here...")?;
        output.flush()?;

        let Some(line) = self.read_reply(input, output)? else {
            return Ok(());
        };
        let HexInput { bytes, error } = decode_hex(&line);
        if let Some(e) = error {
            report(output, e)?;
        }
        if bytes.is_empty() {
            return Ok(());
        }

        match self.write_at(offset, &bytes) {
            Ok(n) => writeln!(output, "Patched {n} bytes at {offset:#010x}")?,
            Err(e) => report(output, format!("{e:#}"))?,
        }
        Ok(())
    }

    /// 先頭からダンプ全体を出力
    fn show_dump<O: Write>(&mut self, output: &mut O) -> Result<()> {
        if let Err(e) = self.stream.seek(SeekFrom::Start(0)) {
            return report(output, e);
        }
        let mut pass = match self.stream.pass() {
            Ok(pass) => pass,
            Err(e) => return report(output, e),
        };

        let mut buf = [0u8; COPY_BUF_SIZE];
        loop {
            match pass.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => output.write_all(&buf[..n])?,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return report(output, e),
            }
        }
        Ok(())
    }

    /// 1行読む（入力終了なら終了フラグを立てる）
    fn read_reply<I: BufRead, O: Write>(
        &mut self,
        input: &mut I,
        output: &mut O,
    ) -> Result<Option<String>> {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                self.should_quit = true;
                Ok(None)
            }
            Ok(_) => Ok(Some(line)),
            Err(e) => {
                report(output, e)?;
                Ok(None)
            }
        }
    }

    /// 書き込み先がファイル末尾を超えていないか確認（末尾ちょうどは追記）
    fn check_offset(&mut self, offset: u64) -> Result<(), BufferError> {
        let len = self.stream.source_len()?;
        if offset > len {
            return Err(BufferError::OutOfBounds { offset, len });
        }
        Ok(())
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> Result<usize> {
        self.stream.seek(SeekFrom::Start(offset))?;
        let n = self.stream.patch(bytes)?;
        info!(offset, len = n, "patched");
        Ok(n)
    }
}

/// エラーを表示して続行する
fn report<O: Write>(output: &mut O, err: impl Display) -> Result<()> {
    debug!("reported error: {err}");
    writeln!(output, "error: {err}")?;
    Ok(())
}
