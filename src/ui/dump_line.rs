/// 1行あたりのバイト数
pub const BYTES_PER_LINE: usize = 16;

/// 1行のテキスト長（改行込み）
///
/// `oooooooo  xx xx xx xx xx xx xx xx  xx xx xx xx xx xx xx xx  |cccccccccccccccc|\n`
pub const LINE_LEN: usize = 79;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// 正規形式（`hexdump -C` 互換）のダンプ1行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpLine<'a> {
    /// アドレス欄に表示するオフセット
    offset: u64,
    /// 16バイト分のデータ（短いチャンクは0埋め済み）
    bytes: &'a [u8; BYTES_PER_LINE],
}

impl<'a> DumpLine<'a> {
    pub fn new(offset: u64, bytes: &'a [u8; BYTES_PER_LINE]) -> Self {
        Self { offset, bytes }
    }

    /// 行テキストを `out` の末尾に追加
    pub fn render_into(&self, out: &mut Vec<u8>) {
        out.reserve(LINE_LEN);

        // アドレス欄は下位32ビットの8桁固定
        for byte in (self.offset as u32).to_be_bytes() {
            push_hex(out, byte);
        }
        out.extend_from_slice(b"  ");

        // HEX欄（8バイトごとに区切りスペース）
        for (i, &byte) in self.bytes.iter().enumerate() {
            push_hex(out, byte);
            out.push(b' ');
            if i == 7 {
                out.push(b' ');
            }
        }

        // ASCII欄
        out.extend_from_slice(b" |");
        out.extend(self.bytes.iter().map(|&b| display_byte(b)));
        out.extend_from_slice(b"|\n");
    }

    /// 行テキストを新しいバッファに生成
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LINE_LEN);
        self.render_into(&mut out);
        out
    }
}

fn push_hex(out: &mut Vec<u8>, byte: u8) {
    out.push(HEX_DIGITS[(byte >> 4) as usize]);
    out.push(HEX_DIGITS[(byte & 0x0F) as usize]);
}

/// 表示可能なASCII以外は '.'
fn display_byte(byte: u8) -> u8 {
    match byte {
        0x20..=0x7E => byte,
        _ => b'.',
    }
}

/// バイト列全体を一度にダンプする
///
/// アドレスは先頭から0始まりで、最後の短いチャンクは0埋めして描画する。
pub fn hex_dump(data: &[u8]) -> String {
    let lines = data.len().div_ceil(BYTES_PER_LINE);
    let mut out = Vec::with_capacity(lines * LINE_LEN);
    for (i, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let mut padded = [0u8; BYTES_PER_LINE];
        padded[..chunk.len()].copy_from_slice(chunk);
        DumpLine::new((i * BYTES_PER_LINE) as u64, &padded).render_into(&mut out);
    }
    // 出力はすべてASCII
    out.into_iter().map(char::from).collect()
}
