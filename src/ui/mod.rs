//! ダンプ表示

mod dump_line;

pub use dump_line::{BYTES_PER_LINE, DumpLine, LINE_LEN, hex_dump};
