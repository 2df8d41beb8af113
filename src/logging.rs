use std::io;

use tracing::Level;

/// `-v` の回数に応じたログ出力を標準エラーに設定
///
/// 標準出力はダンプ専用なので、ログは必ず標準エラーに出す。
pub fn init(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
