mod input;
mod state;

pub use input::{HexInput, InputError, decode_hex, parse_offset};
pub use state::App;

/// オフセット入力への応答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 終了
    Quit,
    /// 指定オフセットを書き換える
    Edit(u64),
}

impl Command {
    /// プロンプトへの入力をコマンドに変換
    pub fn parse(input: &str) -> Result<Self, InputError> {
        match input.trim().to_lowercase().as_str() {
            "q" | "quit" => Ok(Command::Quit),
            _ => parse_offset(input).map(Command::Edit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_words() {
        assert_eq!(Command::parse("q\n"), Ok(Command::Quit));
        assert_eq!(Command::parse(" QUIT "), Ok(Command::Quit));
    }

    #[test]
    fn anything_else_is_an_offset() {
        assert_eq!(Command::parse("0x20\n"), Ok(Command::Edit(32)));
        assert_eq!(Command::parse("\n"), Err(InputError::Empty));
    }
}
