/// オペレータ入力のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("no offset given")]
    Empty,

    #[error("invalid offset: {0}")]
    InvalidOffset(String),

    /// 不正な16進ペア（`index` は0始まり）
    #[error("{pair:?} is not a valid byte (pair {})", .index + 1)]
    InvalidPair { index: usize, pair: String },
}

/// 16進入力のデコード結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HexInput {
    /// 不正なペアより前にデコードできたバイト列
    pub bytes: Vec<u8>,
    /// 最初の不正なペア
    pub error: Option<InputError>,
}

/// 全角英数記号（U+FF01〜U+FF5E）を半角に変換
fn normalize_fullwidth(c: char) -> char {
    let cp = c as u32;
    if (0xFF01..=0xFF5E).contains(&cp) {
        char::from_u32(cp - 0xFF00 + 0x20).unwrap_or(c)
    } else if c == '　' {
        ' '
    } else {
        c
    }
}

fn hex_value(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}

/// オフセットをパース
///
/// 10進数のほか、`0x` プレフィックス・`h` サフィックス付き、
/// または A-F を含む文字列は16進数として解釈する。符号は受け付けない。
pub fn parse_offset(input: &str) -> Result<u64, InputError> {
    let input: String = input.trim().chars().map(normalize_fullwidth).collect();
    if input.is_empty() {
        return Err(InputError::Empty);
    }
    // from_str_radix は先頭の `+` を通してしまう
    if !input.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(InputError::InvalidOffset(input));
    }

    let hex_prefixed = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X"));
    let parsed = if let Some(hex) = hex_prefixed {
        u64::from_str_radix(hex, 16)
    } else if let Some(hex) = input.strip_suffix(['h', 'H']) {
        u64::from_str_radix(hex, 16)
    } else if input.chars().all(|c| c.is_ascii_hexdigit())
        && input.chars().any(|c| c.is_ascii_alphabetic())
    {
        u64::from_str_radix(&input, 16)
    } else {
        input.parse()
    };

    parsed.map_err(|_| InputError::InvalidOffset(input))
}

/// 空白を除いた16進文字列を2桁ずつバイトに変換
///
/// 最初の不正なペア（末尾の1桁だけのものを含む）で止まり、
/// それまでにデコードしたバイトは残す。
pub fn decode_hex(input: &str) -> HexInput {
    let digits: Vec<char> = input
        .chars()
        .map(normalize_fullwidth)
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut decoded = HexInput {
        bytes: Vec::with_capacity(digits.len() / 2),
        error: None,
    };
    for (index, pair) in digits.chunks(2).enumerate() {
        let byte = match pair {
            [high, low] => hex_value(*high).zip(hex_value(*low)).map(|(h, l)| (h << 4) | l),
            _ => None,
        };
        match byte {
            Some(byte) => decoded.bytes.push(byte),
            None => {
                decoded.error = Some(InputError::InvalidPair {
                    index,
                    pair: pair.iter().collect(),
                });
                break;
            }
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("32", 32)]
    #[case("0x20", 0x20)]
    #[case("0X1f", 0x1f)]
    #[case("20h", 0x20)]
    #[case("ff", 0xff)]
    #[case("  16 \n", 16)]
    #[case("０ｘ１０", 0x10)]
    fn parses_offsets(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_offset(input), Ok(expected));
    }

    #[rstest]
    #[case("", InputError::Empty)]
    #[case(" \n", InputError::Empty)]
    #[case("zz", InputError::InvalidOffset("zz".to_string()))]
    #[case("-1", InputError::InvalidOffset("-1".to_string()))]
    #[case("0x", InputError::InvalidOffset("0x".to_string()))]
    #[case("+5", InputError::InvalidOffset("+5".to_string()))]
    #[case("0x+5", InputError::InvalidOffset("0x+5".to_string()))]
    #[case("+20h", InputError::InvalidOffset("+20h".to_string()))]
    #[case("1 2", InputError::InvalidOffset("1 2".to_string()))]
    fn rejects_bad_offsets(#[case] input: &str, #[case] expected: InputError) {
        assert_eq!(parse_offset(input), Err(expected));
    }

    #[rstest]
    #[case("68 69", &[0x68, 0x69])]
    #[case("6869\n", &[0x68, 0x69])]
    #[case("DE AD be ef", &[0xde, 0xad, 0xbe, 0xef])]
    #[case("d e a d", &[0xde, 0xad])]
    #[case("６８", &[0x68])]
    #[case("", &[])]
    fn decodes_hex_pairs(#[case] input: &str, #[case] expected: &[u8]) {
        let decoded = decode_hex(input);
        assert_eq!(decoded.bytes, expected);
        assert_eq!(decoded.error, None);
    }

    #[test]
    fn stops_at_first_invalid_pair() {
        let decoded = decode_hex("68 zz 69");
        assert_eq!(decoded.bytes, [0x68]);
        assert_eq!(
            decoded.error,
            Some(InputError::InvalidPair {
                index: 1,
                pair: "zz".to_string()
            })
        );
        assert_eq!(
            decoded.error.unwrap().to_string(),
            "\"zz\" is not a valid byte (pair 2)"
        );
    }

    #[test]
    fn lone_trailing_digit_is_invalid() {
        let decoded = decode_hex("686");
        assert_eq!(decoded.bytes, [0x68]);
        assert_eq!(
            decoded.error,
            Some(InputError::InvalidPair {
                index: 1,
                pair: "6".to_string()
            })
        );
    }

    #[test]
    fn sign_is_not_a_digit() {
        let decoded = decode_hex("+1");
        assert!(decoded.bytes.is_empty());
        assert!(decoded.error.is_some());
    }
}
