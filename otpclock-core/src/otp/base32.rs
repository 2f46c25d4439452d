//! RFC 4648 Base32 encoding of OTP secrets
//!
//! Authenticator apps show secrets as Base32 text. Decoding is forgiving in
//! the same ways those apps are:
//! 1. Whitespace is ignored (`JBSW Y3DP EHPK 3PXP`)
//! 2. Case is ignored
//! 3. Trailing `=` padding is optional
//! 4. Unpadded input is accepted; missing trailing bits are zero and a
//!    trailing partial byte is dropped
//!
//! `Base32Mode::Strict` additionally requires complete 8-symbol groups.

use crate::error::OtpError;
use data_encoding::{Encoding, Specification, BASE32, BASE32_NOPAD};

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

lazy_static::lazy_static! {
    /// Unpadded RFC 4648 alphabet that tolerates non-zero trailing bits
    static ref LENIENT: Encoding = {
        let mut specification = Specification::new();
        specification.symbols.push_str(ALPHABET);
        specification.check_trailing_bits = false;
        specification.encoding().expect("static Base32 specification is valid")
    };
}

/// How strictly `decode_with` treats group completeness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Base32Mode {
    /// Accept unpadded and partial trailing groups
    #[default]
    Lenient,
    /// Require complete, padded 8-symbol groups
    Strict,
}

/// Encode bytes as unpadded uppercase Base32
pub fn encode(bytes: &[u8]) -> String {
    BASE32_NOPAD.encode(bytes)
}

/// Decode Base32 text to bytes using lenient mode
pub fn decode(text: &str) -> Result<Vec<u8>, OtpError> {
    decode_with(text, Base32Mode::Lenient)
}

/// Decode Base32 text to bytes
///
/// # Errors
///
/// - `OtpError::InvalidCharacter` for a symbol outside `A-Z2-7` (ignoring
///   case, whitespace and trailing padding); the position is the character
///   index in `text`
/// - `OtpError::IncompleteGroup` in strict mode when the symbols do not form
///   complete, correctly padded 8-symbol groups
/// - `OtpError::EmptySecret` when no symbols remain after cleaning
pub fn decode_with(text: &str, mode: Base32Mode) -> Result<Vec<u8>, OtpError> {
    let symbols = clean(text)?;

    match mode {
        Base32Mode::Lenient => decode_lenient(&symbols),
        Base32Mode::Strict => decode_strict(&symbols),
    }
}

/// A symbol kept after cleaning, with its character index in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Symbol {
    position: usize,
    value: char,
}

/// Remove whitespace, uppercase, and validate the alphabet
///
/// Padding is kept in the output so strict mode can check it; any `=` that
/// is followed by a data symbol is rejected here.
fn clean(text: &str) -> Result<Vec<Symbol>, OtpError> {
    let mut symbols = Vec::with_capacity(text.len());
    let mut padding_started = false;

    for (position, character) in text.chars().enumerate() {
        if character.is_whitespace() {
            continue;
        }

        let value = character.to_ascii_uppercase();
        if value == '=' {
            padding_started = true;
        } else if padding_started || !ALPHABET.contains(value) {
            return Err(OtpError::InvalidCharacter {
                character,
                position,
            });
        }

        symbols.push(Symbol { position, value });
    }

    if symbols.iter().all(|s| s.value == '=') {
        return Err(OtpError::EmptySecret);
    }

    Ok(symbols)
}

fn decode_lenient(symbols: &[Symbol]) -> Result<Vec<u8>, OtpError> {
    let mut data: String = symbols
        .iter()
        .map(|s| s.value)
        .filter(|&c| c != '=')
        .collect();

    // 1, 3 and 6 trailing symbols cannot end on a byte boundary; the last
    // symbol only carries bits of a byte that is never completed.
    if matches!(data.len() % 8, 1 | 3 | 6) {
        data.pop();
    }

    let bytes = LENIENT.decode(data.as_bytes()).map_err(|e| {
        let symbol = symbols[e.position.min(symbols.len() - 1)];
        OtpError::InvalidCharacter {
            character: symbol.value,
            position: symbol.position,
        }
    })?;

    if bytes.is_empty() {
        return Err(OtpError::EmptySecret);
    }

    Ok(bytes)
}

fn decode_strict(symbols: &[Symbol]) -> Result<Vec<u8>, OtpError> {
    let data: String = symbols.iter().map(|s| s.value).collect();

    BASE32.decode(data.as_bytes()).map_err(|e| match e.kind {
        data_encoding::DecodeKind::Trailing | data_encoding::DecodeKind::Symbol => {
            let symbol = symbols[e.position.min(symbols.len() - 1)];
            OtpError::InvalidCharacter {
                character: symbol.value,
                position: symbol.position,
            }
        }
        _ => OtpError::IncompleteGroup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_spaces() {
        let symbols = clean("JBSW Y3DP").unwrap();
        let text: String = symbols.iter().map(|s| s.value).collect();
        assert_eq!(text, "JBSWY3DP");
        assert_eq!(symbols[4].position, 5);
    }

    #[test]
    fn test_clean_uppercases() {
        let symbols = clean("jbsw").unwrap();
        let text: String = symbols.iter().map(|s| s.value).collect();
        assert_eq!(text, "JBSW");
    }

    #[test]
    fn test_clean_rejects_data_after_padding() {
        assert_eq!(
            clean("AB=C").unwrap_err(),
            OtpError::InvalidCharacter {
                character: 'C',
                position: 3
            }
        );
    }

    #[test]
    fn test_encode_no_padding() {
        assert_eq!(encode(b"Hello!"), "JBSWY3DPEE");
        assert_eq!(encode(b"12345678901234567890"), "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
    }

    #[test]
    fn test_decode_valid() {
        assert_eq!(decode("JBSWY3DPEE").unwrap(), b"Hello!");
        assert_eq!(decode("JBSWY3DPEHPK3PXP").unwrap().len(), 10);
    }

    #[test]
    fn test_decode_with_spaces() {
        assert_eq!(
            decode("JBSW Y3DP EHPK 3PXP").unwrap(),
            decode("JBSWY3DPEHPK3PXP").unwrap()
        );
    }

    #[test]
    fn test_decode_case_insensitive() {
        let upper = decode("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(decode("jbswy3dpehpk3pxp").unwrap(), upper);
        assert_eq!(decode("JbSwY3DpEhPk3PxP").unwrap(), upper);
    }

    #[test]
    fn test_decode_accepts_padding() {
        assert_eq!(decode("JBSWY3DPEE======").unwrap(), b"Hello!");
    }

    #[test]
    fn test_decode_truncates_partial_trailing_symbol() {
        // "MZXW6" is "foo"; a stray sixth symbol carries no complete byte
        assert_eq!(decode("MZXW6").unwrap(), b"foo");
        assert_eq!(decode("MZXW6Y").unwrap(), b"foo");
    }

    #[test]
    fn test_decode_ignores_nonzero_trailing_bits() {
        // "MZ" carries 10 bits; the last 2 are discarded
        assert_eq!(decode("MZ").unwrap(), b"f");
        assert_eq!(decode("MZ").unwrap(), decode("MY").unwrap());
    }

    #[test]
    fn test_decode_invalid_character() {
        assert_eq!(
            decode("INVALID@CHARS!").unwrap_err(),
            OtpError::InvalidCharacter {
                character: '@',
                position: 7
            }
        );
        // '1', '8', '0' and '9' are not part of the alphabet
        assert!(matches!(
            decode("ABC1"),
            Err(OtpError::InvalidCharacter { character: '1', .. })
        ));
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("").unwrap_err(), OtpError::EmptySecret);
        assert_eq!(decode("  ").unwrap_err(), OtpError::EmptySecret);
        assert_eq!(decode("====").unwrap_err(), OtpError::EmptySecret);
        // A single symbol holds fewer than 8 bits
        assert_eq!(decode("A").unwrap_err(), OtpError::EmptySecret);
    }

    #[test]
    fn test_strict_accepts_complete_groups() {
        assert_eq!(
            decode_with("JBSWY3DPEE======", Base32Mode::Strict).unwrap(),
            b"Hello!"
        );
        assert_eq!(
            decode_with("jbsw y3dp ehpk 3pxp", Base32Mode::Strict).unwrap().len(),
            10
        );
    }

    #[test]
    fn test_strict_rejects_incomplete_group() {
        assert_eq!(
            decode_with("JBSWY3DPEE", Base32Mode::Strict).unwrap_err(),
            OtpError::IncompleteGroup
        );
        assert_eq!(
            decode_with("JBSWY3DPEE====", Base32Mode::Strict).unwrap_err(),
            OtpError::IncompleteGroup
        );
    }

    #[test]
    fn test_round_trip() {
        for len in 1..=64usize {
            let bytes: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            assert_eq!(decode(&encode(&bytes)).unwrap(), bytes, "length {}", len);
        }
    }
}
