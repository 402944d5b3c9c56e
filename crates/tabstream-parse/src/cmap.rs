//! ToUnicode CMap parsing.
//!
//! Only the `bfchar` and `bfrange` operators matter for text extraction;
//! everything else in the CMap program is skipped. Destination strings are
//! UTF-16BE and decoded with `encoding_rs`.

use std::collections::HashMap;

use encoding_rs::UTF_16BE;

use crate::error::BackendError;

/// Code to Unicode mapping read from a /ToUnicode stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeCMap {
    mappings: HashMap<u32, String>,
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Hex(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    Word(&'a str),
}

impl ToUnicodeCMap {
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let tokens = tokenize(&text)?;
        let mut mappings = HashMap::new();

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::Word("beginbfchar") => {
                    i += 1;
                    while let (Some(Token::Hex(src)), Some(Token::Hex(dst))) =
                        (tokens.get(i), tokens.get(i + 1))
                    {
                        mappings.insert(code_of(src), decode_utf16(dst));
                        i += 2;
                    }
                }
                Token::Word("beginbfrange") => {
                    i += 1;
                    i = parse_ranges(&tokens, i, &mut mappings)?;
                }
                _ => i += 1,
            }
        }

        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn parse_ranges(
    tokens: &[Token<'_>],
    mut i: usize,
    mappings: &mut HashMap<u32, String>,
) -> Result<usize, BackendError> {
    while let (Some(Token::Hex(lo)), Some(Token::Hex(hi))) = (tokens.get(i), tokens.get(i + 1)) {
        let (lo, hi) = (code_of(lo), code_of(hi));
        if hi < lo || hi - lo > 0xFFFF {
            return Err(BackendError::Font(format!(
                "invalid bfrange {lo:#x}..{hi:#x} in ToUnicode CMap"
            )));
        }
        i += 2;
        match tokens.get(i) {
            Some(Token::Hex(dst)) => {
                for (offset, code) in (lo..=hi).enumerate() {
                    mappings.insert(code, decode_utf16(&increment(dst, offset as u32)));
                }
                i += 1;
            }
            Some(Token::ArrayStart) => {
                i += 1;
                let mut code = lo;
                while let Some(Token::Hex(dst)) = tokens.get(i) {
                    if code <= hi {
                        mappings.insert(code, decode_utf16(dst));
                    }
                    code += 1;
                    i += 1;
                }
                if tokens.get(i) == Some(&Token::ArrayEnd) {
                    i += 1;
                }
            }
            _ => break,
        }
    }
    Ok(i)
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>, BackendError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' if bytes.get(i + 1) == Some(&b'<') => i += 2,
            b'>' if bytes.get(i + 1) == Some(&b'>') => i += 2,
            b'<' => {
                let end = text[i..]
                    .find('>')
                    .map(|e| i + e)
                    .ok_or_else(|| BackendError::Font("unterminated hex string in CMap".into()))?;
                tokens.push(Token::Hex(parse_hex(&text[i + 1..end])?));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b'%' => {
                while i < bytes.len() && bytes[i] != b'\n' && bytes[i] != b'\r' {
                    i += 1;
                }
            }
            b'(' => {
                // Literal strings (CMap names, registry) carry no mappings.
                while i < bytes.len() && bytes[i] != b')' {
                    i += 1;
                }
                i += 1;
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && !is_delimiter(bytes[i]) {
                    i += 1;
                }
                if i == start {
                    i += 1;
                } else {
                    tokens.push(Token::Word(&text[start..i]));
                }
            }
        }
    }
    Ok(tokens)
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'<' | b'>' | b'[' | b']' | b'(' | b')' | b'%')
}

fn parse_hex(hex: &str) -> Result<Vec<u8>, BackendError> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_digit(pair[0])?;
            let lo = pair.get(1).map_or(Ok(0), |&d| hex_digit(d))?;
            Ok(hi << 4 | lo)
        })
        .collect()
}

fn hex_digit(b: u8) -> Result<u8, BackendError> {
    char::from(b)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| BackendError::Font(format!("invalid hex digit '{}' in CMap", char::from(b))))
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |acc, &b| (acc << 8) | u32::from(b))
}

/// Add `offset` to the last bytes of a big-endian destination string.
fn increment(dst: &[u8], offset: u32) -> Vec<u8> {
    let mut out = dst.to_vec();
    let mut carry = offset;
    for b in out.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = u32::from(*b) + (carry & 0xFF);
        *b = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
    out
}

fn decode_utf16(bytes: &[u8]) -> String {
    let (text, _had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
    text.into_owned()
}
