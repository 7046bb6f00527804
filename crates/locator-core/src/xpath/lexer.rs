use crate::errors::XPathError;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Slash,
    DoubleSlash,
    LBracket,
    RBracket,
    LParen,
    RParen,
    At,
    Comma,
    Pipe,
    Dot,
    DotDot,
    Star,
    ColonColon,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Literal(String),
    Number(f64),
    Name(String),
}

/// A token with the byte offset it starts at.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Spanned>, XPathError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos];
        let token = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
                continue;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos += 2;
                Token::DoubleSlash
            }
            b'/' => {
                pos += 1;
                Token::Slash
            }
            b'[' => {
                pos += 1;
                Token::LBracket
            }
            b']' => {
                pos += 1;
                Token::RBracket
            }
            b'(' => {
                pos += 1;
                Token::LParen
            }
            b')' => {
                pos += 1;
                Token::RParen
            }
            b'@' => {
                pos += 1;
                Token::At
            }
            b',' => {
                pos += 1;
                Token::Comma
            }
            b'|' => {
                pos += 1;
                Token::Pipe
            }
            b'*' => {
                pos += 1;
                Token::Star
            }
            b'=' => {
                pos += 1;
                Token::Eq
            }
            b'!' if bytes.get(pos + 1) == Some(&b'=') => {
                pos += 2;
                Token::NotEq
            }
            b'<' if bytes.get(pos + 1) == Some(&b'=') => {
                pos += 2;
                Token::Le
            }
            b'<' => {
                pos += 1;
                Token::Lt
            }
            b'>' if bytes.get(pos + 1) == Some(&b'=') => {
                pos += 2;
                Token::Ge
            }
            b'>' => {
                pos += 1;
                Token::Gt
            }
            b':' if bytes.get(pos + 1) == Some(&b':') => {
                pos += 2;
                Token::ColonColon
            }
            b'.' if bytes.get(pos + 1) == Some(&b'.') => {
                pos += 2;
                Token::DotDot
            }
            b'.' if bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
                let (number, end) = read_number(input, pos)?;
                pos = end;
                Token::Number(number)
            }
            b'.' => {
                pos += 1;
                Token::Dot
            }
            b'\'' | b'"' => {
                let Some(len) = input[pos + 1..].find(c as char) else {
                    return Err(XPathError::syntax(start, "unterminated string literal"));
                };
                let value = input[pos + 1..pos + 1 + len].to_string();
                pos += len + 2;
                Token::Literal(value)
            }
            b'0'..=b'9' => {
                let (number, end) = read_number(input, pos)?;
                pos = end;
                Token::Number(number)
            }
            _ => {
                let ch = input[pos..].chars().next().unwrap_or('?');
                if !(ch.is_alphabetic() || ch == '_') {
                    return Err(XPathError::syntax(start, format!("unexpected character '{ch}'")));
                }
                let end = name_end(input, pos);
                let name = input[pos..end].to_string();
                pos = end;
                Token::Name(name)
            }
        };
        tokens.push(Spanned {
            token,
            position: start,
        });
    }

    Ok(tokens)
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.')
}

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

/// End of the name starting at `start`. A single `prefix:local` colon stays
/// inside the name; `::` never does.
fn name_end(input: &str, start: usize) -> usize {
    let mut seen_colon = false;
    let mut chars = input[start..].char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if is_name_char(ch) {
            continue;
        }
        let prefixed = ch == ':'
            && !seen_colon
            && chars.peek().is_some_and(|(_, next)| is_name_start(*next));
        if !prefixed {
            return start + offset;
        }
        seen_colon = true;
    }
    input.len()
}

fn read_number(input: &str, start: usize) -> Result<(f64, usize), XPathError> {
    let bytes = input.as_bytes();
    let mut end = start;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot && bytes.get(end + 1) != Some(&b'.') => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    input[start..end]
        .parse::<f64>()
        .map(|value| (value, end))
        .map_err(|_| XPathError::syntax(start, "invalid number"))
}
