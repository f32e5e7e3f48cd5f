use super::*;
use super::scanner::{bump, consume_braced, peek_second, peek_third, skip_block_comment, skip_trivia};

pub(super) fn take_banner(lexer: &mut Lexer) -> Result<Option<String>, FoamError> {
    let mut ahead = lexer.input.clone();
    let mut current = lexer.peek;
    let mut skipped = 0;
    while matches!(current, Some(c) if c.is_whitespace()) {
        current = ahead.next();
        skipped += 1;
    }
    if current != Some('/') || ahead.next() != Some('*') {
        return Ok(None);
    }

    for _ in 0..skipped {
        bump(lexer);
    }
    let start = lexer.offset;
    let end = skip_block_comment(lexer)?;
    Ok(Some(lexer.src[start..end].to_string()))
}

pub(super) fn next_token(lexer: &mut Lexer) -> Result<Spanned, FoamError> {
    skip_trivia(lexer)?;

    let start = lexer.offset;
    let line = lexer.line;
    let column = lexer.column + 1;

    let token = match lexer.peek {
        Some('\n') => tokenize_symbol(lexer, Token::Newline),
        Some('{') => tokenize_symbol(lexer, Token::LBrace),
        Some('}') => tokenize_symbol(lexer, Token::RBrace),
        Some('(') => tokenize_symbol(lexer, Token::LParen),
        Some(')') => tokenize_symbol(lexer, Token::RParen),
        Some('[') => tokenize_symbol(lexer, Token::LBracket),
        Some(']') => tokenize_symbol(lexer, Token::RBracket),
        Some(';') => tokenize_symbol(lexer, Token::Semicolon),
        Some(',') => tokenize_symbol(lexer, Token::Comma),
        Some('=') => tokenize_symbol(lexer, Token::Equals),
        Some('"') => tokenize_quoted(lexer)?,
        Some('$') => tokenize_macro(lexer)?,
        Some('#') => tokenize_hash(lexer)?,
        Some(c) if starts_number(c, lexer) => tokenize_number(lexer),
        Some(c) if c.is_alphabetic() || c == '_' => tokenize_word(lexer),
        Some(ch) => {
            return Err(FoamError::grammar(format!("Unexpected character '{}'", ch), line, column, 101)
                .with_hint("This character cannot start a token"));
        }
        None => Token::Eof,
    };

    Ok(Spanned {
        token,
        line,
        column,
        start,
        end: lexer.offset,
    })
}

fn tokenize_symbol(lexer: &mut Lexer, token: Token) -> Token {
    bump(lexer);
    token
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | ':' | '-' | '+' | '<' | '>')
}

fn starts_number(ch: char, lexer: &Lexer) -> bool {
    let digit_or_point = |c: Option<char>, after: Option<char>| match c {
        Some(d) if d.is_ascii_digit() => true,
        Some('.') => matches!(after, Some(d) if d.is_ascii_digit()),
        _ => false,
    };
    match ch {
        '0'..='9' => true,
        '.' => matches!(peek_second(lexer), Some(d) if d.is_ascii_digit()),
        '+' | '-' => digit_or_point(peek_second(lexer), peek_third(lexer)),
        _ => false,
    }
}

fn take_digits(lexer: &mut Lexer, text: &mut String) {
    while let Some(ch) = lexer.peek {
        if !ch.is_ascii_digit() {
            break;
        }
        text.push(ch);
        bump(lexer);
    }
}

fn tokenize_number(lexer: &mut Lexer) -> Token {
    let mut text = String::new();
    if let Some(sign @ ('+' | '-')) = lexer.peek {
        text.push(sign);
        bump(lexer);
    }
    take_digits(lexer, &mut text);
    if lexer.peek == Some('.') {
        text.push('.');
        bump(lexer);
        take_digits(lexer, &mut text);
    }

    if let Some(e @ ('e' | 'E')) = lexer.peek {
        let second = peek_second(lexer);
        let has_exponent = match second {
            Some(d) if d.is_ascii_digit() => true,
            Some('+' | '-') => matches!(peek_third(lexer), Some(d) if d.is_ascii_digit()),
            _ => false,
        };
        if has_exponent {
            text.push(e);
            bump(lexer);
            if let Some(sign @ ('+' | '-')) = lexer.peek {
                text.push(sign);
                bump(lexer);
            }
            take_digits(lexer, &mut text);
        }
    }

    // `3D`, `2nd` and friends are words, not numbers
    match lexer.peek {
        Some(ch) if ch.is_alphabetic() || ch == '_' => {
            take_word_tail(lexer, &mut text);
            Token::Word(text)
        }
        _ => Token::Number(text),
    }
}

fn tokenize_word(lexer: &mut Lexer) -> Token {
    let mut text = String::new();
    take_word_tail(lexer, &mut text);
    Token::Word(text)
}

/// Word characters, plus any directly attached call-like group such as `div(phi,U)`.
fn take_word_tail(lexer: &mut Lexer, text: &mut String) {
    loop {
        match lexer.peek {
            Some(ch) if is_word_char(ch) => {
                text.push(ch);
                bump(lexer);
            }
            Some('(') if !text.is_empty() => {
                let Some(len) = attached_group_len(lexer) else {
                    return;
                };
                for _ in 0..len {
                    if let Some(ch) = bump(lexer) {
                        text.push(ch);
                    }
                }
            }
            _ => return,
        }
    }
}

/// Length in chars of a balanced one-line `( ... )` group under the cursor.
fn attached_group_len(lexer: &Lexer) -> Option<usize> {
    let mut depth = 0usize;
    let mut len = 0usize;
    let mut chars = std::iter::once(lexer.peek?).chain(lexer.input.clone());
    loop {
        let ch = chars.next()?;
        len += 1;
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(len);
                }
            }
            '\n' | ';' | '{' | '}' => return None,
            _ => {}
        }
    }
}

fn tokenize_quoted(lexer: &mut Lexer) -> Result<Token, FoamError> {
    let (line, column) = (lexer.line, lexer.column + 1);
    bump(lexer);

    let mut content = String::new();
    loop {
        match bump(lexer) {
            Some('"') => return Ok(Token::Quoted(content)),
            Some('\\') => {
                content.push('\\');
                if let Some(next) = bump(lexer) {
                    content.push(next);
                }
            }
            Some(ch) => content.push(ch),
            None => {
                return Err(FoamError::grammar("Unterminated string", line, column, 103)
                    .with_hint("Close the string with a double quote"));
            }
        }
    }
}

fn tokenize_macro(lexer: &mut Lexer) -> Result<Token, FoamError> {
    let start = lexer.offset;
    bump(lexer);

    if lexer.peek == Some('{') {
        consume_braced(lexer)?;
    } else {
        while let Some(ch) = lexer.peek {
            if !(is_word_char(ch) || ch == '/' || ch == '!') {
                break;
            }
            bump(lexer);
        }
    }

    Ok(Token::Macro(lexer.src[start..lexer.offset].to_string()))
}

fn tokenize_hash(lexer: &mut Lexer) -> Result<Token, FoamError> {
    let (line, column) = (lexer.line, lexer.column + 1);

    if peek_second(lexer) == Some('{') {
        bump(lexer);
        bump(lexer);
        let start = lexer.offset;
        loop {
            match bump(lexer) {
                Some('#') if lexer.peek == Some('}') => {
                    let code = lexer.src[start..lexer.offset - 1].to_string();
                    bump(lexer);
                    return Ok(Token::Code(code));
                }
                Some(_) => {}
                None => {
                    return Err(FoamError::grammar("Unterminated code block", line, column, 104)
                        .with_hint("Close the code block with #}"));
                }
            }
        }
    }

    let mut directive = String::from("#");
    bump(lexer);
    while let Some(ch) = lexer.peek {
        if !(ch.is_alphanumeric() || ch == '_') {
            break;
        }
        directive.push(ch);
        bump(lexer);
    }
    if directive.len() == 1 {
        return Err(FoamError::grammar("Expected a directive name after '#'", line, column, 102));
    }

    if directive == "#eval" || directive == "#calc" {
        while matches!(lexer.peek, Some(' ' | '\t')) {
            bump(lexer);
        }
        if lexer.peek == Some('{') {
            let start = lexer.offset;
            consume_braced(lexer)?;
            let body = lexer.src[start..lexer.offset].to_string();
            return Ok(Token::Expr { directive, body });
        }
    }

    Ok(Token::Directive(directive))
}
