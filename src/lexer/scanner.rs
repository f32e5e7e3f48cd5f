use super::*;

/// Advance the character iterator and update offset and line/column tracking
pub(super) fn bump(lexer: &mut Lexer) -> Option<char> {
    let curr = lexer.peek;
    if let Some(c) = curr {
        lexer.offset += c.len_utf8();
        if c == '\n' {
            lexer.line += 1;
            lexer.column = 0;
        } else {
            lexer.column += 1;
        }
    }
    lexer.peek = lexer.input.next();
    curr
}

/// The character after the current one
pub(super) fn peek_second(lexer: &Lexer) -> Option<char> {
    lexer.input.clone().next()
}

/// The character two positions after the current one
pub(super) fn peek_third(lexer: &Lexer) -> Option<char> {
    let mut iter = lexer.input.clone();
    iter.next();
    iter.next()
}

/// Skip blanks and comments, stopping at a newline
pub(super) fn skip_trivia(lexer: &mut Lexer) -> Result<(), FoamError> {
    while let Some(c) = lexer.peek {
        match c {
            ' ' | '\t' | '\r' | '\x0c' => {
                bump(lexer);
            }
            '/' if peek_second(lexer) == Some('/') => {
                while let Some(ch) = lexer.peek {
                    if ch == '\n' {
                        break;
                    }
                    bump(lexer);
                }
            }
            '/' if peek_second(lexer) == Some('*') => {
                skip_block_comment(lexer)?;
            }
            _ => break,
        }
    }
    Ok(())
}

/// Consume `/* ... */`, returning the byte offset just past the closer
pub(super) fn skip_block_comment(lexer: &mut Lexer) -> Result<usize, FoamError> {
    let (line, column) = (lexer.line, lexer.column + 1);
    bump(lexer);
    bump(lexer);
    loop {
        match bump(lexer) {
            Some('*') if lexer.peek == Some('/') => {
                bump(lexer);
                return Ok(lexer.offset);
            }
            Some(_) => {}
            None => {
                return Err(FoamError::grammar("Unterminated block comment", line, column, 105)
                    .with_hint("Close the comment with */"));
            }
        }
    }
}

/// Consume characters up to and including the brace that closes the one under the cursor
pub(super) fn consume_braced(lexer: &mut Lexer) -> Result<(), FoamError> {
    let (line, column) = (lexer.line, lexer.column + 1);
    let mut depth = 0usize;
    while let Some(ch) = bump(lexer) {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            _ => {}
        }
    }
    Err(FoamError::grammar("Unbalanced braces", line, column, 106)
        .with_hint("Every '{' needs a matching '}'"))
}
