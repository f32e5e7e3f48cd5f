use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum End {
    Eof,
    Brace,
    Conditional,
}

pub(super) fn parse_file(parser: &mut Parser) -> Result<CstFile, FoamError> {
    let banner = parser.banner.take();
    let statements = parse_statements(parser, End::Eof)?;
    Ok(CstFile { banner, statements })
}

pub(super) fn parse_statements(parser: &mut Parser, end: End) -> Result<Vec<Statement>, FoamError> {
    let mut statements = Vec::new();

    while let Some(tok) = parser.peek() {
        match tok {
            Token::Newline | Token::Semicolon => {
                parser.bump()?;
            }
            Token::Eof => {
                if end == End::Eof {
                    break;
                }
                let missing = if end == End::Brace { "'}'" } else { "#endif" };
                return Err(parser
                    .error("Unexpected end of input", 201)
                    .with_hint(format!("Missing {}", missing)));
            }
            Token::RBrace => {
                if end == End::Brace {
                    break;
                }
                return Err(parser.error("Unmatched '}'", 203));
            }
            Token::Directive(d) if d == "#else" || d == "#endif" => {
                if end == End::Conditional {
                    break;
                }
                return Err(parser.error(format!("{} without a matching #if", d), 204));
            }
            _ => statements.push(parse_statement(parser)?),
        }
    }

    Ok(statements)
}

fn parse_statement(parser: &mut Parser) -> Result<Statement, FoamError> {
    match parser.peek() {
        Some(Token::Directive(_)) => directive::parse_directive(parser),
        Some(Token::Macro(_)) => parse_macro_statement(parser),
        Some(Token::LParen) => {
            let list = value::parse_item(parser)?;
            parser.skip_newlines()?;
            if parser.peek() == Some(&Token::LBrace) {
                parser.require_advanced("A dictionary named by a list")?;
                let body = parse_braced_body(parser)?;
                return Ok(Statement::Dict(DictBlock { head: vec![list], body }));
            }
            Ok(Statement::IsolatedList(list))
        }
        Some(Token::Number(_)) => match value::parse_item(parser)? {
            Item::Leaf(key) => parse_keyed(parser, key),
            list => Ok(Statement::IsolatedList(list)),
        },
        Some(Token::Word(_)) | Some(Token::Quoted(_)) => {
            let key = parser.bump()?;
            parse_keyed(parser, key)
        }
        other => {
            let found = format!("{:?}", other.cloned().unwrap_or(Token::Eof));
            Err(parser
                .error(format!("Unexpected token {} at start of entry", found), 205)
                .with_hint("Entries start with a keyword, a quoted pattern or a directive"))
        }
    }
}

fn parse_macro_statement(parser: &mut Parser) -> Result<Statement, FoamError> {
    if let Some(Token::Macro(m)) = parser.peek() {
        if m.starts_with("${") {
            parser.require_advanced("A braced macro")?;
        }
    }
    let token = parser.bump()?;
    match parser.peek() {
        Some(Token::Semicolon) => {
            parser.bump()?;
            Ok(Statement::Macro(token))
        }
        Some(Token::Newline) | Some(Token::RBrace) | Some(Token::Eof) => Ok(Statement::Macro(token)),
        _ => parse_keyed(parser, token),
    }
}

/// Everything after a key: values up to `;`, a dict body, or a code block.
fn parse_keyed(parser: &mut Parser, key: Spanned) -> Result<Statement, FoamError> {
    let mut items = Vec::new();

    loop {
        parser.skip_newlines()?;
        match parser.peek() {
            Some(Token::Semicolon) => {
                parser.bump()?;
                return Ok(Statement::Assign { key, items });
            }
            Some(Token::LBrace) => {
                check_dict_head(parser, &items)?;
                let body = parse_braced_body(parser)?;
                let mut head = vec![Item::Leaf(key)];
                head.extend(items);
                return Ok(Statement::Dict(DictBlock { head, body }));
            }
            Some(Token::Code(_)) => {
                let directive = match items.pop() {
                    None => None,
                    Some(Item::Leaf(d)) if items.is_empty() && matches!(d.token, Token::Directive(_)) => {
                        parser.require_advanced("A code block qualified by a directive")?;
                        Some(d)
                    }
                    Some(_) => {
                        return Err(parser.error(format!("Unexpected values before code block of '{}'", key.text()), 206));
                    }
                };
                let code = parser.bump()?;
                return Ok(Statement::Code { key, directive, code });
            }
            Some(Token::RBrace) | Some(Token::Eof) => {
                return Err(parser
                    .error(format!("Missing ';' after entry '{}'", key.text()), 206)
                    .with_hint("Terminate every entry with ';'"));
            }
            _ => {
                let item = value::parse_next_item(parser, items.last())?;
                items.push(item);
            }
        }
    }
}

fn check_dict_head(parser: &Parser, qualifiers: &[Item]) -> Result<(), FoamError> {
    if qualifiers.iter().any(|item| !matches!(item, Item::Leaf(_))) {
        parser.require_advanced("A structured dictionary qualifier")?;
    }
    if qualifiers.len() > 1 {
        parser.require_advanced("More than one dictionary qualifier")?;
    }
    Ok(())
}

pub(super) fn parse_braced_body(parser: &mut Parser) -> Result<Vec<Statement>, FoamError> {
    parser.expect(Token::LBrace)?;
    let body = parse_statements(parser, End::Brace)?;
    parser.expect(Token::RBrace)?;
    Ok(body)
}
