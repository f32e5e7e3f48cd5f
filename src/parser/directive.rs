use super::*;
use super::document::End;

pub(super) fn parse_directive(parser: &mut Parser) -> Result<Statement, FoamError> {
    let directive = parser.bump()?;
    let name = match &directive.token {
        Token::Directive(name) => name.clone(),
        other => return Err(parser.error(format!("Expected a directive, got {:?}", other), 215)),
    };

    match name.as_str() {
        "#if" | "#ifeq" | "#ifdef" | "#ifndef" => parse_conditional(parser, directive),
        "#remove" => {
            if parser.peek() == Some(&Token::Newline) {
                parser.skip_newlines()?;
                if parser.peek() != Some(&Token::LParen) {
                    return Ok(Statement::Directive { directive, content: String::new() });
                }
            }
            if parser.peek() == Some(&Token::LParen) {
                let list = value::parse_item(parser)?;
                return Ok(Statement::Remove { directive, list });
            }
            let content = rest_of_line(parser)?;
            Ok(Statement::Directive { directive, content })
        }
        "#includeFunc" => parse_include_func(parser, directive),
        _ => {
            let content = rest_of_line(parser)?;
            Ok(Statement::Directive { directive, content })
        }
    }
}

/// Raw source of the remaining tokens on the directive line.
fn rest_of_line(parser: &mut Parser) -> Result<String, FoamError> {
    let tokens = line_tokens(parser)?;
    Ok(match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => parser.slice(first, last).to_string(),
        _ => String::new(),
    })
}

fn line_tokens(parser: &mut Parser) -> Result<Vec<Spanned>, FoamError> {
    let mut tokens = Vec::new();
    while let Some(tok) = parser.peek() {
        if matches!(tok, Token::Newline | Token::Eof | Token::Semicolon | Token::RBrace) {
            break;
        }
        tokens.push(parser.bump()?);
    }
    Ok(tokens)
}

fn parse_include_func(parser: &mut Parser, directive: Spanned) -> Result<Statement, FoamError> {
    let tokens = line_tokens(parser)?;
    let name = match tokens.as_slice() {
        [single] if matches!(single.token, Token::Word(_)) => single.clone(),
        _ => {
            let content = match (tokens.first(), tokens.last()) {
                (Some(first), Some(last)) => parser.slice(first, last).to_string(),
                _ => String::new(),
            };
            return Ok(Statement::Directive { directive, content });
        }
    };

    parser.skip_newlines()?;
    if parser.peek() != Some(&Token::LParen) {
        return Ok(Statement::Directive { directive, content: name.text() });
    }

    let args = parse_call_args(parser)?;
    Ok(Statement::Call { directive, name, args })
}

/// `( a, key=value, key=(1 2 3) )`, where commas and `=` belong to the advanced grammar.
fn parse_call_args(parser: &mut Parser) -> Result<Vec<Vec<Item>>, FoamError> {
    parser.expect(Token::LParen)?;
    let mut args = Vec::new();
    let mut current = Vec::new();

    loop {
        parser.skip_newlines()?;
        match parser.peek() {
            Some(Token::RParen) => {
                parser.bump()?;
                if !current.is_empty() {
                    args.push(current);
                }
                return Ok(args);
            }
            Some(Token::Comma) => {
                parser.require_advanced("A comma-separated argument list")?;
                parser.bump()?;
                args.push(std::mem::take(&mut current));
            }
            Some(Token::Eof) => {
                return Err(parser
                    .error("Unexpected end of input inside an argument list", 211)
                    .with_hint("Missing ')'"));
            }
            Some(Token::Word(_)) => {
                let key = parser.bump()?;
                if parser.peek() == Some(&Token::Equals) {
                    parser.require_advanced("A key=value argument")?;
                    parser.bump()?;
                    parser.skip_newlines()?;
                    let value = value::parse_item(parser)?;
                    current.push(Item::KeyValue { key, value: Box::new(value) });
                } else {
                    current.push(Item::Leaf(key));
                }
            }
            _ => {
                let item = value::parse_next_item(parser, current.last())?;
                current.push(item);
            }
        }
    }
}

fn parse_conditional(parser: &mut Parser, directive: Spanned) -> Result<Statement, FoamError> {
    parser.require_advanced("A conditional block")?;
    let condition = rest_of_line(parser)?;
    let then_body = document::parse_statements(parser, End::Conditional)?;

    let else_body = match parser.peek() {
        Some(Token::Directive(d)) if d == "#else" => {
            parser.bump()?;
            line_tokens(parser)?;
            Some(document::parse_statements(parser, End::Conditional)?)
        }
        _ => None,
    };

    match parser.peek() {
        Some(Token::Directive(d)) if d == "#endif" => {
            parser.bump()?;
        }
        _ => {
            return Err(parser
                .error("Expected #endif", 216)
                .with_hint(format!("Close the {} block with #endif", directive.text())));
        }
    }

    Ok(Statement::Conditional {
        directive,
        condition,
        then_body,
        else_body,
    })
}
