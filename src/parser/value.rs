use super::*;

/// First item of a statement, value or list.
pub(super) fn parse_item(parser: &mut Parser) -> Result<Item, FoamError> {
    parse_next_item(parser, None)
}

/// Item following `previous` in the same run. Only a leading integer, one after a
/// `List<T>` type or one after a complete list may count the list on the next line.
pub(super) fn parse_next_item(parser: &mut Parser, previous: Option<&Item>) -> Result<Item, FoamError> {
    match parser.peek() {
        Some(Token::Word(_)) | Some(Token::Quoted(_)) | Some(Token::Directive(_)) => {
            Ok(Item::Leaf(parser.bump()?))
        }
        Some(Token::Macro(m)) => {
            if m.starts_with("${") {
                parser.require_advanced("A braced macro")?;
            }
            Ok(Item::Leaf(parser.bump()?))
        }
        Some(Token::Expr { .. }) => {
            parser.require_advanced("An inline #eval expression")?;
            Ok(Item::Leaf(parser.bump()?))
        }
        Some(Token::Number(_)) => {
            let may_count_next_line = match previous {
                None => true,
                Some(Item::Leaf(s)) => matches!(&s.token, Token::Word(w) if w.starts_with("List<") || w == "nonuniform"),
                Some(Item::List { .. } | Item::Dict(_)) => true,
                Some(_) => false,
            };
            parse_number(parser, may_count_next_line)
        }
        Some(Token::LParen) => parse_list(parser, None),
        Some(Token::LBracket) => parse_dimensions(parser),
        Some(Token::LBrace) => {
            parser.require_advanced("An anonymous dictionary")?;
            let body = document::parse_braced_body(parser)?;
            Ok(Item::Dict(DictBlock { head: Vec::new(), body }))
        }
        other => {
            let found = format!("{:?}", other.cloned().unwrap_or(Token::Eof));
            Err(parser
                .error(format!("Unexpected token {} in value position", found), 210)
                .with_hint("Expected a word, number, string, list or dimension set"))
        }
    }
}

fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// A number, or the element count of the list that follows it.
///
/// The count is either glued to the parenthesis (`4(1 5 4 0)`) or, when
/// `may_count_next_line` holds, ends its line with the parenthesis opening the
/// next one (`14\n(`). `spline 1 2\n(` keeps `2` as a vertex index.
fn parse_number(parser: &mut Parser, may_count_next_line: bool) -> Result<Item, FoamError> {
    let number = parser.bump()?;
    let raw = match &number.token {
        Token::Number(raw) => raw.clone(),
        _ => return Ok(Item::Leaf(number)),
    };
    if !is_integer_literal(&raw) || raw.starts_with(['+', '-']) {
        return Ok(Item::Leaf(number));
    }

    let glued = matches!(parser.peek_spanned(), Some(s) if s.token == Token::LParen && s.start == number.end);
    if !glued {
        if !may_count_next_line || parser.peek() != Some(&Token::Newline) {
            return Ok(Item::Leaf(number));
        }
        parser.skip_newlines()?;
        if parser.peek() != Some(&Token::LParen) {
            return Ok(Item::Leaf(number));
        }
    }

    let (line, column) = (number.line, number.column);
    let list = parse_list(parser, Some(number))?;
    if let Item::List { count: Some(count), items } = &list {
        let declared: usize = count.text().parse().unwrap_or(usize::MAX);
        if declared != items.len() {
            return Err(FoamError::grammar(
                format!("List declares {} elements but holds {}", count.text(), items.len()),
                line,
                column,
                207,
            ));
        }
    }
    Ok(list)
}

pub(super) fn parse_list(parser: &mut Parser, count: Option<Spanned>) -> Result<Item, FoamError> {
    parser.expect(Token::LParen)?;
    let mut items = Vec::new();

    loop {
        parser.skip_newlines()?;
        match parser.peek() {
            Some(Token::RParen) => {
                parser.bump()?;
                break;
            }
            Some(Token::Eof) => {
                return Err(parser
                    .error("Unexpected end of input inside a list", 211)
                    .with_hint("Missing ')'"));
            }
            Some(Token::Comma) | Some(Token::Equals) | Some(Token::Semicolon) | Some(Token::RBrace) => {
                let found = format!("{:?}", parser.peek().cloned().unwrap_or(Token::Eof));
                return Err(parser.error(format!("Unexpected {} inside a list", found), 212));
            }
            _ => {
                let item = parse_next_item(parser, items.last())?;
                items.push(attach_dict_body(parser, item)?);
            }
        }
    }

    Ok(Item::List { count, items })
}

/// `inlet { ... }` and `(air water) { ... }` inside a list.
fn attach_dict_body(parser: &mut Parser, item: Item) -> Result<Item, FoamError> {
    let can_name = match &item {
        Item::Leaf(s) => matches!(s.token, Token::Word(_) | Token::Quoted(_)),
        Item::List { .. } => true,
        _ => false,
    };
    if !can_name {
        return Ok(item);
    }

    parser.skip_newlines()?;
    if parser.peek() != Some(&Token::LBrace) {
        return Ok(item);
    }
    if matches!(item, Item::List { .. }) {
        parser.require_advanced("A dictionary named by a list")?;
    }
    let body = document::parse_braced_body(parser)?;
    Ok(Item::Dict(DictBlock { head: vec![item], body }))
}

fn parse_dimensions(parser: &mut Parser) -> Result<Item, FoamError> {
    let open = parser.expect(Token::LBracket)?;
    let mut exponents = Vec::new();

    loop {
        parser.skip_newlines()?;
        match parser.peek() {
            Some(Token::RBracket) => {
                parser.bump()?;
                break;
            }
            Some(Token::Number(raw)) if is_integer_literal(raw) => exponents.push(parser.bump()?),
            _ => {
                return Err(parser
                    .error("Dimension sets hold integer exponents only", 213)
                    .with_hint("Write dimensions as [kg m s K kmol A cd], e.g. [0 2 -1 0 0 0 0]"));
            }
        }
    }

    if exponents.len() != 7 {
        return Err(FoamError::grammar(
            format!("Dimension set has {} exponents, expected 7", exponents.len()),
            open.line,
            open.column,
            213,
        ));
    }
    Ok(Item::Dimensions(exponents))
}

/// Items of a standalone value, up to the end of input. A trailing `;` is allowed.
pub(super) fn parse_fragment(parser: &mut Parser) -> Result<Vec<Item>, FoamError> {
    let mut items = Vec::new();
    loop {
        parser.skip_newlines()?;
        match parser.peek() {
            Some(Token::Eof) => break,
            Some(Token::Semicolon) => {
                parser.bump()?;
                parser.skip_newlines()?;
                if parser.peek() != Some(&Token::Eof) {
                    return Err(parser.error("Unexpected input after ';'", 214));
                }
                break;
            }
            _ => {
                let item = parse_next_item(parser, items.last())?;
                items.push(attach_dict_body(parser, item)?);
            }
        }
    }
    Ok(items)
}
