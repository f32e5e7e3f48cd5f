#[cfg(test)]
use super::*;

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        let spanned = lexer.next_token().expect("Failed to tokenize");
        let done = spanned.token == Token::Eof;
        out.push(spanned.token);
        if done {
            return out;
        }
    }
}

fn word(s: &str) -> Token {
    Token::Word(s.into())
}

fn number(s: &str) -> Token {
    Token::Number(s.into())
}

#[test]
fn test_dictionary_entry() {
    let input = r#"
solvers
{
    p { solver PCG; tolerance 1e-06; }
}
"#;
    let expected = vec![
        Token::Newline,
        word("solvers"),
        Token::Newline,
        Token::LBrace,
        Token::Newline,
        word("p"),
        Token::LBrace,
        word("solver"),
        word("PCG"),
        Token::Semicolon,
        word("tolerance"),
        number("1e-06"),
        Token::Semicolon,
        Token::RBrace,
        Token::Newline,
        Token::RBrace,
        Token::Newline,
        Token::Eof,
    ];

    let got = tokens(input);
    println!("{:?}", got);
    assert_eq!(got, expected);
}

#[test]
fn test_comments_are_trivia() {
    let input = "a 1; // trailing\n/* block\n comment */ b 2;";
    assert_eq!(
        tokens(input),
        vec![
            word("a"),
            number("1"),
            Token::Semicolon,
            Token::Newline,
            word("b"),
            number("2"),
            Token::Semicolon,
            Token::Eof,
        ]
    );
}

#[test]
fn test_compound_words() {
    assert_eq!(
        tokens("div(phi,U) Gauss linearUpwind grad(U);"),
        vec![
            word("div(phi,U)"),
            word("Gauss"),
            word("linearUpwind"),
            word("grad(U)"),
            Token::Semicolon,
            Token::Eof,
        ]
    );
    assert_eq!(
        tokens("thermo:rho List<scalar> cylindrical(U)Mean 3D"),
        vec![
            word("thermo:rho"),
            word("List<scalar>"),
            word("cylindrical(U)Mean"),
            word("3D"),
            Token::Eof,
        ]
    );
}

#[test]
fn test_word_does_not_swallow_spaced_list() {
    assert_eq!(
        tokens("value uniform (1 0 0);"),
        vec![
            word("value"),
            word("uniform"),
            Token::LParen,
            number("1"),
            number("0"),
            number("0"),
            Token::RParen,
            Token::Semicolon,
            Token::Eof,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("-1 +2.5 .5 1e+16 -3.2E-4 4(1 2 3 4)"),
        vec![
            number("-1"),
            number("+2.5"),
            number(".5"),
            number("1e+16"),
            number("-3.2E-4"),
            number("4"),
            Token::LParen,
            number("1"),
            number("2"),
            number("3"),
            number("4"),
            Token::RParen,
            Token::Eof,
        ]
    );
}

#[test]
fn test_quoted_and_macros() {
    assert_eq!(
        tokens(r#""(U|k).*" $internalField ${var} $:sub.dict ${{ 2*$x }}"#),
        vec![
            Token::Quoted("(U|k).*".into()),
            Token::Macro("$internalField".into()),
            Token::Macro("${var}".into()),
            Token::Macro("$:sub.dict".into()),
            Token::Macro("${{ 2*$x }}".into()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_code_block_is_verbatim() {
    let input = "code\n#{\n    if (x) { y; } // \"quoted\"\n#};";
    assert_eq!(
        tokens(input),
        vec![
            word("code"),
            Token::Newline,
            Token::Code("\n    if (x) { y; } // \"quoted\"\n".into()),
            Token::Semicolon,
            Token::Eof,
        ]
    );
}

#[test]
fn test_directives_and_expressions() {
    assert_eq!(
        tokens("#include \"initialConditions\"\nx #eval{ 2 * $y };"),
        vec![
            Token::Directive("#include".into()),
            Token::Quoted("initialConditions".into()),
            Token::Newline,
            word("x"),
            Token::Expr {
                directive: "#eval".into(),
                body: "{ 2 * $y }".into(),
            },
            Token::Semicolon,
            Token::Eof,
        ]
    );
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new("a\n  bb 12;");
    let a = lexer.next_token().unwrap();
    assert_eq!((a.line, a.column, a.start, a.end), (1, 1, 0, 1));
    lexer.next_token().unwrap();
    let bb = lexer.next_token().unwrap();
    assert_eq!((bb.line, bb.column), (2, 3));
    assert_eq!(bb.text(), "bb");
    let n = lexer.next_token().unwrap();
    assert_eq!((n.line, n.column, n.start, n.end), (2, 6, 7, 9));
}

#[test]
fn test_banner() {
    let input = "\n/*---*\\\n| banner |\n\\*---*/\nFoamFile {}";
    let mut lexer = Lexer::new(input);
    let banner = lexer.take_banner().unwrap();
    assert_eq!(banner.as_deref(), Some("/*---*\\\n| banner |\n\\*---*/"));
    assert_eq!(lexer.next_token().unwrap().token, Token::Newline);
    assert_eq!(lexer.next_token().unwrap().token, word("FoamFile"));

    let mut plain = Lexer::new("a 1;");
    assert_eq!(plain.take_banner().unwrap(), None);
    assert_eq!(plain.next_token().unwrap().token, word("a"));
}

#[test]
fn test_lexer_errors() {
    let cases = [
        ("a \"open", 103),
        ("code #{ never closed", 104),
        ("/* open", 105),
        ("x ${ open", 106),
        ("a # b", 102),
        ("a @ b", 101),
    ];
    for (input, code) in cases {
        let mut lexer = Lexer::new(input);
        let err = loop {
            match lexer.next_token() {
                Ok(s) if s.token == Token::Eof => panic!("Expected an error for {:?}", input),
                Ok(_) => continue,
                Err(e) => break e,
            }
        };
        println!("{}", err);
        assert!(
            matches!(err, FoamError::Grammar { code: Some(c), .. } if c == code),
            "{:?} gave {:?}",
            input,
            err
        );
    }
}
