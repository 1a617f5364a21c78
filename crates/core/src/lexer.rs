//! Incremental tokenizer over a [`ParseSource`].
//!
//! Characters are pulled from the source only when the lexer runs out of
//! buffered input, so an interactive source is asked for another line only
//! when the current one has been used up.

use std::collections::VecDeque;

use crate::error::ParseError;
use crate::source::ParseSource;

/// Skipped like whitespace; editors often write one at the start of a file.
const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare identifier; `true` / `false` are resolved by the parser
    Word(String),
    /// Quoted string literal (content without quotes, no escapes)
    Str(String),
    Number(f64),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Eq,
    Colon,
}

impl Token {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{}'", w),
            Token::Str(s) => format!("string \"{}\"", s),
            Token::Number(n) => format!("number {}", n),
            Token::LBrace => "'{'".to_owned(),
            Token::RBrace => "'}'".to_owned(),
            Token::LBracket => "'['".to_owned(),
            Token::RBracket => "']'".to_owned(),
            Token::LParen => "'('".to_owned(),
            Token::RParen => "')'".to_owned(),
            Token::Comma => "','".to_owned(),
            Token::Eq => "'='".to_owned(),
            Token::Colon => "':'".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    /// A line break separates this token from the previous one
    pub after_newline: bool,
}

pub struct Lexer<S> {
    source: S,
    name: String,
    buf: Vec<char>,
    pos: usize,
    line: u32,
    exhausted: bool,
    lookahead: VecDeque<Spanned>,
}

impl<S: ParseSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Lexer {
            name: source.name().to_owned(),
            source,
            buf: Vec::new(),
            pos: 0,
            line: 1,
            exhausted: false,
            lookahead: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line of the next unread character.
    pub fn line(&self) -> u32 {
        self.line
    }

    // -- Character level ----------------------------------------

    fn refill(&mut self) {
        self.buf.drain(..self.pos);
        self.pos = 0;
        match self.source.more() {
            Some(chunk) if !chunk.is_empty() => self.buf.extend(chunk.chars()),
            _ => self.exhausted = true,
        }
    }

    fn char_at(&mut self, offset: usize) -> Option<char> {
        while self.pos + offset >= self.buf.len() {
            if self.exhausted {
                return None;
            }
            self.refill();
        }
        Some(self.buf[self.pos + offset])
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.char_at(0)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Skip whitespace and comments. With `stop_at_newline`, stops in front
    /// of a line break (or a block comment) and reports whether the current
    /// line has ended.
    fn skip_trivia(&mut self, stop_at_newline: bool) -> Result<bool, ParseError> {
        loop {
            let Some(c) = self.char_at(0) else {
                return Ok(true);
            };
            if c == '\n' && stop_at_newline {
                return Ok(true);
            }
            if c.is_whitespace() || c == BYTE_ORDER_MARK {
                self.bump();
                continue;
            }
            if c == '/' && self.char_at(1) == Some('/') {
                while let Some(c) = self.char_at(0) {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            if c == '/' && self.char_at(1) == Some('*') {
                if stop_at_newline {
                    return Ok(false);
                }
                let start = self.line;
                self.bump();
                self.bump();
                loop {
                    match self.bump() {
                        None => {
                            return Err(ParseError::UnterminatedComment {
                                file: self.name.clone(),
                                line: start,
                            })
                        }
                        Some('*') if self.char_at(0) == Some('/') => {
                            self.bump();
                            break;
                        }
                        Some(_) => {}
                    }
                }
                continue;
            }
            return Ok(false);
        }
    }

    // -- Token level --------------------------------------------

    fn lex_token(&mut self) -> Result<Option<Spanned>, ParseError> {
        let line_before = self.line;
        self.skip_trivia(false)?;
        let Some(c) = self.char_at(0) else {
            return Ok(None);
        };
        let line = self.line;
        let after_newline = line != line_before;
        let spanned = |token: Token| -> Result<Option<Spanned>, ParseError> {
            Ok(Some(Spanned {
                token,
                line,
                after_newline,
            }))
        };

        let punct = match c {
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            '=' => Some(Token::Eq),
            ':' => Some(Token::Colon),
            _ => None,
        };
        if let Some(token) = punct {
            self.bump();
            return spanned(token);
        }

        if c == '"' || c == '\'' {
            self.bump();
            let mut text = String::new();
            loop {
                match self.bump() {
                    None => {
                        return Err(ParseError::UnterminatedString {
                            file: self.name.clone(),
                            line,
                        })
                    }
                    Some(q) if q == c => break,
                    Some(other) => text.push(other),
                }
            }
            return spanned(Token::Str(text));
        }

        if self.starts_number(c) {
            let text = self.take_number();
            return match text.parse::<f64>() {
                Ok(n) => spanned(Token::Number(n)),
                Err(_) => Err(ParseError::InvalidNumber {
                    file: self.name.clone(),
                    text,
                    line,
                }),
            };
        }

        if c.is_alphabetic() || c == '_' {
            let mut word = String::new();
            while let Some(c) = self.char_at(0) {
                if c.is_alphanumeric() || matches!(c, '_' | '.' | '-') {
                    word.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            return spanned(Token::Word(word));
        }

        Err(ParseError::UnexpectedCharacter {
            file: self.name.clone(),
            ch: c,
            line,
        })
    }

    fn starts_number(&mut self, c: char) -> bool {
        if c.is_ascii_digit() {
            return true;
        }
        let next = self.char_at(1);
        match c {
            '-' | '+' => match next {
                Some(d) if d.is_ascii_digit() => true,
                Some('.') => self.char_at(2).is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            },
            '.' => next.is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        }
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(c) = self.char_at(0) {
            if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.bump();
        }
    }

    fn take_number(&mut self) -> String {
        let mut text = String::new();
        if let Some(sign @ ('-' | '+')) = self.char_at(0) {
            text.push(sign);
            self.bump();
        }
        self.take_digits(&mut text);
        if self.char_at(0) == Some('.') && self.char_at(1).is_some_and(|d| d.is_ascii_digit()) {
            text.push('.');
            self.bump();
            self.take_digits(&mut text);
        }
        if matches!(self.char_at(0), Some('e' | 'E')) {
            let exp_digit = match self.char_at(1) {
                Some(d) if d.is_ascii_digit() => true,
                Some('-' | '+') => self.char_at(2).is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            };
            if exp_digit {
                for _ in 0..2 {
                    if let Some(c) = self.char_at(0) {
                        if c.is_ascii_digit() {
                            break;
                        }
                        text.push(c);
                        self.bump();
                    }
                }
                self.take_digits(&mut text);
            }
        }
        text
    }

    // -- Public token stream ------------------------------------

    fn fill(&mut self, n: usize) -> Result<(), ParseError> {
        while self.lookahead.len() <= n {
            match self.lex_token()? {
                Some(t) => self.lookahead.push_back(t),
                None => break,
            }
        }
        Ok(())
    }

    /// Consume and return the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Spanned>, ParseError> {
        if let Some(t) = self.lookahead.pop_front() {
            return Ok(Some(t));
        }
        self.lex_token()
    }

    /// Look `n` tokens ahead without consuming anything.
    pub fn peek_nth(&mut self, n: usize) -> Result<Option<&Token>, ParseError> {
        self.fill(n)?;
        Ok(self.lookahead.get(n).map(|s| &s.token))
    }

    pub fn peek(&mut self) -> Result<Option<&Token>, ParseError> {
        self.peek_nth(0)
    }

    /// True when nothing but trivia remains on the current line.
    ///
    /// Never reads past a line break, so it does not block an interactive
    /// source waiting for the next line.
    pub fn at_line_end(&mut self) -> Result<bool, ParseError> {
        if let Some(t) = self.lookahead.front() {
            return Ok(t.after_newline);
        }
        self.skip_trivia(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BlockSource;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(BlockSource::new(src.as_bytes()));
        let mut out = Vec::new();
        while let Some(t) = lexer.next_token().unwrap() {
            out.push(t.token);
        }
        out
    }

    #[test]
    fn lexes_defs_and_punctuation() {
        assert_eq!(
            tokens("zone = { region: \"Alpha\", loc: (1, -2.5, .5) }"),
            vec![
                Token::Word("zone".into()),
                Token::Eq,
                Token::LBrace,
                Token::Word("region".into()),
                Token::Colon,
                Token::Str("Alpha".into()),
                Token::Comma,
                Token::Word("loc".into()),
                Token::Colon,
                Token::LParen,
                Token::Number(1.0),
                Token::Comma,
                Token::Number(-2.5),
                Token::Comma,
                Token::Number(0.5),
                Token::RParen,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        assert_eq!(
            tokens("// header\na /* inline\n comment */ = 1 // trailing\n"),
            vec![Token::Word("a".into()), Token::Eq, Token::Number(1.0)]
        );
    }

    #[test]
    fn exponent_and_signed_numbers() {
        assert_eq!(
            tokens("1e3 +4 2.5E-1"),
            vec![Token::Number(1000.0), Token::Number(4.0), Token::Number(0.25)]
        );
    }

    #[test]
    fn single_quoted_strings_may_contain_double_quotes() {
        assert_eq!(tokens("'say \"hi\"'"), vec![Token::Str("say \"hi\"".into())]);
    }

    #[test]
    fn unterminated_string_reports_opening_line() {
        let mut lexer = Lexer::new(BlockSource::new(b"\n\nname = \"open").named("t.def"));
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedString {
                file: "t.def".into(),
                line: 3
            }
        );
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let mut lexer = Lexer::new(BlockSource::new(b"a /* never closed"));
        lexer.next_token().unwrap();
        assert!(matches!(
            lexer.next_token(),
            Err(ParseError::UnterminatedComment { line: 1, .. })
        ));
    }

    #[test]
    fn unexpected_character_is_an_error() {
        let mut lexer = Lexer::new(BlockSource::new(b"a = @"));
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        assert!(matches!(
            lexer.next_token(),
            Err(ParseError::UnexpectedCharacter { ch: '@', .. })
        ));
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        assert_eq!(
            tokens("\u{FEFF}\"ZONES\"\nzone = 1"),
            vec![
                Token::Str("ZONES".into()),
                Token::Word("zone".into()),
                Token::Eq,
                Token::Number(1.0),
            ]
        );
        let mut lexer = Lexer::new(BlockSource::new("\u{FEFF}a".as_bytes()));
        let t = lexer.next_token().unwrap().unwrap();
        assert_eq!((t.line, t.after_newline), (1, false));
    }

    #[test]
    fn at_line_end_does_not_cross_newlines() {
        let mut lexer = Lexer::new(BlockSource::new(b"\"ZONES\" // tag\nzone = 1"));
        lexer.next_token().unwrap();
        assert!(lexer.at_line_end().unwrap());
        let t = lexer.next_token().unwrap().unwrap();
        assert_eq!(t.token, Token::Word("zone".into()));
        assert!(t.after_newline);
        assert!(!lexer.at_line_end().unwrap());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new(BlockSource::new(b"a = 1"));
        assert_eq!(lexer.peek_nth(1).unwrap(), Some(&Token::Eq));
        assert_eq!(lexer.peek().unwrap(), Some(&Token::Word("a".into())));
        assert_eq!(
            lexer.next_token().unwrap().unwrap().token,
            Token::Word("a".into())
        );
    }
}
