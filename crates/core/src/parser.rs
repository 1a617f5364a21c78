//! Recursive-descent parser producing one [`Term`] per call.
//!
//! Grammar (informal):
//!
//! ```text
//! top    := value [ ('=' | ':') value ]       name must be a word or string
//! value  := base { ',' base }                  continues only while the next
//!                                              item is not a `name =` def
//! base   := number | string | word | true | false
//!         | '{' { name ('=' | ':') value [','] } '}'
//!         | '[' { base [('=' | ':') base] [','] } ']'
//!         | '(' ... ')'                        same as '[' ... ']'
//! ```
//!
//! A top-level term ends with its line unless `=`, `:` or `,` follows on
//! the same line. Brackets nest at most [`MAX_DEPTH`] levels.

use crate::error::ParseError;
use crate::lexer::{Lexer, Spanned, Token};
use crate::source::{BlockSource, ParseSource};
use crate::term::{Def, Term};

/// Deepest bracket nesting accepted before [`ParseError::TooDeep`].
pub const MAX_DEPTH: usize = 128;

pub struct Parser<S> {
    lexer: Lexer<S>,
    depth: usize,
    finished: bool,
    error: Option<ParseError>,
}

impl<S: ParseSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Parser {
            lexer: Lexer::new(source),
            depth: 0,
            finished: false,
            error: None,
        }
    }

    /// Source name used in diagnostics.
    pub fn name(&self) -> &str {
        self.lexer.name()
    }

    /// Parse the next top-level term.
    ///
    /// Returns `Ok(None)` once input is exhausted. After an error the parser
    /// is finished: the error is kept in [`Parser::error`] and every further
    /// call returns `Ok(None)`.
    pub fn parse_term(&mut self) -> Result<Option<Term>, ParseError> {
        if self.finished {
            return Ok(None);
        }
        match self.parse_top() {
            Ok(Some(term)) => Ok(Some(term)),
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Like [`Parser::parse_term`], but a parse error is logged and reported
    /// as "no term". This is the shape the file loaders loop on.
    pub fn next_term(&mut self) -> Option<Term> {
        match self.parse_term() {
            Ok(term) => term,
            Err(e) => {
                tracing::warn!("could not parse '{}': {}", self.name(), e);
                None
            }
        }
    }

    /// The error that finished this parser, if any.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    // -- Helpers ------------------------------------------------

    fn peek_is(&mut self, pred: impl Fn(&Token) -> bool) -> Result<bool, ParseError> {
        Ok(self.lexer.peek()?.is_some_and(pred))
    }

    fn is_def_marker(t: &Token) -> bool {
        matches!(t, Token::Eq | Token::Colon)
    }

    fn is_closer(t: &Token) -> bool {
        matches!(t, Token::RBrace | Token::RBracket | Token::RParen)
    }

    fn def_name(term: &Term) -> Option<String> {
        term.as_text().map(str::to_owned)
    }

    fn unexpected(&self, expected: &'static str, found: &Spanned) -> ParseError {
        ParseError::UnexpectedToken {
            file: self.lexer.name().to_owned(),
            expected,
            found: found.token.describe(),
            line: found.line,
        }
    }

    fn unexpected_end(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedEnd {
            file: self.lexer.name().to_owned(),
            expected,
            line: self.lexer.line(),
        }
    }

    fn skip_commas(&mut self) -> Result<(), ParseError> {
        while self.peek_is(|t| *t == Token::Comma)? {
            self.lexer.next_token()?;
        }
        Ok(())
    }

    /// After a ',' has been peeked: does the list go on? It does not when
    /// the next item starts a new definition or closes a bracket.
    fn list_continues(&mut self) -> Result<bool, ParseError> {
        let after_comma = match self.lexer.peek_nth(1)? {
            None => return Ok(false),
            Some(t) => t.clone(),
        };
        match after_comma {
            Token::Word(_) | Token::Str(_) => {
                let marker = self.lexer.peek_nth(2)?.is_some_and(Self::is_def_marker);
                Ok(!marker)
            }
            Token::Number(_) | Token::LBrace | Token::LBracket | Token::LParen => Ok(true),
            _ => Ok(false),
        }
    }

    // -- Grammar ------------------------------------------------

    fn parse_top(&mut self) -> Result<Option<Term>, ParseError> {
        self.skip_commas()?;
        let Some(tok) = self.lexer.next_token()? else {
            return Ok(None);
        };
        let base = self.parse_base(tok)?;
        if self.lexer.at_line_end()? {
            return Ok(Some(base));
        }

        if self.peek_is(Self::is_def_marker)? {
            let marker = self.lexer.next_token()?;
            let Some(name) = Self::def_name(&base) else {
                // marker is always Some here; it was just peeked
                return match marker {
                    Some(m) => Err(self.unexpected("a name before the definition marker", &m)),
                    None => Err(self.unexpected_end("a definition name")),
                };
            };
            let value = self.parse_value(true)?;
            return Ok(Some(Term::Def(Box::new(Def::new(name, value)))));
        }

        if self.list_follows(true)? {
            return self.parse_list(base, true).map(Some);
        }
        Ok(Some(base))
    }

    /// A def value. At top level the value ends with its line.
    fn parse_value(&mut self, top: bool) -> Result<Term, ParseError> {
        let Some(tok) = self.lexer.next_token()? else {
            return Err(self.unexpected_end("a value"));
        };
        let base = self.parse_base(tok)?;
        if self.list_follows(top)? {
            return self.parse_list(base, top);
        }
        Ok(base)
    }

    fn list_follows(&mut self, top: bool) -> Result<bool, ParseError> {
        if top && self.lexer.at_line_end()? {
            return Ok(false);
        }
        Ok(self.peek_is(|t| *t == Token::Comma)? && self.list_continues()?)
    }

    fn parse_list(&mut self, first: Term, top: bool) -> Result<Term, ParseError> {
        let mut elems = vec![first];
        loop {
            self.lexer.next_token()?;
            let Some(tok) = self.lexer.next_token()? else {
                return Err(self.unexpected_end("a list element"));
            };
            elems.push(self.parse_base(tok)?);
            if !self.list_follows(top)? {
                break;
            }
        }
        Ok(Term::Array(elems))
    }

    /// Run `parse` one bracket level deeper.
    fn nested(
        &mut self,
        line: u32,
        parse: impl FnOnce(&mut Self) -> Result<Term, ParseError>,
    ) -> Result<Term, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                file: self.lexer.name().to_owned(),
                line,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_base(&mut self, tok: Spanned) -> Result<Term, ParseError> {
        let line = tok.line;
        match tok.token {
            Token::Number(n) => Ok(Term::Number(n)),
            Token::Str(s) => Ok(Term::Text(s)),
            Token::Word(w) => Ok(match w.as_str() {
                "true" => Term::Bool(true),
                "false" => Term::Bool(false),
                _ => Term::Text(w),
            }),
            Token::LBrace => self.nested(line, |p| p.parse_struct(line)),
            Token::LBracket => self.nested(line, |p| p.parse_array('[', Token::RBracket, line)),
            Token::LParen => self.nested(line, |p| p.parse_array('(', Token::RParen, line)),
            _ => Err(self.unexpected("a value", &tok)),
        }
    }

    fn parse_struct(&mut self, open_line: u32) -> Result<Term, ParseError> {
        let mut defs = Vec::new();
        loop {
            self.skip_commas()?;
            let Some(tok) = self.lexer.next_token()? else {
                return Err(ParseError::UnterminatedBracket {
                    file: self.lexer.name().to_owned(),
                    open: '{',
                    line: open_line,
                });
            };
            let name = match &tok.token {
                Token::RBrace => break,
                Token::RBracket | Token::RParen => {
                    return Err(ParseError::MismatchedBracket {
                        file: self.lexer.name().to_owned(),
                        open: '{',
                        found: tok.token.describe(),
                        line: tok.line,
                    })
                }
                Token::Word(w) | Token::Str(w) => w.clone(),
                _ => return Err(self.unexpected("a field name", &tok)),
            };
            match self.lexer.next_token()? {
                Some(m) if Self::is_def_marker(&m.token) => {}
                Some(other) => return Err(self.unexpected("'=' or ':' after a field name", &other)),
                None => {
                    return Err(ParseError::UnterminatedBracket {
                        file: self.lexer.name().to_owned(),
                        open: '{',
                        line: open_line,
                    })
                }
            }
            let value = self.parse_value(false)?;
            defs.push(Def::new(name, value));
        }
        Ok(Term::Struct(defs))
    }

    fn parse_array(&mut self, open: char, close: Token, open_line: u32) -> Result<Term, ParseError> {
        let mut elems = Vec::new();
        loop {
            self.skip_commas()?;
            let Some(tok) = self.lexer.next_token()? else {
                return Err(ParseError::UnterminatedBracket {
                    file: self.lexer.name().to_owned(),
                    open,
                    line: open_line,
                });
            };
            if tok.token == close {
                break;
            }
            if Self::is_closer(&tok.token) {
                return Err(ParseError::MismatchedBracket {
                    file: self.lexer.name().to_owned(),
                    open,
                    found: tok.token.describe(),
                    line: tok.line,
                });
            }
            let base = self.parse_base(tok)?;
            if self.peek_is(Self::is_def_marker)? {
                if let Some(name) = Self::def_name(&base) {
                    self.lexer.next_token()?;
                    let Some(vtok) = self.lexer.next_token()? else {
                        return Err(self.unexpected_end("a value"));
                    };
                    let value = self.parse_base(vtok)?;
                    elems.push(Term::Def(Box::new(Def::new(name, value))));
                    continue;
                }
            }
            elems.push(base);
        }
        Ok(Term::Array(elems))
    }
}

/// Parse every top-level term of an in-memory text.
pub fn parse_str(text: &str, name: &str) -> Result<Vec<Term>, ParseError> {
    let mut parser = Parser::new(BlockSource::new(text.as_bytes()).named(name));
    let mut terms = Vec::new();
    while let Some(term) = parser.parse_term()? {
        terms.push(term);
    }
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(src: &str) -> Term {
        let terms = parse_str(src, "test.def").expect("should parse");
        assert_eq!(terms.len(), 1, "expected one term, got {:?}", terms);
        terms.into_iter().next().unwrap()
    }

    fn def(term: &Term) -> &Def {
        term.as_def().expect("expected a definition")
    }

    #[test]
    fn scalars() {
        assert_eq!(parse_one("42"), Term::Number(42.0));
        assert_eq!(parse_one("-1.5"), Term::Number(-1.5));
        assert_eq!(parse_one("\"ZONES\""), Term::Text("ZONES".into()));
        assert_eq!(parse_one("ZONES"), Term::Text("ZONES".into()));
        assert_eq!(parse_one("true"), Term::Bool(true));
        assert_eq!(parse_one("false"), Term::Bool(false));
    }

    #[test]
    fn quoted_true_stays_text() {
        assert_eq!(parse_one("\"true\""), Term::Text("true".into()));
    }

    #[test]
    fn definition_with_either_marker() {
        for src in ["name = \"Alpha\"", "name: \"Alpha\""] {
            let t = parse_one(src);
            let d = def(&t);
            assert_eq!(d.name, "name");
            assert_eq!(d.value, Term::Text("Alpha".into()));
        }
    }

    #[test]
    fn struct_with_comma_and_newline_separators() {
        let t = parse_one("zone = {\n  region = \"Alpha\", system = \"Sol\"\n  id = 3\n}");
        let d = def(&t);
        let fields = d.value.as_struct().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "region");
        assert_eq!(fields[1].value, Term::Text("Sol".into()));
        assert_eq!(d.find("id").unwrap().value, Term::Number(3.0));
    }

    #[test]
    fn duplicate_struct_fields_are_kept_in_order() {
        let t = parse_one("c = { group = 1, group = 2 }");
        let fields = def(&t).value.as_struct().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].value, Term::Number(2.0));
    }

    #[test]
    fn bracketed_and_parenthesized_arrays() {
        let expected = Term::Array(vec![
            Term::Number(1.0),
            Term::Number(2.0),
            Term::Number(3.0),
        ]);
        assert_eq!(def(&parse_one("loc = [1, 2, 3]")).value, expected);
        assert_eq!(def(&parse_one("loc = (1, 2, 3)")).value, expected);
    }

    #[test]
    fn bare_comma_list_becomes_an_array() {
        let t = parse_one("name = 1.0, 2.0, 3.0");
        assert_eq!(
            def(&t).value,
            Term::Array(vec![
                Term::Number(1.0),
                Term::Number(2.0),
                Term::Number(3.0)
            ])
        );
    }

    #[test]
    fn bare_list_inside_struct_stops_at_next_field() {
        let t = parse_one("e = { loc = 1, 2, 3, name = \"x\" }");
        let d = def(&t);
        assert_eq!(d.find("loc").unwrap().value.as_array().unwrap().len(), 3);
        assert_eq!(d.find("name").unwrap().value, Term::Text("x".into()));
    }

    #[test]
    fn nested_structs_and_arrays() {
        let t = parse_one("a = { b = { c = [ {x = 1}, [2, 3] ] } }");
        let c = def(&t).find("b").unwrap().find("c").unwrap();
        let elems = c.value.as_array().unwrap();
        assert_eq!(elems.len(), 2);
        assert!(elems[0].as_struct().is_some());
        assert_eq!(elems[1].as_array().unwrap().len(), 2);
    }

    #[test]
    fn file_of_header_then_defs() {
        let src = "\"ZONES\"\n\nzone = { region = \"Alpha\" }\n// comment\nzone = { region = \"Beta\" }\n";
        let terms = parse_str(src, "zones.def").unwrap();
        assert_eq!(terms.len(), 3);
        assert_eq!(terms[0], Term::Text("ZONES".into()));
        assert_eq!(def(&terms[2]).find("region").unwrap().value, Term::Text("Beta".into()));
    }

    #[test]
    fn header_word_does_not_absorb_next_line() {
        let terms = parse_str("CAMPAIGN\nname = \"x\"", "campaign.def").unwrap();
        assert_eq!(terms[0], Term::Text("CAMPAIGN".into()));
        assert_eq!(def(&terms[1]).name, "name");
    }

    #[test]
    fn top_level_defs_separated_by_commas() {
        let terms = parse_str("a = 1, b = 2", "t.def").unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(def(&terms[1]).name, "b");
    }

    #[test]
    fn parsing_twice_gives_equal_trees() {
        let src = "x = { a = 1, b = \"two\", c = [true, false], d = { e = 2.5 } }";
        assert_eq!(parse_str(src, "a").unwrap(), parse_str(src, "b").unwrap());
    }

    #[test]
    fn display_output_reparses_to_the_same_tree() {
        let src = "x = { a = 1, b = \"two\", c = [true, 3.25], d = { e = \"f\" } }";
        let first = parse_one(src);
        let second = parse_one(&first.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn unterminated_bracket_is_reported_not_fatal() {
        let mut parser = Parser::new(BlockSource::new(b"ok = 1\nzone = { region = \"A\"\n"));
        assert!(parser.parse_term().unwrap().is_some());
        let err = parser.parse_term().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnterminatedBracket { open: '{', line: 2, .. }
        ));
        assert_eq!(parser.error(), Some(&err));
        // finished: no resurrection
        assert_eq!(parser.parse_term().unwrap(), None);
        assert_eq!(parser.next_term(), None);
    }

    #[test]
    fn mismatched_bracket_is_reported() {
        let err = parse_str("a = [1, 2 }", "t.def").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedBracket { open: '[', .. }));
    }

    #[test]
    fn missing_value_is_reported() {
        let err = parse_str("a = }", "t.def").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { expected: "a value", .. }));
        let err = parse_str("a =", "t.def").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { .. }));
    }

    #[test]
    fn runaway_nesting_is_an_error() {
        let src = format!("a = {}", "[".repeat(100_000));
        let err = parse_str(&src, "deep.def").unwrap_err();
        assert_eq!(
            err,
            ParseError::TooDeep {
                file: "deep.def".into(),
                line: 1
            }
        );

        let src = format!("a = {}", "{ b = ".repeat(10_000));
        assert!(matches!(
            parse_str(&src, "deep.def"),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let src = format!("a = {}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        let top = parse_one(&src);
        let mut term = &def(&top).value;
        let mut levels = 0;
        while let Some(elems) = term.as_array() {
            levels += 1;
            match elems.first() {
                Some(inner) => term = inner,
                None => break,
            }
        }
        assert_eq!(levels, MAX_DEPTH);

        let src = format!("a = {}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert!(matches!(
            parse_str(&src, "t.def"),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn name_and_marker_on_separate_lines_end_the_file() {
        let mut parser = Parser::new(BlockSource::new(b"name\n= 1\nother = 2\n"));
        assert_eq!(parser.parse_term().unwrap(), Some(Term::Text("name".into())));
        let err = parser.parse_term().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: "a value",
                line: 2,
                ..
            }
        ));
        // `other = 2` is never reached
        assert_eq!(parser.parse_term().unwrap(), None);
    }

    #[test]
    fn number_cannot_name_a_definition() {
        let err = parse_str("3 = 4", "t.def").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { line: 1, .. }));
    }

    #[test]
    fn struct_field_needs_a_marker() {
        let err = parse_str("a = { b 1 }", "t.def").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn next_term_swallows_errors() {
        let mut parser = Parser::new(BlockSource::new(b"a = \"open"));
        assert_eq!(parser.next_term(), None);
        assert!(matches!(
            parser.error(),
            Some(ParseError::UnterminatedString { .. })
        ));
    }

    /// Hands out one line per call and counts the calls.
    struct Lines {
        lines: Vec<&'static str>,
        calls: usize,
    }

    impl ParseSource for Lines {
        fn more(&mut self) -> Option<String> {
            self.calls += 1;
            if self.lines.is_empty() {
                None
            } else {
                Some(self.lines.remove(0).to_owned())
            }
        }

        fn name(&self) -> &str {
            "lines"
        }
    }

    #[test]
    fn completed_line_does_not_wait_for_the_next() {
        let mut src = Lines {
            lines: vec!["a = 1\n", "b = 2, 3\n", "{ c = 4 }\n"],
            calls: 0,
        };
        let mut parser = Parser::new(&mut src);
        assert_eq!(def(&parser.parse_term().unwrap().unwrap()).name, "a");
        let b = parser.parse_term().unwrap().unwrap();
        assert_eq!(def(&b).value.as_array().unwrap().len(), 2);
        let c = parser.parse_term().unwrap().unwrap();
        assert!(c.as_struct().is_some());
        drop(parser);
        assert_eq!(src.calls, 3);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_str("", "t.def").unwrap().is_empty());
        assert!(parse_str("  // only a comment\n", "t.def").unwrap().is_empty());
    }
}
