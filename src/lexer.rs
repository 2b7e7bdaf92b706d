use crate::ast::Token;

/// Total lexer for LS source text.
///
/// Lexing never fails: whitespace is skipped, identifiers and numbers are
/// scanned with maximal munch, strings are captured verbatim between matching
/// quotes, and any other character becomes a one-character [`Token::Symbol`].
/// The stream always ends with exactly one [`Token::Eof`].
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> String {
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            if ch == quote {
                self.advance();
                return result;
            }
            // No escape processing; content is captured verbatim.
            result.push(ch);
            self.advance();
        }

        // Unterminated string: everything up to end of input.
        result
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Saturate on overflow so lexing stays total.
        Token::Integer(number.parse::<i64>().unwrap_or(i64::MAX))
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.current_char() {
            None => Token::Eof,
            Some('"') => Token::String(self.read_string('"')),
            Some('\'') => Token::String(self.read_string('\'')),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                Token::Identifier(self.read_identifier())
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => {
                self.advance();
                Token::Symbol(ch)
            }
        }
    }

    /// Drain the remaining input into a token vector ending in `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}

#[test]
fn test_keywords_and_symbols() {
    let mut lexer = Lexer::new("def x = 1");
    assert_eq!(lexer.next_token(), Token::Identifier("def".to_string()));
    assert_eq!(lexer.next_token(), Token::Identifier("x".to_string()));
    assert_eq!(lexer.next_token(), Token::Symbol('='));
    assert_eq!(lexer.next_token(), Token::Integer(1));
    assert_eq!(lexer.next_token(), Token::Eof);
}

#[test]
fn test_unterminated_string_consumes_to_end() {
    let mut lexer = Lexer::new("\"abc def");
    assert_eq!(lexer.next_token(), Token::String("abc def".to_string()));
    assert_eq!(lexer.next_token(), Token::Eof);
}
