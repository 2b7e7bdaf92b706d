#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier or keyword
    ///
    /// Must start with a letter or underscore, followed by letters, digits,
    /// or underscores. Keywords (`def`, `var`, `msg`, `popup`, `si`,
    /// `repeter`) are not distinguished at the lexical level; the parser
    /// dispatches on the identifier's value.
    ///
    /// # Examples
    /// ```text
    /// def
    /// titre
    /// _interne
    /// ```
    Identifier(String),

    /// Non-negative integer literal
    ///
    /// LS has no floating-point or negative literals. Values that overflow
    /// `i64` saturate at lex time so that lexing stays total.
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 42
    /// ```
    Integer(i64),

    /// String literal enclosed in single or double quotes
    ///
    /// Content is captured verbatim with no escape processing. An
    /// unterminated string consumes to end of input.
    ///
    /// # Examples
    /// ```text
    /// "bonjour"
    /// 'item #1'
    /// ```
    String(String),

    /// Any other non-whitespace character
    ///
    /// The lexer never rejects input; unrecognized characters become
    /// one-character symbol tokens and the parser decides whether they fit
    /// the grammar.
    ///
    /// # Examples
    /// ```text
    /// ( ) { } = . ,
    /// ```
    Symbol(char),

    /// End of input
    ///
    /// Every token stream ends with exactly one `Eof`, so the parser can
    /// probe ahead without bounds checks.
    Eof,
}

impl Token {
    /// Surface text of the token, used by diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => name.clone(),
            Token::Integer(n) => n.to_string(),
            Token::String(s) => format!("\"{}\"", s),
            Token::Symbol(c) => c.to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
