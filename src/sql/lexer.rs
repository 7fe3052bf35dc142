//! Character-level scanning helpers shared by the block and line stages.

use std::iter::Peekable;
use std::str::CharIndices;

/// Characters accepted as identifier delimiters.
const IDENT_QUOTES: [char; 2] = ['`', '"'];

/// Cursor over a slice of DDL text that tracks byte offsets.
pub struct Scanner<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Byte offset of the next unread character.
    pub fn offset(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.input.len())
    }

    /// Unread portion of the input.
    pub fn rest(&mut self) -> &'a str {
        let offset = self.offset();
        &self.input[offset..]
    }

    fn current(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn advance(&mut self) {
        self.chars.next();
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume `word` (ASCII case-insensitive) if it is the next token.
    pub fn eat_keyword(&mut self, word: &str) -> bool {
        let rest = self.rest();
        let Some(head) = rest.get(..word.len()) else {
            return false;
        };
        if !head.eq_ignore_ascii_case(word) {
            return false;
        }
        let boundary = rest[word.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_ident_char(c));
        if !boundary {
            return false;
        }
        for _ in word.chars() {
            self.advance();
        }
        true
    }

    /// Consume `c` if it is the next character.
    pub fn eat_char(&mut self, c: char) -> bool {
        if self.current() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Read a bare word or a quote-delimited identifier.
    pub fn read_identifier(&mut self) -> Option<String> {
        match self.current() {
            Some(q) if IDENT_QUOTES.contains(&q) => self.read_quoted_identifier(q),
            Some(c) if is_ident_char(c) => Some(self.read_word()),
            _ => None,
        }
    }

    fn read_word(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.current() {
            if is_ident_char(c) {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    fn read_quoted_identifier(&mut self, quote: char) -> Option<String> {
        self.advance(); // opening quote
        let mut ident = String::new();
        while let Some(c) = self.current() {
            self.advance();
            if c == quote {
                // doubled quote is an escaped quote
                if self.current() == Some(quote) {
                    ident.push(c);
                    self.advance();
                } else {
                    return (!ident.is_empty()).then_some(ident);
                }
            } else if c == '\n' {
                return None;
            } else {
                ident.push(c);
            }
        }
        None
    }
}

pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Read the identifier at the start of `text` and return it with the unread remainder.
pub fn leading_identifier(text: &str) -> Option<(String, &str)> {
    let mut scanner = Scanner::new(text);
    scanner.skip_whitespace();
    let ident = scanner.read_identifier()?;
    Some((ident, scanner.rest()))
}

/// Strip identifier and string quotes from a bare list token such as `` `id` ``.
pub fn strip_quotes(token: &str) -> &str {
    token.trim().trim_matches(|c| c == '`' || c == '"' || c == '\'').trim()
}

/// Byte offset of the `)` matching the `(` at `open`.
///
/// Parentheses inside quoted literals, backtick identifiers, `--` line
/// comments and `/* */` block comments are ignored, so that a comment such as
/// `'1) active 2) closed'` cannot close the body early and an apostrophe in a
/// comment line cannot open a literal.
pub fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    debug_assert_eq!(text.as_bytes().get(open), Some(&b'('));
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text[open..].char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' && q != '`' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '-' if chars.peek().is_some_and(|&(_, n)| n == '-') => {
                // line comment
                for (_, n) in chars.by_ref() {
                    if n == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek().is_some_and(|&(_, n)| n == '*') => {
                chars.next();
                let mut star = false;
                loop {
                    match chars.next() {
                        Some((_, '/')) if star => break,
                        Some((_, n)) => star = n == '*',
                        None => return None,
                    }
                }
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
