use std::{collections::BTreeSet, fmt::Display};

use crate::regex::RegexError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    /// The members of a character class, sorted and without duplicates.
    Class(Vec<char>),
    Star,
    Plus,
    Question,
    Alternation,
    /// Explicit concatenation, inserted by the tokenizer.
    Concat,
    /// Parentheses carry their position in the pattern for error messages.
    LeftParen(usize),
    RightParen(usize),
}

impl Token {
    /// The operator character used in error messages.
    pub fn operator(&self) -> Option<char> {
        match self {
            Token::Star => Some('*'),
            Token::Plus => Some('+'),
            Token::Question => Some('?'),
            Token::Alternation => Some('|'),
            Token::Concat => Some('.'),
            _ => None,
        }
    }

    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Literal(_)
                | Token::Class(_)
                | Token::RightParen(_)
                | Token::Star
                | Token::Plus
                | Token::Question
        )
    }

    fn starts_operand(&self) -> bool {
        matches!(self, Token::Literal(_) | Token::Class(_) | Token::LeftParen(_))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Literal(c) => write!(f, "{c}"),
            Token::Class(members) => write!(f, "[{}]", members.iter().collect::<String>()),
            Token::LeftParen(_) => write!(f, "("),
            Token::RightParen(_) => write!(f, ")"),
            op => write!(f, "{}", op.operator().unwrap_or('?')),
        }
    }
}

/// Splits `pattern` into tokens and inserts [`Token::Concat`] wherever two
/// operands are juxtaposed.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, RegexError> {
    let chars = pattern.chars().collect::<Vec<_>>();

    let start = usize::from(chars.first() == Some(&'^'));
    let mut end = chars.len();
    if end > start && chars[end - 1] == '$' && !is_escaped(&chars, end - 1) {
        end -= 1;
    }

    let mut tokens = vec![];
    let mut i = start;

    while i < end {
        let token = match chars[i] {
            '\\' => {
                let escaped = *chars[..end].get(i + 1).ok_or(RegexError::TrailingEscape)?;
                i += 1;
                Token::Literal(escaped)
            }
            '[' => {
                let (members, next) = read_class(&chars[..end], i)?;
                i = next - 1;
                Token::Class(members)
            }
            '*' => Token::Star,
            '+' => Token::Plus,
            '?' => Token::Question,
            '|' => Token::Alternation,
            '(' => Token::LeftParen(i),
            ')' => Token::RightParen(i),
            c => Token::Literal(c),
        };

        if let Some(previous) = tokens.last()
            && Token::ends_operand(previous)
            && token.starts_operand()
        {
            tokens.push(Token::Concat);
        }

        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

/// Whether the character at `index` is preceded by an odd number of
/// backslashes.
fn is_escaped(chars: &[char], index: usize) -> bool {
    chars[..index]
        .iter()
        .rev()
        .take_while(|c| **c == '\\')
        .count()
        % 2
        == 1
}

/// Reads the class opened at `open`. Returns its members and the index
/// after the closing bracket.
fn read_class(chars: &[char], open: usize) -> Result<(Vec<char>, usize), RegexError> {
    let unterminated = RegexError::UnterminatedCharacterClass { position: open };
    let mut members = BTreeSet::new();
    let mut i = open + 1;

    if chars.get(i) == Some(&'^') {
        return Err(RegexError::NegatedCharacterClass { position: open });
    }

    // reads one possibly escaped member, returns it and the index after it
    let member_at = |i: usize| -> Result<(char, usize), RegexError> {
        match chars.get(i) {
            Some('\\') => chars
                .get(i + 1)
                .map(|c| (*c, i + 2))
                .ok_or(unterminated.clone()),
            Some(c) => Ok((*c, i + 1)),
            None => Err(unterminated.clone()),
        }
    };

    loop {
        match chars.get(i) {
            None => return Err(unterminated.clone()),
            Some(']') => break,
            Some(_) => {}
        }

        let (first, next) = member_at(i)?;
        i = next;

        let is_range = chars.get(i) == Some(&'-') && chars.get(i + 1).is_some_and(|c| *c != ']');
        if is_range {
            let (last, next) = member_at(i + 1)?;
            if first > last {
                return Err(RegexError::InvalidRange {
                    start: first,
                    end: last,
                });
            }
            members.extend(first..=last);
            i = next;
        } else {
            members.insert(first);
        }
    }

    if members.is_empty() {
        return Err(RegexError::EmptyCharacterClass { position: open });
    }

    Ok((members.into_iter().collect(), i + 1))
}
