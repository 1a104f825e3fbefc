use crate::regex::{RegexError, token::Token};

fn precedence(token: &Token) -> u8 {
    match token {
        Token::Star | Token::Plus | Token::Question => 5,
        Token::Concat => 4,
        Token::Alternation => 3,
        _ => 0,
    }
}

/// Shunting-yard. The postfix operators `*`, `+` and `?` bind tightest and
/// go straight to the output, `|` and concatenation are left associative.
/// Parentheses do not appear in the result.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, RegexError> {
    let mut output = vec![];
    let mut operators: Vec<Token> = vec![];

    for token in tokens {
        match token {
            Token::Literal(_) | Token::Class(_) => output.push(token.clone()),
            Token::Star | Token::Plus | Token::Question => output.push(token.clone()),
            Token::Concat | Token::Alternation => {
                while let Some(top) = operators
                    .pop_if(|top| precedence(top) > 0 && precedence(top) >= precedence(token))
                {
                    output.push(top);
                }
                operators.push(token.clone());
            }
            Token::LeftParen(_) => operators.push(token.clone()),
            Token::RightParen(position) => loop {
                match operators.pop() {
                    Some(Token::LeftParen(_)) => break,
                    Some(operator) => output.push(operator),
                    None => {
                        return Err(RegexError::MismatchedParenthesis {
                            position: *position,
                        });
                    }
                }
            },
        }
    }

    while let Some(operator) = operators.pop() {
        if let Token::LeftParen(position) = operator {
            return Err(RegexError::MismatchedParenthesis { position });
        }
        output.push(operator);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::token::tokenize;

    fn postfix(pattern: &str) -> String {
        to_postfix(&tokenize(pattern).unwrap())
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(postfix("ab|c"), "ab.c|");
        assert_eq!(postfix("a(b|c)"), "abc|.");
        assert_eq!(postfix("ab*"), "ab*.");
        assert_eq!(postfix("(ab)*"), "ab.*");
        assert_eq!(postfix("a|b|c"), "ab|c|");
        assert_eq!(postfix("(0|1)*01"), "01|*0.1.");
    }

    #[test]
    fn mismatched_parentheses() {
        assert_eq!(
            to_postfix(&tokenize("(a").unwrap()),
            Err(RegexError::MismatchedParenthesis { position: 0 })
        );
        assert_eq!(
            to_postfix(&tokenize("a)b").unwrap()),
            Err(RegexError::MismatchedParenthesis { position: 1 })
        );
    }
}
