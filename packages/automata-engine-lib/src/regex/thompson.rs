use crate::{
    automaton::{
        GraphAutomaton,
        epsilon_nfa::EpsilonNfa,
        graph::{Graph, State, StateId, Transition},
    },
    regex::{RegexError, token::Token},
};

/// A partial automaton with one entry and one exit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fragment {
    start: StateId,
    end: StateId,
}

#[derive(Debug, Default)]
struct Builder {
    graph: Graph,
    next_id: StateId,
}

impl Builder {
    fn new_state(&mut self) -> StateId {
        let id = self.next_id;
        self.next_id += 1;
        self.graph.add_state(State::non_accepting(id));
        id
    }

    fn epsilon(&mut self, from: StateId, to: StateId) {
        self.graph.add_transition(Transition::epsilon(from, to));
    }

    fn symbols(&mut self, symbols: &[char]) -> Fragment {
        let start = self.new_state();
        let end = self.new_state();
        for &symbol in symbols {
            self.graph.add_transition(Transition::new(start, end, symbol));
        }
        Fragment { start, end }
    }

    /// Wraps `inner` in fresh start and end states.
    fn wrap(&mut self, inner: Fragment) -> Fragment {
        let start = self.new_state();
        let end = self.new_state();
        self.epsilon(start, inner.start);
        self.epsilon(inner.end, end);
        Fragment { start, end }
    }
}

fn pop_operand(stack: &mut Vec<Fragment>, operator: &Token) -> Result<Fragment, RegexError> {
    stack.pop().ok_or(RegexError::MissingOperand {
        operator: operator.operator().unwrap_or('?'),
    })
}

/// Thompson construction over a postfix token stream. State ids are
/// allocated from 0 in construction order.
pub fn build(postfix: &[Token]) -> Result<EpsilonNfa, RegexError> {
    let mut builder = Builder::default();
    let mut stack: Vec<Fragment> = vec![];

    for token in postfix {
        let fragment = match token {
            Token::Literal(c) => builder.symbols(&[*c]),
            Token::Class(members) => builder.symbols(members),
            Token::Concat => {
                let right = pop_operand(&mut stack, token)?;
                let left = pop_operand(&mut stack, token)?;
                builder.epsilon(left.end, right.start);
                Fragment {
                    start: left.start,
                    end: right.end,
                }
            }
            Token::Alternation => {
                let right = pop_operand(&mut stack, token)?;
                let left = pop_operand(&mut stack, token)?;
                let outer = builder.wrap(left);
                builder.epsilon(outer.start, right.start);
                builder.epsilon(right.end, outer.end);
                outer
            }
            Token::Star => {
                let inner = pop_operand(&mut stack, token)?;
                let outer = builder.wrap(inner);
                builder.epsilon(outer.start, outer.end);
                builder.epsilon(inner.end, inner.start);
                outer
            }
            Token::Plus => {
                let inner = pop_operand(&mut stack, token)?;
                let outer = builder.wrap(inner);
                builder.epsilon(inner.end, inner.start);
                outer
            }
            Token::Question => {
                let inner = pop_operand(&mut stack, token)?;
                let outer = builder.wrap(inner);
                builder.epsilon(outer.start, outer.end);
                outer
            }
            Token::LeftParen(position) | Token::RightParen(position) => {
                return Err(RegexError::MismatchedParenthesis {
                    position: *position,
                });
            }
        };

        stack.push(fragment);
    }

    let result = match stack.as_slice() {
        [] => return Err(RegexError::EmptyPattern),
        [fragment] => *fragment,
        _ => return Err(RegexError::MissingOperand { operator: '.' }),
    };

    builder.graph.set_start_state(result.start);
    builder.graph.set_accepting(result.end, true);

    Ok(EpsilonNfa::from_graph(builder.graph))
}
