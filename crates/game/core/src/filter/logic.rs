use std::str::FromStr;

use super::FilterError;

/// Operator joining the elements of a [`LogicFilter::Expression`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogicOperator {
    And,
    Or,
    /// True iff exactly one element is true.
    Xor,
}

impl LogicOperator {
    pub fn parse(text: &str) -> Result<Self, FilterError> {
        Self::from_str(text.trim()).map_err(|_| FilterError::UnknownOperator(text.to_owned()))
    }
}

/// Boolean expression tree with caller-defined leaves.
#[derive(Clone, Debug)]
pub enum LogicFilter<L> {
    Leaf(L),
    Expression {
        operator: LogicOperator,
        negated: bool,
        elements: Vec<LogicFilter<L>>,
    },
}

impl<L> LogicFilter<L> {
    pub fn all(elements: Vec<LogicFilter<L>>) -> Self {
        Self::Expression {
            operator: LogicOperator::And,
            negated: false,
            elements,
        }
    }

    pub fn any(elements: Vec<LogicFilter<L>>) -> Self {
        Self::Expression {
            operator: LogicOperator::Or,
            negated: false,
            elements,
        }
    }

    /// Evaluates the tree, short-circuiting where the operator allows.
    ///
    /// Empty expressions evaluate to `true` for AND and `false` for OR/XOR.
    pub fn eval<F>(&self, leaf: &mut F) -> bool
    where
        F: FnMut(&L) -> bool,
    {
        match self {
            Self::Leaf(value) => leaf(value),
            Self::Expression {
                operator,
                negated,
                elements,
            } => {
                let result = match operator {
                    LogicOperator::And => elements.iter().all(|e| e.eval(&mut *leaf)),
                    LogicOperator::Or => elements.iter().any(|e| e.eval(&mut *leaf)),
                    LogicOperator::Xor => {
                        let mut seen = false;
                        let mut result = false;
                        for element in elements {
                            if element.eval(&mut *leaf) {
                                if seen {
                                    result = false;
                                    break;
                                }
                                seen = true;
                                result = true;
                            }
                        }
                        result
                    }
                };
                result != *negated
            }
        }
    }
}
