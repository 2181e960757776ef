use crate::ast::{InfixOperator, PostfixOperator, PrefixOperator};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub EvalError

    BuiltinRedefinition{name: String} = "Identifier '{name}' already used as a builtin function",
    InvalidPrefixOperand{operator: PrefixOperator, operand: &'static str} = "Cannot apply prefix operator '{operator}' to {operand}",
    UnknownInfixOperator{left: &'static str, operator: InfixOperator, right: &'static str} = "Unknown infix operator {left} {operator} {right}",
    TypeMismatch{left: &'static str, operator: InfixOperator, right: &'static str} = "Cannot solve infix expression {left} {operator} {right}",
    DivisionByZero = "Division by zero",
    NonBooleanCondition{construct: &'static str, type_name: &'static str} = "{construct} condition must be a BOOLEAN expression, got {type_name}",
    NotAFunction{type_name: &'static str} = "Cannot invoke {type_name}: not a FUNCTION",
    ArityMismatch{formal: usize, actual: usize} = "Formal parameters and actual parameters differ in length (formal {formal} != actual {actual})",
    NotIndexable{type_name: &'static str} = "Cannot index non-indexable object: {type_name}",
    InvalidIndex{type_name: &'static str} = "Cannot use {type_name} as index",
    IndexOutOfBounds{container: &'static str, max: i64, got: i64} = "{container} index out of bounds: max index {max}, got {got}",
    ReverseIndexOutOfBounds{container: &'static str, max: i64, got: i64} = "{container} reverse index out of bounds: max reverse index -{max}, got -{got}",
    PostfixUndeclared{operator: PostfixOperator, name: String} = "Cannot apply postfix operator '{operator}' to {name}: not declared",
    PostfixNotInteger{operator: PostfixOperator, name: String} = "Cannot apply postfix operator '{operator}' to {name}: not an integer",
    PostfixNotIdentifier{operator: PostfixOperator, target: String} = "Cannot apply postfix operator '{operator}' to {target}",
    IncorrectArity{got: usize, want: String} = "Unexpected number of arguments: got {got}, must be {want}",
    UnsupportedArgType{type_name: &'static str} = "Unexpected type of argument: expected ARRAY or STRING, got {type_name}",
    UnsupportedFirstArgType{type_name: &'static str} = "Unexpected type of first argument: expected ARRAY or STRING, got {type_name}",
    Output{message: String} = "Cannot write output: {message}",
}

impl EvalError {
    pub fn binary_op_error(
        left: &'static str,
        operator: InfixOperator,
        right: &'static str,
    ) -> Self {
        if left == right {
            Self::UnknownInfixOperator {
                left,
                operator,
                right,
            }
        } else {
            Self::TypeMismatch {
                left,
                operator,
                right,
            }
        }
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::Output {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_binary_op_error() {
        assert_eq!(
            EvalError::binary_op_error("BOOLEAN", InfixOperator::Plus, "BOOLEAN").to_string(),
            "Unknown infix operator BOOLEAN + BOOLEAN"
        );
        assert_eq!(
            EvalError::binary_op_error("INTEGER", InfixOperator::Plus, "BOOLEAN").to_string(),
            "Cannot solve infix expression INTEGER + BOOLEAN"
        );
    }

    #[test]
    fn test_bounds_messages() {
        let err = EvalError::ReverseIndexOutOfBounds {
            container: "Array",
            max: 3,
            got: 4,
        };
        assert_eq!(
            err.to_string(),
            "Array reverse index out of bounds: max reverse index -3, got -4"
        );
    }
}
