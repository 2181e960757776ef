mod expression;
mod statement;
pub use expression::*;
pub use statement::*;

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        writeln!(f, "{{")?;
        for stmt in self.statements.iter() {
            writeln!(f, "\t{}", stmt)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub value: String,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

/// Joins displayable nodes with `separator`.
pub(crate) fn join<T: Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(T::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_display() {
        let program = Program {
            statements: vec![
                Statement::Let(LetStatement {
                    name: "myVar".into(),
                    value: Expression::Identifier("anotherVar".into()),
                }),
                Statement::Expression(ExpressionStatement {
                    expression: Expression::Function(FunctionLiteral {
                        parameters: vec!["a".into(), "b".into()],
                        body: Rc::new(BlockStatement {
                            statements: vec![
                                Statement::Return(ReturnStatement {
                                    value: Expression::Integer(1),
                                }),
                                Statement::Expression(ExpressionStatement {
                                    expression: Expression::String("s".to_owned()),
                                }),
                            ],
                        }),
                    }),
                }),
            ],
        };

        assert_eq!(
            program.to_string(),
            "{\n\t(myVar = anotherVar)\n\t(fn (a,b) { (return 1) ; (\"s\") })\n}"
        );
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(Program::default().to_string(), "{\n}");
    }
}
