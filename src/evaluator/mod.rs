use crate::ast::{self, Expression, InfixOperator, PostfixOperator, PrefixOperator, Statement};
use crate::builtins::{Builtin, EmptySequence};
use crate::environment::{Env, Environment};
use crate::lexer::Lexer;
use crate::object::{EvalError, FunctionObject, Object, Result};
use crate::parser::{ParseError, Parser};
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use tracing::{debug, instrument, trace};


/// Tree-walking evaluator. `print` output goes to `W`.
pub struct Evaluator<W: Write = Stdout> {
    output: W,
    empty_sequence: EmptySequence,
}

impl Evaluator<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Evaluator<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Evaluator<W> {
    pub fn with_output(output: W) -> Self {
        Self {
            output,
            empty_sequence: EmptySequence::default(),
        }
    }

    pub fn empty_sequence(mut self, empty_sequence: EmptySequence) -> Self {
        self.empty_sequence = empty_sequence;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Evaluates `program` in `env`. Failures come back as `Object::Error`.
    #[instrument(level = "trace", skip_all)]
    pub fn eval(&mut self, program: &ast::Program, env: &Env) -> Object {
        match self.eval_program(program, env) {
            Ok(obj) => obj,
            Err(err) => {
                debug!(error = %err, "evaluation failed");
                Object::Error(err)
            }
        }
    }

    /// Parses and evaluates `input` in one step.
    pub fn interpret(
        &mut self,
        input: &str,
        env: &Env,
    ) -> std::result::Result<Object, Vec<ParseError>> {
        let program = Parser::new(Lexer::new(input)).parse_program()?;
        Ok(self.eval(&program, env))
    }

    fn eval_program(&mut self, program: &ast::Program, env: &Env) -> Result<Object> {
        let mut result = Object::Null;
        for stmt in program.statements.iter() {
            result = self.eval_statement(stmt, env)?;
            if let Object::ReturnValue(_) = result {
                return Ok(result.unwrap_return());
            }
        }
        Ok(result)
    }

    fn eval_block(&mut self, block: &ast::BlockStatement, env: &Env) -> Result<Object> {
        let mut result = Object::Null;
        for stmt in block.statements.iter() {
            result = self.eval_statement(stmt, env)?;
            if let Object::ReturnValue(_) = result {
                break;
            }
        }
        Ok(result)
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> Result<Object> {
        match stmt {
            Statement::Expression(stmt) => self.eval_expression(&stmt.expression, env),
            Statement::Return(stmt) => {
                let value = self.eval_expression(&stmt.value, env)?;
                Ok(Object::ReturnValue(Box::new(value)))
            }
            Statement::Let(stmt) => {
                let value = self.eval_expression(&stmt.value, env)?;
                let name = &stmt.name.value;
                if Builtin::lookup(name).is_some() {
                    return Err(EvalError::BuiltinRedefinition { name: name.clone() });
                }
                env.borrow_mut().put(name, value);
                Ok(Object::Null)
            }
            Statement::While(stmt) => self.eval_while_statement(stmt, env),
        }
    }

    fn eval_while_statement(&mut self, stmt: &ast::WhileStatement, env: &Env) -> Result<Object> {
        loop {
            match self.eval_expression(&stmt.condition, env)? {
                Object::Boolean(true) => {}
                Object::Boolean(false) => return Ok(Object::Null),
                obj => {
                    return Err(EvalError::NonBooleanCondition {
                        construct: "While statement",
                        type_name: obj.type_name(),
                    })
                }
            }

            let result = self.eval_block(&stmt.body, env)?;
            if let Object::ReturnValue(_) = result {
                return Ok(result);
            }
        }
    }

    fn eval_expression(&mut self, expr: &Expression, env: &Env) -> Result<Object> {
        match expr {
            Expression::Integer(n) => Ok((*n).into()),
            Expression::Boolean(b) => Ok((*b).into()),
            Expression::String(s) => Ok(s.as_str().into()),
            Expression::Identifier(id) => Ok(eval_identifier(id, env)),
            Expression::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right, env)?;
                eval_prefix_expression(prefix.operator, right)
            }
            Expression::Infix(infix) => {
                // Both sides run before either error is reported; the left one wins.
                let left = self.eval_expression(&infix.left, env);
                let right = self.eval_expression(&infix.right, env);
                eval_infix_expression(infix.operator, left?, right?)
            }
            Expression::Postfix(postfix) => {
                eval_postfix_expression(postfix.operator, &postfix.left, env)
            }
            Expression::Conditional(conditional) => {
                self.eval_conditional_expression(conditional, env)
            }
            Expression::Function(func) => Ok(Object::Function(FunctionObject {
                parameters: func.parameters.clone(),
                body: Rc::clone(&func.body),
                env: Rc::clone(env),
            })),
            Expression::Call(call) => {
                let function = self.eval_expression(&call.function, env)?;
                self.apply_function(function, &call.arguments, env)
            }
            Expression::Array(array) => Ok(self.eval_expressions(&array.elements, env)?.into()),
            Expression::Index(index) => {
                let left = match self.eval_expression(&index.left, env)? {
                    left @ (Object::Array(_) | Object::String(_)) => left,
                    left => {
                        return Err(EvalError::NotIndexable {
                            type_name: left.type_name(),
                        })
                    }
                };
                let index = self.eval_expression(&index.index, env)?;
                eval_index_expression(left, index)
            }
        }
    }

    fn eval_expressions(&mut self, exprs: &[Expression], env: &Env) -> Result<Vec<Object>> {
        exprs
            .iter()
            .map(|expr| self.eval_expression(expr, env))
            .collect()
    }

    fn eval_conditional_expression(
        &mut self,
        conditional: &ast::ConditionalExpression,
        env: &Env,
    ) -> Result<Object> {
        match self.eval_expression(&conditional.condition, env)? {
            Object::Boolean(true) => self.eval_block(&conditional.consequence, env),
            Object::Boolean(false) => match &conditional.alternative {
                Some(alternative) => self.eval_block(alternative, env),
                None => Ok(Object::Null),
            },
            obj => Err(EvalError::NonBooleanCondition {
                construct: "Conditional expression",
                type_name: obj.type_name(),
            }),
        }
    }

    fn apply_function(
        &mut self,
        function: Object,
        arguments: &[Expression],
        env: &Env,
    ) -> Result<Object> {
        match function {
            Object::Builtin(builtin) => {
                let args = self.eval_expressions(arguments, env)?;
                trace!(builtin = builtin.name(), "call");
                builtin.call(args, &mut self.output, self.empty_sequence)
            }
            Object::Function(func) => {
                if func.parameters.len() != arguments.len() {
                    return Err(EvalError::ArityMismatch {
                        formal: func.parameters.len(),
                        actual: arguments.len(),
                    });
                }

                let args = self.eval_expressions(arguments, env)?;
                let mut scope = Environment::new_enclosed(Rc::clone(&func.env));
                for (param, arg) in func.parameters.iter().zip(args) {
                    scope.put(&param.value, arg);
                }
                let scope = scope.into_shared();
                trace!(depth = scope.borrow().depth(), "call");

                Ok(self.eval_block(&func.body, &scope)?.unwrap_return())
            }
            obj => Err(EvalError::NotAFunction {
                type_name: obj.type_name(),
            }),
        }
    }
}

fn eval_identifier(id: &ast::Identifier, env: &Env) -> Object {
    match Builtin::lookup(&id.value) {
        Some(builtin) => Object::Builtin(builtin),
        None => env.borrow().get(&id.value),
    }
}

fn eval_prefix_expression(operator: PrefixOperator, right: Object) -> Result<Object> {
    match (operator, right) {
        (PrefixOperator::Minus, Object::Integer(n)) => Ok(n.wrapping_neg().into()),
        (PrefixOperator::Neg, Object::Boolean(b)) => Ok((!b).into()),
        (operator, right) => Err(EvalError::InvalidPrefixOperand {
            operator,
            operand: right.type_name(),
        }),
    }
}

fn eval_infix_expression(operator: InfixOperator, left: Object, right: Object) -> Result<Object> {
    match (left, right) {
        (Object::Integer(x), Object::Integer(y)) => eval_integer_infix_expression(operator, x, y),
        (Object::Boolean(x), Object::Boolean(y)) => match operator {
            InfixOperator::Eq => Ok((x == y).into()),
            InfixOperator::NEq => Ok((x != y).into()),
            _ => Err(EvalError::binary_op_error("BOOLEAN", operator, "BOOLEAN")),
        },
        (left, right) => Err(EvalError::binary_op_error(
            left.type_name(),
            operator,
            right.type_name(),
        )),
    }
}

fn eval_integer_infix_expression(operator: InfixOperator, left: i32, right: i32) -> Result<Object> {
    Ok(match operator {
        InfixOperator::Plus => left.wrapping_add(right).into(),
        InfixOperator::Minus => left.wrapping_sub(right).into(),
        InfixOperator::Asterisk => left.wrapping_mul(right).into(),
        InfixOperator::Slash => {
            if right == 0 {
                return Err(EvalError::DivisionByZero);
            }
            left.wrapping_div(right).into()
        }
        InfixOperator::LT => (left < right).into(),
        InfixOperator::GT => (left > right).into(),
        InfixOperator::Eq => (left == right).into(),
        InfixOperator::NEq => (left != right).into(),
        InfixOperator::LTEq => (left <= right).into(),
        InfixOperator::GTEq => (left >= right).into(),
    })
}

fn eval_postfix_expression(
    operator: PostfixOperator,
    operand: &Expression,
    env: &Env,
) -> Result<Object> {
    let name = match operand {
        Expression::Identifier(id) => &id.value,
        other => {
            return Err(EvalError::PostfixNotIdentifier {
                operator,
                target: other.to_string(),
            })
        }
    };

    let current = env.borrow().get(name);
    let value = match current {
        Object::Integer(n) => n,
        Object::Null => {
            return Err(EvalError::PostfixUndeclared {
                operator,
                name: name.clone(),
            })
        }
        _ => {
            return Err(EvalError::PostfixNotInteger {
                operator,
                name: name.clone(),
            })
        }
    };

    let updated = match operator {
        PostfixOperator::Increment => value.wrapping_add(1),
        PostfixOperator::Decrement => value.wrapping_sub(1),
    };
    env.borrow_mut().put(name, updated.into());
    Ok(Object::Null)
}

fn eval_index_expression(left: Object, index: Object) -> Result<Object> {
    match (left, index) {
        (Object::Array(a), Object::Integer(i)) => {
            let a = a.borrow();
            let position = resolve_index("Array", a.len(), i)?;
            Ok(a[position].clone())
        }
        (Object::String(s), Object::Integer(i)) => {
            let chars: Vec<char> = s.borrow().chars().collect();
            let position = resolve_index("String", chars.len(), i)?;
            Ok(chars[position].to_string().into())
        }
        (Object::Array(_), index) | (Object::String(_), index) => Err(EvalError::InvalidIndex {
            type_name: index.type_name(),
        }),
        (left, _) => Err(EvalError::NotIndexable {
            type_name: left.type_name(),
        }),
    }
}

/// Maps a possibly negative index onto a position in `0..len`.
fn resolve_index(container: &'static str, len: usize, index: i32) -> Result<usize> {
    let len = len as i64;
    let index = i64::from(index);

    if index >= 0 {
        if index < len {
            Ok(index as usize)
        } else {
            Err(EvalError::IndexOutOfBounds {
                container,
                max: len - 1,
                got: index,
            })
        }
    } else if -index <= len {
        Ok((len + index) as usize)
    } else {
        Err(EvalError::ReverseIndexOutOfBounds {
            container,
            max: len,
            got: -index,
        })
    }
}
