use crate::ast;
use crate::builtins::Builtin;
use crate::environment::Env;
use std::cell::RefCell;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

mod eval_error;
pub use eval_error::EvalError;

pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Integer(i32),
    Boolean(bool),
    String(Rc<RefCell<String>>),
    Array(Rc<RefCell<Vec<Object>>>),
    Function(FunctionObject),
    Builtin(Builtin),
    ReturnValue(Box<Object>),
    Error(EvalError),
    Null,
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::String(s) => write!(f, "\"{}\"", s.borrow()),
            Self::Array(a) => {
                let elements: Vec<String> = a.borrow().iter().map(Object::to_string).collect();

                write!(f, "[{}]", elements.join(","))
            }
            Self::Function(func) => write!(f, "{}", func),
            Self::Builtin(builtin) => write!(f, "{}", builtin.usage()),
            Self::ReturnValue(obj) => write!(f, "return {}", obj),
            Self::Error(err) => write!(f, "{}", err),
            Self::Null => write!(f, "null"),
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::Null
    }
}

impl From<i32> for Object {
    fn from(n: i32) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Self::String(Rc::new(RefCell::new(s)))
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<Vec<Object>> for Object {
    fn from(a: Vec<Object>) -> Self {
        Self::Array(Rc::new(RefCell::new(a)))
    }
}

impl From<EvalError> for Object {
    fn from(err: EvalError) -> Self {
        Self::Error(err)
    }
}

impl Object {
    pub fn unwrap_return(self) -> Self {
        match self {
            Self::ReturnValue(o) => *o,
            obj => obj,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Boolean(_) => "BOOLEAN",
            Self::String(_) => "STRING",
            Self::Array(_) => "ARRAY",
            Self::Function(_) => "FUNCTION",
            Self::Builtin(_) => "BUILTIN",
            Self::ReturnValue(_) => "RETURN",
            Self::Error(_) => "ERROR",
            Self::Null => "NULL",
        }
    }
}

/// A user function together with the environment it was defined in.
#[derive(Clone)]
pub struct FunctionObject {
    pub parameters: Vec<ast::Identifier>,
    pub body: Rc<ast::BlockStatement>,
    pub env: Env,
}

impl Display for FunctionObject {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let identifier_names: Vec<String> = self
            .parameters
            .iter()
            .map(ast::Identifier::to_string)
            .collect();

        write!(f, "fn ({}) {}", identifier_names.join(","), self.body)
    }
}

// The captured environment usually contains the function itself.
impl Debug for FunctionObject {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("FunctionObject")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl PartialEq for FunctionObject {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && Rc::ptr_eq(&self.body, &other.body)
            && Rc::ptr_eq(&self.env, &other.env)
    }
}
