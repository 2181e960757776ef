use crate::object::*;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::convert::TryInto;
use std::io::Write;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum Builtin {
    Print,
    Len,
    First,
    Rest,
    Push,
    Append,
    Pop,
    RemoveLast,
}

/// What `first` and `rest` return for an empty string or array.
#[derive(Debug, Default, Display, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EmptySequence {
    #[default]
    Null,
    Empty,
}

impl EmptySequence {
    fn string(self) -> Object {
        match self {
            Self::Null => Object::Null,
            Self::Empty => "".into(),
        }
    }

    fn array(self) -> Object {
        match self {
            Self::Null => Object::Null,
            Self::Empty => Vec::<Object>::new().into(),
        }
    }
}

lazy_static! {
    pub static ref BUILTINS: HashMap<&'static str, Builtin> =
        Builtin::iter().map(|builtin| (builtin.name(), builtin)).collect();
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        BUILTINS.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn usage(self) -> &'static str {
        match self {
            Self::Print => "print(x -> any, ...) -> null: prints all parameters",
            Self::Len => "len(x -> array|string) -> integer: returns the number of elements in 'x'",
            Self::First => "first(x -> array|string) -> any|string: returns the first element in 'x'",
            Self::Rest => "rest(x -> array|string) -> array|string: returns all the elements in 'x' excluded the first element",
            Self::Push => "push(x -> array|string, y: any) -> array|string: returns a new object with the new element 'y' added as first element of 'x'",
            Self::Append => "append(x -> array|string, y: any) -> array|string: returns a new object with the new element 'y' added as last element of 'x'",
            Self::Pop => "pop(x -> array|string) -> any|string: removes the first element from 'x' and returns it",
            Self::RemoveLast => "removeLast(x -> array|string) -> any|string: removes the last element from 'x' and returns it",
        }
    }

    pub fn call(
        self,
        args: Vec<Object>,
        output: &mut dyn Write,
        empty: EmptySequence,
    ) -> Result<Object> {
        match self {
            Self::Print => print(args, output),
            Self::Len => len(args),
            Self::First => first(args, empty),
            Self::Rest => rest(args, empty),
            Self::Push => push(args),
            Self::Append => append(args),
            Self::Pop => pop(args),
            Self::RemoveLast => remove_last(args),
        }
    }
}

fn arguments<const N: usize>(args: Vec<Object>) -> Result<[Object; N]> {
    let got = args.len();
    args.try_into().map_err(|_| EvalError::IncorrectArity {
        got,
        want: N.to_string(),
    })
}

/// Text a value contributes when joined onto a string.
fn text_of(obj: &Object) -> String {
    match obj {
        Object::String(s) => s.borrow().clone(),
        obj => obj.to_string(),
    }
}

fn print(args: Vec<Object>, output: &mut dyn Write) -> Result<Object> {
    if args.is_empty() {
        return Err(EvalError::IncorrectArity {
            got: 0,
            want: ">= 1".to_owned(),
        });
    }

    for arg in args.iter() {
        writeln!(output, "{}", arg)?;
    }
    Ok(Object::Null)
}

fn len(args: Vec<Object>) -> Result<Object> {
    let [x] = arguments(args)?;

    match x {
        Object::String(s) => Ok(Object::Integer(s.borrow().chars().count() as i32)),
        Object::Array(a) => Ok(Object::Integer(a.borrow().len() as i32)),
        obj => Err(EvalError::UnsupportedArgType {
            type_name: obj.type_name(),
        }),
    }
}

fn first(args: Vec<Object>, empty: EmptySequence) -> Result<Object> {
    let [x] = arguments(args)?;

    match x {
        Object::String(s) => Ok(match s.borrow().chars().next() {
            Some(c) => c.to_string().into(),
            None => empty.string(),
        }),
        Object::Array(a) => Ok(match a.borrow().first() {
            Some(obj) => obj.clone(),
            None => empty.array(),
        }),
        obj => Err(EvalError::UnsupportedArgType {
            type_name: obj.type_name(),
        }),
    }
}

fn rest(args: Vec<Object>, empty: EmptySequence) -> Result<Object> {
    let [x] = arguments(args)?;

    match x {
        Object::String(s) => {
            let s = s.borrow();
            if s.is_empty() {
                Ok(empty.string())
            } else {
                Ok(s.chars().skip(1).collect::<String>().into())
            }
        }
        Object::Array(a) => {
            let a = a.borrow();
            if a.is_empty() {
                Ok(empty.array())
            } else {
                Ok(a[1..].to_vec().into())
            }
        }
        obj => Err(EvalError::UnsupportedArgType {
            type_name: obj.type_name(),
        }),
    }
}

fn push(args: Vec<Object>) -> Result<Object> {
    let [x, y] = arguments(args)?;

    match x {
        Object::String(s) => Ok(format!("{}{}", text_of(&y), s.borrow()).into()),
        Object::Array(a) => {
            let mut elements = Vec::with_capacity(a.borrow().len() + 1);
            elements.push(y);
            elements.extend(a.borrow().iter().cloned());
            Ok(elements.into())
        }
        obj => Err(EvalError::UnsupportedFirstArgType {
            type_name: obj.type_name(),
        }),
    }
}

fn append(args: Vec<Object>) -> Result<Object> {
    let [x, y] = arguments(args)?;

    match x {
        Object::String(s) => Ok(format!("{}{}", s.borrow(), text_of(&y)).into()),
        Object::Array(a) => {
            let mut elements = a.borrow().clone();
            elements.push(y);
            Ok(elements.into())
        }
        obj => Err(EvalError::UnsupportedFirstArgType {
            type_name: obj.type_name(),
        }),
    }
}

fn pop(args: Vec<Object>) -> Result<Object> {
    let [x] = arguments(args)?;

    match x {
        Object::String(s) => {
            let mut s = s.borrow_mut();
            if s.is_empty() {
                Ok(Object::Null)
            } else {
                Ok(s.remove(0).to_string().into())
            }
        }
        Object::Array(a) => {
            let mut a = a.borrow_mut();
            if a.is_empty() {
                Ok(Object::Null)
            } else {
                Ok(a.remove(0))
            }
        }
        obj => Err(EvalError::UnsupportedFirstArgType {
            type_name: obj.type_name(),
        }),
    }
}

fn remove_last(args: Vec<Object>) -> Result<Object> {
    let [x] = arguments(args)?;

    match x {
        Object::String(s) => Ok(s
            .borrow_mut()
            .pop()
            .map_or(Object::Null, |c| c.to_string().into())),
        Object::Array(a) => Ok(a.borrow_mut().pop().unwrap_or_default()),
        obj => Err(EvalError::UnsupportedFirstArgType {
            type_name: obj.type_name(),
        }),
    }
}
