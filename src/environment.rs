use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    /// Create a scope whose lookups fall back to `outer`.
    pub fn new_enclosed(outer: Env) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn into_shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }

    /// Unbound names read as `Null`.
    pub fn get(&self, name: &str) -> Object {
        match self.store.get(name) {
            Some(obj) => obj.clone(),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(name),
                None => Object::Null,
            },
        }
    }

    pub fn put(&mut self, name: &str, value: Object) {
        self.store.insert(name.to_owned(), value);
    }

    pub fn depth(&self) -> usize {
        match &self.outer {
            Some(parent_env) => 1 + parent_env.borrow().depth(),
            None => 1,
        }
    }
}
