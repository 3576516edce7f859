use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::diagnostics::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// A single lexical scope: a name-to-value map plus a link to the enclosing
/// scope. Forms the chain block scopes, function activations, and the
/// implicit `this`/`super` scopes are all built from. Shared via
/// `Rc<RefCell<_>>` since a closure's captured environment may outlive the
/// stack frame that created it and may be referenced by more than one live
/// activation at once.
#[derive(Debug)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, values: HashMap::new() }
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let parent = current
                .borrow()
                .enclosing
                .clone()
                .expect("resolver-computed distance to stay within the environment chain");
            current = parent;
        }
        current
    }

    pub fn get(env: &Rc<RefCell<Environment>>, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = env.borrow().values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &env.borrow().enclosing {
            Some(enclosing) => Environment::get(enclosing, name),
            None => Err(RuntimeError {
                token: name.clone(),
                message: format!("Undefined variable '{}'.", name.lexeme),
            }),
        }
    }

    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Value, RuntimeError> {
        Environment::ancestor(env, distance)
            .borrow()
            .values
            .get(&name.lexeme)
            .cloned()
            .ok_or_else(|| RuntimeError {
                token: name.clone(),
                message: format!("Undefined variable '{}'.", name.lexeme),
            })
    }

    /// Reads a binding by raw name rather than by token, for the interpreter's
    /// internal `this`/`super` lookups where there is no source token handy.
    pub fn get_at_named(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Option<Value> {
        Environment::ancestor(env, distance).borrow().values.get(name).cloned()
    }

    pub fn assign(env: &Rc<RefCell<Environment>>, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if env.borrow().values.contains_key(&name.lexeme) {
            env.borrow_mut().values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        let enclosing = env.borrow().enclosing.clone();
        match enclosing {
            Some(enclosing) => Environment::assign(&enclosing, name, value),
            None => Err(RuntimeError {
                token: name.clone(),
                message: format!("Undefined variable '{}'.", name.lexeme),
            }),
        }
    }

    pub fn assign_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token, value: Value) {
        Environment::ancestor(env, distance).borrow_mut().values.insert(name.lexeme.clone(), value);
    }
}
