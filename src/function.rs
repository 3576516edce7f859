use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::diagnostics::RuntimeError;
use crate::environment::Environment;
use crate::interpreter::{ExecOutcome, Interpreter};
use crate::stmt::FunctionData;
use crate::value::{Callable, Value};

/// A user-defined function or method, paired with the environment that was
/// active at its declaration site (its closure). `is_initializer` is set for
/// methods literally named `init`, which implicitly return `this` regardless
/// of what (if anything) their `return` statements carry.
#[derive(Clone)]
pub struct LoxFunction {
    declaration: Rc<FunctionData>,
    closure: Rc<RefCell<Environment>>,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionData>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        LoxFunction { declaration, closure, is_initializer }
    }

    /// Returns a new function whose closure is a fresh scope, chained off
    /// this function's own closure, containing only `this = instance`. Used
    /// to turn an unbound method lookup into a callable bound to its
    /// receiver.
    pub fn bind(&self, instance: Value) -> LoxFunction {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);

        LoxFunction {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(environment)),
            is_initializer: self.is_initializer,
        }
    }

    fn this_at_zero(&self) -> Value {
        Environment::get_at_named(&self.closure, 0, "this")
            .expect("bound method's closure to define 'this'")
    }
}

impl Callable for LoxFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => Ok(if self.is_initializer { self.this_at_zero() } else { Value::Nil }),
            Err(ExecOutcome::Return(value)) => {
                Ok(if self.is_initializer { self.this_at_zero() } else { value })
            }
            Err(ExecOutcome::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

impl Debug for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// A host-implemented builtin, identified by name. Lox defines exactly one:
/// `clock`, returning wall-clock seconds as a double.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

pub fn clock(_interpreter: &mut Interpreter, _arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();
    Ok(Value::Number(now))
}
