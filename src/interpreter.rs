use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{LoxClass, LoxInstance};
use crate::diagnostics::{Diagnostics, RuntimeError};
use crate::environment::Environment;
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, GetData, GroupingData, LiteralValue, LogicalData, SetData,
    SuperData, ThisData, UnaryData, VariableData,
};
use crate::function::{self, LoxFunction, NativeFunction};
use crate::stmt::{
    BlockData, ClassData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt, StmtVisitor, VarData,
    WhileData,
};
use crate::token::{Token, TokenKind};
use crate::value::{stringify_number, Callable, Value};

/// The two ways executing a statement can fail to fall off the end
/// normally: a genuine runtime error, or a `return` unwinding out of a
/// function body. Kept as distinct variants rather than folding `return`
/// into the error channel, since a `return` is not a failure.
pub enum ExecOutcome {
    Error(RuntimeError),
    Return(Value),
}

impl From<RuntimeError> for ExecOutcome {
    fn from(error: RuntimeError) -> Self {
        ExecOutcome::Error(error)
    }
}

type EvalResult = Result<Value, RuntimeError>;
type ExecResult = Result<(), ExecOutcome>;

/// Walks the AST directly, dispatching through the `accept`/visitor
/// machinery shared with the resolver. Owns `globals` and the currently
/// active `environment`; `locals` is the scope-depth table the resolver
/// populates via `resolve`.
pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<u32, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new(None)));
        globals.borrow_mut().define(
            "clock",
            Value::Native(Rc::new(NativeFunction { name: "clock", arity: 0, function: function::clock })),
        );

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), output }
    }

    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            if let Err(outcome) = self.execute(statement) {
                match outcome {
                    ExecOutcome::Error(error) => {
                        diagnostics.runtime_error(&error);
                        return;
                    }
                    ExecOutcome::Return(_) => unreachable!("top-level code cannot resolve with a pending return"),
                }
            }
        }
    }

    pub fn resolve(&mut self, id: u32, depth: usize) {
        self.locals.insert(id, depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    fn lookup_variable(&mut self, id: u32, name: &Token) -> EvalResult {
        match self.locals.get(&id) {
            Some(&depth) => Environment::get_at(&self.environment, depth, name),
            None => Environment::get(&self.globals, name),
        }
    }

    fn stringify(value: &Value) -> String {
        match value {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => stringify_number(*n),
            Value::String(s) => s.to_string(),
            other => other.to_string(),
        }
    }

    fn call_value(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> EvalResult {
        let arity;
        let result = match &callee {
            Value::Function(function) => {
                arity = function.arity();
                if arguments.len() != arity {
                    return Err(arity_error(paren, arity, arguments.len()));
                }
                function.call(self, arguments)
            }
            Value::Native(native) => {
                arity = native.arity();
                if arguments.len() != arity {
                    return Err(arity_error(paren, arity, arguments.len()));
                }
                native.call(self, arguments)
            }
            Value::Class(class) => {
                arity = class.arity();
                if arguments.len() != arity {
                    return Err(arity_error(paren, arity, arguments.len()));
                }
                class.call(self, arguments)
            }
            _ => return Err(RuntimeError { token: paren.clone(), message: "Can only call functions and classes.".to_string() }),
        };
        result
    }
}

fn arity_error(paren: &Token, expected: usize, got: usize) -> RuntimeError {
    RuntimeError { token: paren.clone(), message: format!("Expected {expected} arguments but got {got}.") }
}

fn is_number(token: &Token, value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError { token: token.clone(), message: "Operand must be a number.".to_string() }),
    }
}

fn are_numbers(token: &Token, left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError { token: token.clone(), message: "Operands must be numbers.".to_string() }),
    }
}

impl ExprVisitor<EvalResult> for Interpreter {
    fn visit_literal_expr(&mut self, data: &LiteralValue) -> EvalResult {
        Ok(match data {
            LiteralValue::Nil => Value::Nil,
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::String(s) => Value::from(s.as_str()),
        })
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> EvalResult {
        let right = self.evaluate(&data.right)?;
        match data.operator.kind {
            TokenKind::Minus => Ok(Value::Number(-is_number(&data.operator, &right)?)),
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("parser only produces ! and - as unary operators"),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> EvalResult {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let op = &data.operator;

        match op.kind {
            TokenKind::Minus => {
                let (a, b) = are_numbers(op, &left, &right)?;
                Ok(Value::Number(a - b))
            }
            TokenKind::Slash => {
                let (a, b) = are_numbers(op, &left, &right)?;
                Ok(Value::Number(a / b))
            }
            TokenKind::Star => {
                let (a, b) = are_numbers(op, &left, &right)?;
                Ok(Value::Number(a * b))
            }
            TokenKind::Greater => {
                let (a, b) = are_numbers(op, &left, &right)?;
                Ok(Value::Bool(a > b))
            }
            TokenKind::GreaterEqual => {
                let (a, b) = are_numbers(op, &left, &right)?;
                Ok(Value::Bool(a >= b))
            }
            TokenKind::Less => {
                let (a, b) = are_numbers(op, &left, &right)?;
                Ok(Value::Bool(a < b))
            }
            TokenKind::LessEqual => {
                let (a, b) = are_numbers(op, &left, &right)?;
                Ok(Value::Bool(a <= b))
            }
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::from(format!("{a}{b}"))),
                _ => Err(RuntimeError {
                    token: op.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            TokenKind::BangEqual => Ok(Value::Bool(left != right)),
            TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
            _ => unreachable!("parser only produces arithmetic/comparison/equality operators in Binary"),
        }
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> EvalResult {
        self.evaluate(&data.expr)
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> EvalResult {
        self.lookup_variable(data.id, &data.name)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> EvalResult {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&depth) => Environment::assign_at(&self.environment, depth, &data.name, value.clone()),
            None => Environment::assign(&self.globals, &data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> EvalResult {
        let left = self.evaluate(&data.left)?;

        if data.operator.kind == TokenKind::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&data.right)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> EvalResult {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        self.call_value(callee, &data.paren, arguments)
    }

    fn visit_get_expr(&mut self, data: &GetData) -> EvalResult {
        let object = self.evaluate(&data.object)?;
        match object {
            Value::Instance(instance) => LoxInstance::get(&instance, &data.name),
            _ => Err(RuntimeError { token: data.name.clone(), message: "Only instances have properties.".to_string() }),
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> EvalResult {
        let object = self.evaluate(&data.object)?;
        match object {
            Value::Instance(instance) => {
                let value = self.evaluate(&data.value)?;
                instance.borrow_mut().set(&data.name, value.clone());
                Ok(value)
            }
            _ => Err(RuntimeError { token: data.name.clone(), message: "Only instances have properties.".to_string() }),
        }
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> EvalResult {
        self.lookup_variable(data.id, &data.keyword)
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> EvalResult {
        let distance = *self.locals.get(&data.id).expect("resolver always binds 'super' to a depth");

        let superclass = Environment::get_at_named(&self.environment, distance, "super")
            .expect("resolver-created 'super' scope to hold a class value");
        let instance = Environment::get_at_named(&self.environment, distance - 1, "this")
            .expect("resolver-created 'this' scope to hold an instance value");

        let superclass = match superclass {
            Value::Class(class) => class,
            _ => unreachable!("the resolver only ever binds a class value to 'super'"),
        };

        match superclass.find_method(&data.method.lexeme) {
            Some(method) => Ok(Value::Function(Rc::new(method.bind(instance)))),
            None => Err(RuntimeError {
                token: data.method.clone(),
                message: format!("Undefined property '{}'.", data.method.lexeme),
            }),
        }
    }
}

impl StmtVisitor<ExecResult> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> ExecResult {
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> ExecResult {
        let value = self.evaluate(&data.expr)?;
        let _ = writeln!(self.output, "{}", Self::stringify(&value));
        Ok(())
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> ExecResult {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Value::Nil,
        };
        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> ExecResult {
        let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, scope)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> ExecResult {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> ExecResult {
        while self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.body)?;
        }
        Ok(())
    }

    fn visit_function_stmt(&mut self, data: &Rc<FunctionData>) -> ExecResult {
        let function = LoxFunction::new(Rc::clone(data), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Value::Function(Rc::new(function)));
        Ok(())
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> ExecResult {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Value::Nil,
        };
        Err(ExecOutcome::Return(value))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> ExecResult {
        let superclass = match &data.superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    let token = match expr {
                        Expr::Variable(v) => v.name.clone(),
                        _ => unreachable!("parser only ever produces a Variable for a superclass expression"),
                    };
                    return Err(ExecOutcome::Error(RuntimeError {
                        token,
                        message: "Superclass must be a class.".to_string(),
                    }));
                }
            },
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Value::Nil);

        if let Some(superclass) = &superclass {
            let scope = Environment::new(Some(Rc::clone(&self.environment)));
            self.environment = Rc::new(RefCell::new(scope));
            self.environment.borrow_mut().define("super", Value::Class(Rc::clone(superclass)));
        }

        let mut methods = HashMap::new();
        for method in &data.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = LoxFunction::new(Rc::clone(method), Rc::clone(&self.environment), is_initializer);
            methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = LoxClass::new(data.name.lexeme.clone(), superclass.clone(), methods);

        if superclass.is_some() {
            let enclosing = self.environment.borrow().enclosing.clone().expect("super scope always has an enclosing scope");
            self.environment = enclosing;
        }

        Environment::assign(&self.environment, &data.name, Value::Class(Rc::new(class)))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::parser::Parser;
    use crate::resolver::Resolver;
    use crate::scanner::Scanner;

    fn run_capturing(source: &str) -> String {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);

        let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        struct SharedWriter(Rc<RefCell<Vec<u8>>>);
        impl Write for SharedWriter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().write(buf)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut interpreter = Interpreter::new(Box::new(SharedWriter(Rc::clone(&buffer))));
        Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);
        assert!(!diagnostics.had_error(), "program failed to resolve");
        interpreter.interpret(&statements, &mut diagnostics);
        assert!(!diagnostics.had_runtime_error(), "program raised a runtime error");

        let bytes = buffer.borrow().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn arithmetic_and_print() {
        assert_eq!(run_capturing("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run_capturing("var a = \"Hello, \"; var b = \"world\"; print a + b;"), "Hello, world\n");
    }

    #[test]
    fn closures_capture_by_reference() {
        let source = "fun makeCounter() { var i = 0; fun count() { i = i + 1; print i; } return count; }\nvar c = makeCounter(); c(); c(); c();";
        assert_eq!(run_capturing(source), "1\n2\n3\n");
    }

    #[test]
    fn resolver_shadowing_canonical_example() {
        let source = "var a = \"global\";\n{ fun showA() { print a; } showA(); var a = \"block\"; showA(); }";
        assert_eq!(run_capturing(source), "global\nglobal\n");
    }

    #[test]
    fn inheritance_and_super() {
        let source = "class A { method() { print \"A\"; } }\nclass B < A { method() { super.method(); print \"B\"; } }\nB().method();";
        assert_eq!(run_capturing(source), "A\nB\n");
    }

    #[test]
    fn initializer_returns_this() {
        let source = "class P { init(x) { this.x = x; } }\nprint P(7).x;";
        assert_eq!(run_capturing(source), "7\n");
    }

    #[test]
    fn division_by_zero_produces_infinity_not_an_error() {
        assert_eq!(run_capturing("print 1 / 0;"), "inf\n");
    }

    #[test]
    fn calling_with_wrong_arity_is_a_runtime_error() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("fun f(a) { return a; } f(1, 2);").scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);
        let mut interpreter = Interpreter::new(Box::new(std::io::sink()));
        Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);
        interpreter.interpret(&statements, &mut diagnostics);
        assert!(diagnostics.had_runtime_error());
    }
}
