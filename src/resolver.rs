use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, ResolveError};
use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, GetData, GroupingData, LiteralValue, LogicalData, SetData,
    SuperData, ThisData, UnaryData, VariableData,
};
use crate::interpreter::Interpreter;
use crate::stmt::{
    BlockData, ClassData, ExpressionData, FunctionData, IfData, PrintData, ReturnData, Stmt, StmtVisitor, VarData,
    WhileData,
};
use crate::token::Token;

#[derive(PartialEq, Clone, Copy)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(PartialEq, Clone, Copy)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Static lexical-scope analysis: a second pass over the AST that records,
/// for every variable reference, how many enclosing scopes to walk out to
/// find its binding. Reports errors the scanner/parser cannot catch because
/// they depend on scope structure, not just syntax.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            self.resolve_stmt(statement, diagnostics);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt, diagnostics: &mut Diagnostics) {
        stmt.accept(&mut Binder { resolver: self, diagnostics });
    }

    fn resolve_expr(&mut self, expr: &Expr, diagnostics: &mut Diagnostics) {
        expr.accept(&mut Binder { resolver: self, diagnostics });
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token, diagnostics: &mut Diagnostics) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                diagnostics.resolve_error(&ResolveError {
                    token: name.clone(),
                    message: "Already a variable with this name in this scope.".to_string(),
                });
            }
            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: u32, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, depth);
                return;
            }
        }
        // Not found in any scope: treated as global, left unresolved.
    }

    fn resolve_function(&mut self, data: &FunctionData, kind: FunctionType, diagnostics: &mut Diagnostics) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &data.params {
            self.declare(param, diagnostics);
            self.define(param);
        }
        self.resolve(&data.body, diagnostics);
        self.end_scope();

        self.current_function = enclosing_function;
    }
}

/// Implements the visitor traits on behalf of the resolver so `resolve_stmt`
/// / `resolve_expr` can dispatch through the same `accept` machinery the
/// interpreter uses, without the resolver itself needing to hold the
/// diagnostics sink across the whole pass.
struct Binder<'a, 'b> {
    resolver: &'a mut Resolver<'b>,
    diagnostics: &'a mut Diagnostics,
}

impl StmtVisitor<()> for Binder<'_, '_> {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) {
        self.resolver.resolve_expr(&data.expr, self.diagnostics);
    }

    fn visit_print_stmt(&mut self, data: &PrintData) {
        self.resolver.resolve_expr(&data.expr, self.diagnostics);
    }

    fn visit_var_stmt(&mut self, data: &VarData) {
        self.resolver.declare(&data.name, self.diagnostics);
        if let Some(initializer) = &data.initializer {
            self.resolver.resolve_expr(initializer, self.diagnostics);
        }
        self.resolver.define(&data.name);
    }

    fn visit_block_stmt(&mut self, data: &BlockData) {
        self.resolver.begin_scope();
        self.resolver.resolve(&data.statements, self.diagnostics);
        self.resolver.end_scope();
    }

    fn visit_if_stmt(&mut self, data: &IfData) {
        self.resolver.resolve_expr(&data.condition, self.diagnostics);
        self.resolver.resolve_stmt(&data.then_branch, self.diagnostics);
        if let Some(else_branch) = &data.else_branch {
            self.resolver.resolve_stmt(else_branch, self.diagnostics);
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) {
        self.resolver.resolve_expr(&data.condition, self.diagnostics);
        self.resolver.resolve_stmt(&data.body, self.diagnostics);
    }

    fn visit_function_stmt(&mut self, data: &std::rc::Rc<FunctionData>) {
        self.resolver.declare(&data.name, self.diagnostics);
        self.resolver.define(&data.name);
        self.resolver.resolve_function(data, FunctionType::Function, self.diagnostics);
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) {
        if self.resolver.current_function == FunctionType::None {
            self.diagnostics.resolve_error(&ResolveError {
                token: data.keyword.clone(),
                message: "Can't return from top-level code.".to_string(),
            });
        }

        if let Some(value) = &data.value {
            if self.resolver.current_function == FunctionType::Initializer {
                self.diagnostics.resolve_error(&ResolveError {
                    token: data.keyword.clone(),
                    message: "Can't return a value from an initializer.".to_string(),
                });
            }
            self.resolver.resolve_expr(value, self.diagnostics);
        }
    }

    fn visit_class_stmt(&mut self, data: &ClassData) {
        let enclosing_class = self.resolver.current_class;
        self.resolver.current_class = ClassType::Class;

        self.resolver.declare(&data.name, self.diagnostics);
        self.resolver.define(&data.name);

        if let Some(Expr::Variable(superclass)) = &data.superclass {
            if superclass.name.lexeme == data.name.lexeme {
                self.diagnostics.resolve_error(&ResolveError {
                    token: superclass.name.clone(),
                    message: "A class can't inherit from itself.".to_string(),
                });
            }
            self.resolver.current_class = ClassType::Subclass;
            self.resolver.resolve_expr(data.superclass.as_ref().unwrap(), self.diagnostics);
        }

        if data.superclass.is_some() {
            self.resolver.begin_scope();
            self.resolver.scopes.last_mut().unwrap().insert("super".to_string(), true);
        }

        self.resolver.begin_scope();
        self.resolver.scopes.last_mut().unwrap().insert("this".to_string(), true);

        for method in &data.methods {
            let kind = if method.name.lexeme == "init" { FunctionType::Initializer } else { FunctionType::Method };
            self.resolver.resolve_function(method, kind, self.diagnostics);
        }

        self.resolver.end_scope();

        if data.superclass.is_some() {
            self.resolver.end_scope();
        }

        self.resolver.current_class = enclosing_class;
    }
}

impl ExprVisitor<()> for Binder<'_, '_> {
    fn visit_literal_expr(&mut self, _data: &LiteralValue) {}

    fn visit_unary_expr(&mut self, data: &UnaryData) {
        self.resolver.resolve_expr(&data.right, self.diagnostics);
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) {
        self.resolver.resolve_expr(&data.left, self.diagnostics);
        self.resolver.resolve_expr(&data.right, self.diagnostics);
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) {
        self.resolver.resolve_expr(&data.expr, self.diagnostics);
    }

    fn visit_variable_expr(&mut self, data: &VariableData) {
        if let Some(scope) = self.resolver.scopes.last() {
            if scope.get(&data.name.lexeme) == Some(&false) {
                self.diagnostics.resolve_error(&ResolveError {
                    token: data.name.clone(),
                    message: "Cannot read local variable in its own initializer.".to_string(),
                });
            }
        }
        self.resolver.resolve_local(data.id, &data.name);
    }

    fn visit_assign_expr(&mut self, data: &AssignData) {
        self.resolver.resolve_expr(&data.value, self.diagnostics);
        self.resolver.resolve_local(data.id, &data.name);
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) {
        self.resolver.resolve_expr(&data.left, self.diagnostics);
        self.resolver.resolve_expr(&data.right, self.diagnostics);
    }

    fn visit_call_expr(&mut self, data: &CallData) {
        self.resolver.resolve_expr(&data.callee, self.diagnostics);
        for argument in &data.arguments {
            self.resolver.resolve_expr(argument, self.diagnostics);
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) {
        self.resolver.resolve_expr(&data.object, self.diagnostics);
    }

    fn visit_set_expr(&mut self, data: &SetData) {
        self.resolver.resolve_expr(&data.value, self.diagnostics);
        self.resolver.resolve_expr(&data.object, self.diagnostics);
    }

    fn visit_this_expr(&mut self, data: &ThisData) {
        if self.resolver.current_class == ClassType::None {
            self.diagnostics.resolve_error(&ResolveError {
                token: data.keyword.clone(),
                message: "Can't use 'this' outside of a class.".to_string(),
            });
            return;
        }
        self.resolver.resolve_local(data.id, &data.keyword);
    }

    fn visit_super_expr(&mut self, data: &SuperData) {
        match self.resolver.current_class {
            ClassType::None => {
                self.diagnostics.resolve_error(&ResolveError {
                    token: data.keyword.clone(),
                    message: "Can't use 'super' outside of a class.".to_string(),
                });
                return;
            }
            ClassType::Class => {
                self.diagnostics.resolve_error(&ResolveError {
                    token: data.keyword.clone(),
                    message: "Can't use 'super' in a class with no superclass.".to_string(),
                });
                return;
            }
            ClassType::Subclass => {}
        }
        self.resolver.resolve_local(data.id, &data.keyword);
    }
}
