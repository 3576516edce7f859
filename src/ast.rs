//! A debugging aid, not part of the language pipeline: serializes an `Expr`
//! tree back to parenthesized Lisp-like text. Useful from a REPL or a test
//! to eyeball what the parser actually built.

use crate::expr::{
    AssignData, BinaryData, CallData, Expr, ExprVisitor, GetData, GroupingData, LiteralValue, LogicalData, SetData,
    SuperData, ThisData, UnaryData, VariableData,
};

pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        expr.accept(&mut AstPrinter)
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({name}");
        for expr in exprs {
            out.push(' ');
            out.push_str(&expr.accept(self));
        }
        out.push(')');
        out
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_literal_expr(&mut self, data: &LiteralValue) -> String {
        match data {
            LiteralValue::Nil => "nil".to_string(),
            LiteralValue::Bool(b) => b.to_string(),
            LiteralValue::Number(n) => n.to_string(),
            LiteralValue::String(s) => s.clone(),
        }
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> String {
        self.parenthesize(&data.operator.lexeme, &[&data.right])
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> String {
        self.parenthesize(&data.operator.lexeme, &[&data.left, &data.right])
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> String {
        self.parenthesize("group", &[&data.expr])
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> String {
        data.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> String {
        self.parenthesize(&format!("= {}", data.name.lexeme), &[&data.value])
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> String {
        self.parenthesize(&data.operator.lexeme, &[&data.left, &data.right])
    }

    fn visit_call_expr(&mut self, data: &CallData) -> String {
        let mut exprs = vec![&*data.callee];
        exprs.extend(data.arguments.iter());
        self.parenthesize("call", &exprs)
    }

    fn visit_get_expr(&mut self, data: &GetData) -> String {
        self.parenthesize(&format!(". {}", data.name.lexeme), &[&data.object])
    }

    fn visit_set_expr(&mut self, data: &SetData) -> String {
        self.parenthesize(&format!("set {}", data.name.lexeme), &[&data.object, &data.value])
    }

    fn visit_this_expr(&mut self, _data: &ThisData) -> String {
        "this".to_string()
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> String {
        format!("(super {})", data.method.lexeme)
    }
}
