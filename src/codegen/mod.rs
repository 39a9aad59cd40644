//! Python emission from the program tree.
//!
//! Output is plain Python 3: four-space indentation, `pass` in empty bodies,
//! and type hints on declarations that carried an annotation.

use crate::parser::ast::{Expr, Program, Statement, UnOp, Value};

pub struct PythonGenerator {
    indent: usize,
}

impl Default for PythonGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonGenerator {
    pub fn new() -> Self {
        PythonGenerator { indent: 0 }
    }

    pub fn generate(&mut self, program: &Program) -> String {
        let mut lines = Vec::new();
        for statement in &program.statements {
            self.emit_statement(statement, &mut lines);
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn push_line(&self, lines: &mut Vec<String>, text: String) {
        if text.is_empty() {
            lines.push(text);
        } else {
            lines.push(format!("{}{}", "    ".repeat(self.indent), text));
        }
    }

    fn emit_statement(&mut self, statement: &Statement, lines: &mut Vec<String>) {
        match statement {
            Statement::VariableDeclaration {
                name,
                var_type,
                value,
            } => {
                let line = match var_type {
                    Some(tag) => {
                        format!("{}: {} = {}", name, tag.python_hint(), self.expr(value))
                    }
                    None => format!("{} = {}", name, self.expr(value)),
                };
                self.push_line(lines, line);
            }
            Statement::Assignment { name, value } => {
                self.push_line(lines, format!("{} = {}", name, self.expr(value)));
            }
            Statement::ForLoop {
                item,
                iterable,
                body,
            } => {
                self.push_line(lines, format!("for {} in {}:", item, self.expr(iterable)));
                self.emit_body(body, lines);
            }
            Statement::WhileLoop { condition, body } => {
                self.push_line(lines, format!("while {}:", self.expr(condition)));
                self.emit_body(body, lines);
            }
            Statement::RepeatLoop { count, body } => {
                self.push_line(lines, format!("for _ in range({}):", self.expr(count)));
                self.emit_body(body, lines);
            }
        }
    }

    fn emit_body(&mut self, body: &[Statement], lines: &mut Vec<String>) {
        self.indent += 1;
        if body.is_empty() {
            self.push_line(lines, "pass".to_string());
        } else {
            for statement in body {
                self.emit_statement(statement, lines);
            }
        }
        self.indent -= 1;
    }

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(value) => self.value(value),
            Expr::Identifier(name) => name.clone(),
            Expr::Binary { left, op, right } => {
                format!("{} {} {}", self.expr(left), op.python(), self.expr(right))
            }
            Expr::Unary { op, operand } => match op {
                UnOp::Not => format!("not {}", self.expr(operand)),
                UnOp::Negate => format!("-{}", self.expr(operand)),
            },
            Expr::List { elements } => {
                let parts: Vec<String> = elements.iter().map(|e| self.expr(e)).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }

    fn value(&self, value: &Value) -> String {
        match value {
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => {
                // Keep a decimal point so the literal stays a Python float
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{:.1}", f)
                } else {
                    f.to_string()
                }
            }
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Str(s) => python_str(s),
        }
    }
}

/// Single-quoted Python string literal with the escapes the lexer decoded.
fn python_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
