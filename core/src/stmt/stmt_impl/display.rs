use std::fmt::{self, Display};

use super::{AssignTarget, Program, Stmt};

impl Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignTarget::Var(name) => write!(f, "{name}"),
            AssignTarget::Field(e, name) => write!(f, "{e}.{name}"),
            AssignTarget::Index(e, idx) => write!(f, "{e}[{idx}]"),
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Var { name, init } => match init {
                Some(e) => write!(f, "var {name} = {e};"),
                None => write!(f, "var {name};"),
            },
            Stmt::Assign { target, value } => write!(f, "{target} = {value};"),
            Stmt::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                write!(f, "if ({condition}) {then_stmt}")?;
                if let Some(else_stmt) = else_stmt {
                    write!(f, " else {else_stmt}")?;
                }
                Ok(())
            }
            Stmt::While { condition, body } => write!(f, "while ({condition}) {body}"),
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                write!(f, "for (")?;
                if let Some(init) = init {
                    write!(f, "{init}")?;
                } else {
                    write!(f, ";")?;
                }
                match condition {
                    Some(c) => write!(f, " {c};")?,
                    None => write!(f, " ;")?,
                }
                if let Some(update) = update {
                    // trailing ';' of the update statement stays inside the header
                    write!(f, " {update}")?;
                }
                write!(f, ") {body}")
            }
            Stmt::Block(stmts) => {
                write!(f, "{{ ")?;
                for stmt in stmts {
                    write!(f, "{stmt} ")?;
                }
                write!(f, "}}")
            }
            Stmt::Break => write!(f, "break;"),
            Stmt::Continue => write!(f, "continue;"),
            Stmt::Return { value } => match value {
                Some(e) => write!(f, "return {e};"),
                None => write!(f, "return;"),
            },
            Stmt::Try { body, catch, finally } => {
                write!(f, "try {body}")?;
                if let Some(catch) = catch {
                    write!(f, " catch ({}) {}", catch.name, catch.body)?;
                }
                if let Some(finally) = finally {
                    write!(f, " finally {finally}")?;
                }
                Ok(())
            }
            Stmt::Throw { value } => write!(f, "throw {value};"),
            Stmt::Expr(e) => write!(f, "{e};"),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            writeln!(f, "{stmt}")?;
        }
        Ok(())
    }
}
