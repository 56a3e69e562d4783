//! Small expression language shipped with the binary so the session is usable
//! end to end. The session itself only sees it through [`crate::runtime::Runtime`].

mod builtins;
mod interp;
mod lexer;
mod parser;

pub use interp::Interpreter;
pub use parser::{BinaryOp, Expr};
