//! Tree-walking interpreter behind the [`Runtime`] boundary.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::lang::builtins;
use crate::lang::parser::{parse_program, BinaryOp, Expr};
use crate::runtime::{
    BuiltinFunction, EvaluationResult, ParseOutcome, RelayReader, Runtime, RuntimeValue,
};

type EvalResult = Result<RuntimeValue, String>;

/// The reference runtime: global bindings and a relay-fed stdin.
///
/// Locks are held only for the duration of a single access so that the UI
/// thread can query the environment while a program sleeps or waits on input.
#[derive(Debug)]
pub struct Interpreter {
    env: Mutex<BTreeMap<String, RuntimeValue>>,
    stdin: Mutex<RelayReader>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Interpreter {
    pub fn new(stdin: RelayReader) -> Self {
        Self {
            env: Mutex::new(BTreeMap::new()),
            stdin: Mutex::new(stdin),
        }
    }

    fn frame(&self, reads_stdin: bool) -> Frame<'_> {
        Frame {
            interp: self,
            stdout: RefCell::new(String::new()),
            reads_stdin,
        }
    }
}

/// State of one `run` or sub-expression evaluation.
///
/// Captured output lives here rather than on the interpreter, so an abandoned
/// run can never write into a later one.
pub(crate) struct Frame<'a> {
    interp: &'a Interpreter,
    stdout: RefCell<String>,
    /// False while evaluating for completion; `stdin()` then yields null.
    reads_stdin: bool,
}

impl Frame<'_> {
    pub(crate) fn write_output(&self, text: &str) {
        self.stdout.borrow_mut().push_str(text);
    }

    pub(crate) fn read_input_line(&self) -> Option<String> {
        if !self.reads_stdin {
            return None;
        }
        lock(&self.interp.stdin).read_line()
    }

    fn eval(&self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Number(n) => Ok(RuntimeValue::Number(*n)),
            Expr::Str(s) => Ok(RuntimeValue::Str(s.clone())),
            Expr::Bool(b) => Ok(RuntimeValue::Bool(*b)),
            Expr::Null => Ok(RuntimeValue::Null),
            Expr::Ident(name) => lock(&self.interp.env).get(name).cloned().ok_or_else(|| {
                if builtins::find(name).is_some() {
                    format!("`{name}` is a function; call it as {name}()")
                } else {
                    format!("identifier not found: {name}")
                }
            }),
            Expr::Array(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<Result<Vec<_>, _>>()
                .map(RuntimeValue::Array),
            Expr::Hash(pairs) => {
                let mut hash = RuntimeValue::Hash(Vec::with_capacity(pairs.len()));
                for (key, value) in pairs {
                    let value = self.eval(value)?;
                    hash.set(key.clone(), value);
                }
                Ok(hash)
            }
            Expr::Assign { name, value } => {
                let value = self.eval(value)?;
                lock(&self.interp.env).insert(name.clone(), value);
                Ok(RuntimeValue::Null)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                binary(*op, lhs, rhs)
            }
            Expr::Neg(inner) => match self.eval(inner)? {
                RuntimeValue::Number(n) => Ok(RuntimeValue::Number(-n)),
                other => Err(format!("cannot negate {}", other.kind())),
            },
            Expr::Property { subject, name } => match self.eval(subject)? {
                hash @ RuntimeValue::Hash(_) => {
                    Ok(hash.get(name).cloned().unwrap_or(RuntimeValue::Null))
                }
                other => Err(format!("{} has no property `{name}`", other.kind())),
            },
            Expr::Call { name, args } => {
                let args = self.eval_args(args)?;
                self.call(name, args)
            }
            Expr::MethodCall {
                subject,
                name,
                args,
            } => {
                let receiver = self.eval(subject)?;
                let builtin = builtins::find(name)
                    .ok_or_else(|| format!("unknown function: {name}"))?;
                if !builtin.metadata().callable_on(&receiver) {
                    return Err(format!(
                        "{name} cannot be called as a method on {}",
                        receiver.kind()
                    ));
                }
                let mut all = Vec::with_capacity(args.len() + 1);
                all.push(receiver);
                all.extend(self.eval_args(args)?);
                (builtin.call)(self, all)
            }
        }
    }

    fn eval_args(&self, args: &[Expr]) -> Result<Vec<RuntimeValue>, String> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    fn call(&self, name: &str, args: Vec<RuntimeValue>) -> EvalResult {
        let builtin = builtins::find(name).ok_or_else(|| format!("unknown function: {name}"))?;
        (builtin.call)(self, args)
    }
}

fn binary(op: BinaryOp, lhs: RuntimeValue, rhs: RuntimeValue) -> EvalResult {
    use RuntimeValue::{Array, Number, Str};
    match (op, lhs, rhs) {
        (BinaryOp::Add, Number(a), Number(b)) => Ok(Number(a + b)),
        (BinaryOp::Sub, Number(a), Number(b)) => Ok(Number(a - b)),
        (BinaryOp::Mul, Number(a), Number(b)) => Ok(Number(a * b)),
        (BinaryOp::Div, Number(_), Number(b)) if b == 0.0 => Err("division by zero".to_string()),
        (BinaryOp::Div, Number(a), Number(b)) => Ok(Number(a / b)),
        (BinaryOp::Add, Str(a), Str(b)) => Ok(Str(a + &b)),
        (BinaryOp::Add, Array(mut a), Array(b)) => {
            a.extend(b);
            Ok(Array(a))
        }
        (op, lhs, rhs) => Err(format!(
            "unsupported operation: {} {} {}",
            lhs.kind(),
            op_symbol(op),
            rhs.kind()
        )),
    }
}

fn op_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
    }
}

impl Runtime for Interpreter {
    type Node = Expr;

    fn run(&self, source: &str) -> EvaluationResult {
        let program = parse_program(source);
        if !program.errors.is_empty() {
            debug!(errors = program.errors.len(), "source did not parse");
            return EvaluationResult::syntax_errors(program.errors);
        }
        let frame = self.frame(true);
        let mut last = RuntimeValue::Null;
        for statement in &program.statements {
            match frame.eval(statement) {
                Ok(value) => last = value,
                Err(message) => {
                    return EvaluationResult::failure(RuntimeValue::Error(message))
                        .with_stdout(frame.stdout.into_inner())
                }
            }
        }
        EvaluationResult::success(last).with_stdout(frame.stdout.into_inner())
    }

    fn parse(&self, source: &str) -> ParseOutcome<Expr> {
        parse_program(source).into_outcome()
    }

    fn environment_keys(&self) -> Vec<String> {
        lock(&self.env).keys().cloned().collect()
    }

    fn environment_get(&self, name: &str) -> Option<RuntimeValue> {
        lock(&self.env).get(name).cloned()
    }

    fn builtin_functions(&self) -> BTreeMap<String, BuiltinFunction> {
        builtins::metadata_table()
    }

    fn evaluate_subexpression(&self, node: &Expr) -> RuntimeValue {
        self.frame(false).eval(node).unwrap_or_else(RuntimeValue::Error)
    }
}
