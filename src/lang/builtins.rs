//! Built-in function table.
//!
//! Every entry carries the metadata the completion engine shows (doc string,
//! standalone flag, receiver predicate) plus the function pointer that the
//! interpreter calls. Method syntax `v.fn(a)` passes `v` as the first argument.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::lang::interp::Frame;
use crate::runtime::{BuiltinFunction, RuntimeValue};

pub(crate) type BuiltinCall = fn(&Frame<'_>, Vec<RuntimeValue>) -> Result<RuntimeValue, String>;

pub(crate) struct Builtin {
    pub(crate) name: &'static str,
    pub(crate) doc: &'static str,
    pub(crate) standalone: bool,
    pub(crate) applies_to: fn(&RuntimeValue) -> bool,
    pub(crate) call: BuiltinCall,
}

impl Builtin {
    pub(crate) fn metadata(&self) -> BuiltinFunction {
        BuiltinFunction {
            doc: self.doc.to_string(),
            standalone: self.standalone,
            applies_to: self.applies_to,
        }
    }
}

pub(crate) const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "echo",
        doc: "echo(value): prints value to stdout",
        standalone: true,
        applies_to: any,
        call: echo,
    },
    Builtin {
        name: "join",
        doc: "array.join(sep): joins elements into a string",
        standalone: false,
        applies_to: is_array,
        call: join,
    },
    Builtin {
        name: "keys",
        doc: "hash.keys(): array of the hash's keys",
        standalone: false,
        applies_to: is_hash,
        call: keys,
    },
    Builtin {
        name: "len",
        doc: "len(value): length of a string, array or hash",
        standalone: false,
        applies_to: has_len,
        call: len,
    },
    Builtin {
        name: "lower",
        doc: "str.lower(): lowercased copy of a string",
        standalone: false,
        applies_to: is_str,
        call: lower,
    },
    Builtin {
        name: "sleep",
        doc: "sleep(ms): pauses execution for ms milliseconds",
        standalone: true,
        applies_to: any,
        call: sleep,
    },
    Builtin {
        name: "split",
        doc: "str.split(sep): splits a string into an array",
        standalone: false,
        applies_to: is_str,
        call: split,
    },
    Builtin {
        name: "stdin",
        doc: "stdin(): reads one line from standard input",
        standalone: true,
        applies_to: any,
        call: stdin,
    },
    Builtin {
        name: "str",
        doc: "value.str(): printed form of any value",
        standalone: false,
        applies_to: any,
        call: str_of,
    },
    Builtin {
        name: "sum",
        doc: "array.sum(): sum of an array of numbers",
        standalone: false,
        applies_to: is_array,
        call: sum,
    },
    Builtin {
        name: "type",
        doc: "value.type(): type name, e.g. STRING or HASH",
        standalone: false,
        applies_to: any,
        call: type_of,
    },
    Builtin {
        name: "upper",
        doc: "str.upper(): uppercased copy of a string",
        standalone: false,
        applies_to: is_str,
        call: upper,
    },
    Builtin {
        name: "values",
        doc: "hash.values(): array of the hash's values",
        standalone: false,
        applies_to: is_hash,
        call: values,
    },
];

pub(crate) fn find(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

pub(crate) fn metadata_table() -> BTreeMap<String, BuiltinFunction> {
    BUILTINS
        .iter()
        .map(|b| (b.name.to_string(), b.metadata()))
        .collect()
}

fn any(_: &RuntimeValue) -> bool {
    true
}

fn is_str(value: &RuntimeValue) -> bool {
    matches!(value, RuntimeValue::Str(_))
}

fn is_array(value: &RuntimeValue) -> bool {
    matches!(value, RuntimeValue::Array(_))
}

fn is_hash(value: &RuntimeValue) -> bool {
    matches!(value, RuntimeValue::Hash(_))
}

fn has_len(value: &RuntimeValue) -> bool {
    is_str(value) || is_array(value) || is_hash(value)
}

fn arity(name: &str, args: &[RuntimeValue], expected: usize) -> Result<(), String> {
    if args.len() == expected {
        return Ok(());
    }
    Err(format!(
        "{name} expects {expected} argument(s), got {}",
        args.len()
    ))
}

fn wrong_type(name: &str, value: &RuntimeValue) -> String {
    format!("{name} cannot be applied to {}", value.kind())
}

fn echo(frame: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    let line: Vec<String> = args.iter().map(RuntimeValue::printed).collect();
    frame.write_output(&format!("{}\n", line.join(" ")));
    Ok(RuntimeValue::Null)
}

fn stdin(frame: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("stdin", &args, 0)?;
    Ok(frame
        .read_input_line()
        .map(RuntimeValue::Str)
        .unwrap_or(RuntimeValue::Null))
}

fn sleep(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("sleep", &args, 1)?;
    match args[0] {
        RuntimeValue::Number(ms) if ms >= 0.0 => {
            std::thread::sleep(Duration::from_millis(ms as u64));
            Ok(RuntimeValue::Null)
        }
        ref other => Err(wrong_type("sleep", other)),
    }
}

fn len(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("len", &args, 1)?;
    let n = match &args[0] {
        RuntimeValue::Str(s) => s.chars().count(),
        RuntimeValue::Array(items) => items.len(),
        RuntimeValue::Hash(pairs) => pairs.len(),
        other => return Err(wrong_type("len", other)),
    };
    Ok(RuntimeValue::Number(n as f64))
}

fn upper(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("upper", &args, 1)?;
    match &args[0] {
        RuntimeValue::Str(s) => Ok(RuntimeValue::Str(s.to_uppercase())),
        other => Err(wrong_type("upper", other)),
    }
}

fn lower(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("lower", &args, 1)?;
    match &args[0] {
        RuntimeValue::Str(s) => Ok(RuntimeValue::Str(s.to_lowercase())),
        other => Err(wrong_type("lower", other)),
    }
}

fn keys(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("keys", &args, 1)?;
    match &args[0] {
        RuntimeValue::Hash(pairs) => Ok(RuntimeValue::Array(
            pairs
                .iter()
                .map(|(k, _)| RuntimeValue::Str(k.clone()))
                .collect(),
        )),
        other => Err(wrong_type("keys", other)),
    }
}

fn values(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("values", &args, 1)?;
    match &args[0] {
        RuntimeValue::Hash(pairs) => Ok(RuntimeValue::Array(
            pairs.iter().map(|(_, v)| v.clone()).collect(),
        )),
        other => Err(wrong_type("values", other)),
    }
}

fn type_of(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("type", &args, 1)?;
    Ok(RuntimeValue::Str(args[0].kind().to_string()))
}

fn str_of(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("str", &args, 1)?;
    Ok(RuntimeValue::Str(args[0].printed()))
}

fn split(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("split", &args, 2)?;
    match (&args[0], &args[1]) {
        (RuntimeValue::Str(s), RuntimeValue::Str(sep)) => {
            let parts: Vec<RuntimeValue> = if sep.is_empty() {
                s.chars().map(|c| RuntimeValue::Str(c.to_string())).collect()
            } else {
                s.split(sep.as_str())
                    .map(|p| RuntimeValue::Str(p.to_string()))
                    .collect()
            };
            Ok(RuntimeValue::Array(parts))
        }
        (RuntimeValue::Str(_), other) | (other, _) => Err(wrong_type("split", other)),
    }
}

fn join(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("join", &args, 2)?;
    match (&args[0], &args[1]) {
        (RuntimeValue::Array(items), RuntimeValue::Str(sep)) => {
            let parts: Vec<String> = items.iter().map(RuntimeValue::printed).collect();
            Ok(RuntimeValue::Str(parts.join(sep)))
        }
        (RuntimeValue::Array(_), other) | (other, _) => Err(wrong_type("join", other)),
    }
}

fn sum(_: &Frame<'_>, args: Vec<RuntimeValue>) -> Result<RuntimeValue, String> {
    arity("sum", &args, 1)?;
    let RuntimeValue::Array(items) = &args[0] else {
        return Err(wrong_type("sum", &args[0]));
    };
    let mut total = 0.0;
    for item in items {
        match item {
            RuntimeValue::Number(n) => total += n,
            other => return Err(wrong_type("sum", other)),
        }
    }
    Ok(RuntimeValue::Number(total))
}
