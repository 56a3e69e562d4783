//! Shared test fixtures: a temp-dir helper and a scripted runtime double.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::runtime::{
    BuiltinFunction, CompletionSubject, EvaluationResult, ParseOutcome, Runtime, RuntimeValue,
};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "quill-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// In-memory runtime whose answers are configured up front.
///
/// `parse` looks only at the trailing word of the source: `name.part` yields a
/// property subject whose node is `name`, a bare word yields an identifier,
/// anything else is `Other`. Source containing `!!` fails to parse.
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    env: BTreeMap<String, RuntimeValue>,
    functions: BTreeMap<String, BuiltinFunction>,
    results: BTreeMap<String, EvaluationResult>,
    stdout: String,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, name: &str, value: RuntimeValue) -> Self {
        self.env.insert(name.to_string(), value);
        self
    }

    pub fn with_function(
        mut self,
        name: &str,
        doc: &str,
        standalone: bool,
        applies_to: fn(&RuntimeValue) -> bool,
    ) -> Self {
        self.functions.insert(
            name.to_string(),
            BuiltinFunction {
                doc: doc.to_string(),
                standalone,
                applies_to,
            },
        );
        self
    }

    pub fn with_result(mut self, source: &str, result: EvaluationResult) -> Self {
        self.results.insert(source.to_string(), result);
        self
    }

    /// Text every `run` reports as captured stdout.
    pub fn with_output(mut self, text: &str) -> Self {
        self.stdout = text.to_string();
        self
    }
}

impl Runtime for ScriptedRuntime {
    type Node = String;

    fn run(&self, source: &str) -> EvaluationResult {
        self.results
            .get(source)
            .cloned()
            .unwrap_or_else(|| EvaluationResult::success(RuntimeValue::Null))
            .with_stdout(self.stdout.clone())
    }

    fn parse(&self, source: &str) -> ParseOutcome<String> {
        if source.contains("!!") {
            return ParseOutcome {
                errors: vec!["unexpected `!`".to_string()],
                subject: None,
            };
        }
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let word_start = source
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word(*c))
            .last()
            .map(|(i, _)| i)
            .unwrap_or(source.len());
        let partial = &source[word_start..];
        let before = &source[..word_start];
        let subject = if let Some(head) = before.strip_suffix('.') {
            let name_start = head
                .char_indices()
                .rev()
                .take_while(|(_, c)| is_word(*c))
                .last()
                .map(|(i, _)| i)
                .unwrap_or(head.len());
            CompletionSubject::Property {
                subject: head[name_start..].to_string(),
                partial: partial.to_string(),
            }
        } else if !partial.is_empty() {
            CompletionSubject::Identifier(partial.to_string())
        } else {
            CompletionSubject::Other
        };
        ParseOutcome {
            errors: Vec::new(),
            subject: Some(subject),
        }
    }

    fn environment_keys(&self) -> Vec<String> {
        self.env.keys().cloned().collect()
    }

    fn environment_get(&self, name: &str) -> Option<RuntimeValue> {
        self.env.get(name).cloned()
    }

    fn builtin_functions(&self) -> BTreeMap<String, BuiltinFunction> {
        self.functions.clone()
    }

    fn evaluate_subexpression(&self, node: &String) -> RuntimeValue {
        self.env.get(node).cloned().unwrap_or(RuntimeValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.path().exists());
    }

    #[test]
    fn scripted_parse_finds_trailing_subject() {
        let runtime = ScriptedRuntime::new();
        assert_eq!(
            runtime.parse("x = hel").subject,
            Some(CompletionSubject::Identifier("hel".into()))
        );
        assert_eq!(
            runtime.parse("user.na").subject,
            Some(CompletionSubject::Property {
                subject: "user".into(),
                partial: "na".into()
            })
        );
        assert_eq!(
            runtime.parse("user.").subject,
            Some(CompletionSubject::Property {
                subject: "user".into(),
                partial: String::new()
            })
        );
        assert_eq!(runtime.parse("1 + ").subject, Some(CompletionSubject::Other));
        assert!(runtime.parse("!!").subject.is_none());
    }
}
