//! Completion candidates derived from the runtime's parse of the input line.

use tracing::debug;

use crate::runtime::{CompletionSubject, Runtime, RuntimeValue};
use crate::textutil::truncate_with_suffix_by_chars;

/// Comments longer than this are cut for display.
pub const MAX_COMMENT_CHARS: usize = 50;

/// Candidate kind. The ordinal doubles as sort precedence (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CandidateKind {
    Property = 0,
    Identifier = 1,
    Function = 2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionCandidate {
    pub value: String,
    pub comment: String,
    pub kind: CandidateKind,
}

impl SuggestionCandidate {
    /// Comment as rendered next to the candidate.
    pub fn display_comment(&self) -> String {
        truncate_with_suffix_by_chars(&self.comment, MAX_COMMENT_CHARS, "...")
    }
}

/// Candidates plus the trailing text they replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    pub candidates: Vec<SuggestionCandidate>,
    pub to_replace: String,
}

/// Parse `line` and complete its trailing node.
///
/// Parse failures and non-completable nodes yield no candidates.
pub fn suggest_for_line<R: Runtime>(runtime: &R, line: &str) -> Suggestions {
    let outcome = runtime.parse(line);
    if !outcome.errors.is_empty() {
        debug!(errors = outcome.errors.len(), "completion skipped: parse errors");
        return Suggestions::default();
    }
    match outcome.subject {
        Some(subject) => get_suggestions(runtime, &subject),
        None => Suggestions::default(),
    }
}

/// Candidates for one completion subject.
pub fn get_suggestions<R: Runtime>(runtime: &R, subject: &CompletionSubject<R::Node>) -> Suggestions {
    let mut suggestions = match subject {
        CompletionSubject::Identifier(partial) => identifier_candidates(runtime, partial),
        CompletionSubject::Property { subject, partial } => {
            property_candidates(runtime, &runtime.evaluate_subexpression(subject), partial)
        }
        CompletionSubject::Other => return Suggestions::default(),
    };
    suggestions
        .candidates
        .sort_by(|a, b| b.kind.cmp(&a.kind));
    suggestions
}

fn identifier_candidates<R: Runtime>(runtime: &R, partial: &str) -> Suggestions {
    let mut names = runtime.environment_keys();
    names.sort();
    let mut candidates: Vec<SuggestionCandidate> = names
        .into_iter()
        .filter(|name| starts_with_ignore_case(name, partial))
        .filter_map(|name| {
            let value = runtime.environment_get(&name)?;
            Some(SuggestionCandidate {
                comment: value.printed(),
                value: name,
                kind: CandidateKind::Identifier,
            })
        })
        .collect();

    candidates.extend(
        runtime
            .builtin_functions()
            .into_iter()
            .filter(|(name, _)| starts_with_ignore_case(name, partial))
            .map(|(name, func)| SuggestionCandidate {
                value: name,
                comment: func.doc,
                kind: CandidateKind::Function,
            }),
    );

    Suggestions {
        candidates,
        to_replace: partial.to_string(),
    }
}

fn property_candidates<R: Runtime>(runtime: &R, value: &RuntimeValue, partial: &str) -> Suggestions {
    let mut candidates: Vec<SuggestionCandidate> = runtime
        .builtin_functions()
        .into_iter()
        .filter(|(name, func)| func.callable_on(value) && starts_with_ignore_case(name, partial))
        .map(|(name, func)| SuggestionCandidate {
            value: name,
            comment: func.doc,
            kind: CandidateKind::Function,
        })
        .collect();

    if let RuntimeValue::Hash(pairs) = value {
        candidates.extend(pairs.iter().map(|(key, v)| SuggestionCandidate {
            value: key.clone(),
            comment: v.printed(),
            kind: CandidateKind::Property,
        }));
    }

    Suggestions {
        candidates,
        to_replace: partial.to_string(),
    }
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Replace the trailing `to_replace` span of `original` with `value`.
///
/// Always applied to the pre-completion text so previews never compound.
pub fn apply_suggestion(original: &str, to_replace: &str, value: &str) -> String {
    if let Some(head) = original.strip_suffix(to_replace) {
        return format!("{head}{value}");
    }
    match original.rfind(to_replace) {
        Some(idx) if !to_replace.is_empty() => format!(
            "{}{value}{}",
            &original[..idx],
            &original[idx + to_replace.len()..]
        ),
        _ => format!("{original}{value}"),
    }
}
