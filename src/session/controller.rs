//! Session state machine: routes keys to the active mode and renders the view.
//!
//! [`Session::update`] consumes the session and returns the next one plus the
//! side effects the driver must perform. The session never touches the
//! terminal, the filesystem or the evaluation thread directly.

use tracing::debug;

use crate::eval::EvalId;
use crate::runtime::{EvaluationResult, Runtime};
use crate::session::help::{help_lines, placeholder_statement};
use crate::session::history::HistoryStore;
use crate::session::input_line::InputLine;
use crate::session::keys::Key;
use crate::session::search::SearchState;
use crate::session::suggest::{
    apply_suggestion, suggest_for_line, CandidateKind, SuggestionCandidate, Suggestions,
};
use crate::session::view::{debug_panel, CursorPos, Span, SpanStyle, StyledLine, View};
use crate::textutil::char_count;

const SEARCH_PROMPT: &str = " search: ";
const SUGGESTION_PREFIX: &str = "   ";
const SELECTED_PREFIX: &str = " → ";

/// Active mode. Exactly one at a time; each variant owns its transient state.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Evaluating {
        id: EvalId,
        source: String,
    },
    Suggesting {
        candidates: Vec<SuggestionCandidate>,
        selected: Option<usize>,
        to_replace: String,
    },
    Searching(SearchState),
}

/// Input to [`Session::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Key(Key),
    EvalDone { id: EvalId, result: EvaluationResult },
}

/// Side effect requested by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append lines to the transcript above the editor.
    Print(Vec<StyledLine>),
    StartEvaluation { id: EvalId, source: String },
    CancelEvaluation(EvalId),
    /// Bytes for the running program's stdin.
    Relay(Vec<u8>),
    ClearScreen,
    /// Persist history and exit.
    Quit,
}

/// Construction-time settings.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub prompt: String,
    pub placeholder: Option<String>,
    pub debug: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            prompt: "⧐  ".to_string(),
            placeholder: None,
            debug: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    prompt: String,
    debug: bool,
    input: InputLine,
    dirty_input: String,
    history: HistoryStore,
    history_index: Option<usize>,
    mode: Mode,
    next_eval_id: EvalId,
}

impl Session {
    pub fn new(options: SessionOptions, history: HistoryStore) -> Self {
        let mut input = InputLine::new();
        input.set_placeholder(options.placeholder);
        Self {
            prompt: options.prompt,
            debug: options.debug,
            input,
            dirty_input: String::new(),
            history,
            history_index: None,
            mode: Mode::Normal,
            next_eval_id: 1,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    pub fn dirty_input(&self) -> &str {
        &self.dirty_input
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_evaluating(&self) -> bool {
        matches!(self.mode, Mode::Evaluating { .. })
    }

    /// Apply one message and return the next session plus effects to run.
    pub fn update<R: Runtime>(mut self, msg: Msg, runtime: &R) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        match msg {
            Msg::EvalDone { id, result } => self.on_eval_done(id, result, &mut effects),
            Msg::Key(key) => match self.mode {
                Mode::Evaluating { .. } => self.on_evaluating_key(key, &mut effects),
                Mode::Suggesting { .. } => self.on_suggesting_key(key),
                Mode::Searching(_) => self.on_searching_key(key, &mut effects),
                Mode::Normal => self.on_normal_key(key, runtime, &mut effects),
            },
        }
        (self, effects)
    }

    fn set_mode(&mut self, mode: Mode) {
        debug!(from = mode_name(&self.mode), to = mode_name(&mode), "mode change");
        self.mode = mode;
    }

    /// Back to Normal with no transient state left behind.
    fn reset_transient(&mut self) {
        self.dirty_input.clear();
        self.history_index = None;
        self.input.focus();
        if !matches!(self.mode, Mode::Normal) {
            self.set_mode(Mode::Normal);
        }
    }

    fn echo_line(&self) -> StyledLine {
        StyledLine::new(vec![
            Span::new(self.prompt.clone(), SpanStyle::Prompt),
            Span::plain(self.input.value()),
        ])
    }

    // ---------------------------------------------------------------------
    // Normal
    // ---------------------------------------------------------------------

    fn on_normal_key<R: Runtime>(&mut self, key: Key, runtime: &R, effects: &mut Vec<Effect>) {
        match key {
            Key::Esc | Key::Ctrl('d') => effects.push(Effect::Quit),
            Key::Enter => self.submit(effects),
            Key::Tab => self.complete(runtime),
            Key::Ctrl('r') => self.start_search(),
            Key::Up => self.history_up(),
            Key::Down => self.history_down(),
            Key::Ctrl('c') => {
                effects.push(Effect::Print(vec![self.echo_line()]));
                self.input.clear();
                self.reset_transient();
            }
            Key::Ctrl('l') => {
                self.input.set_placeholder(None);
                effects.push(Effect::ClearScreen);
            }
            other => {
                if self.edit(other) {
                    self.history_index = None;
                    self.dirty_input.clear();
                }
            }
        }
    }

    /// Ordinary line editing. Returns whether the key was an editing key.
    fn edit(&mut self, key: Key) -> bool {
        match key {
            Key::Char(ch) => self.input.insert_char(ch),
            Key::Backspace => self.input.backspace(),
            Key::Delete => self.input.delete(),
            Key::Left => self.input.move_left(),
            Key::Right => self.input.move_right(),
            Key::Home | Key::Ctrl('a') => self.input.move_home(),
            Key::End | Key::Ctrl('e') => self.input.move_end(),
            Key::Ctrl('k') => self.input.kill_to_end(),
            Key::Ctrl('u') => self.input.kill_to_start(),
            Key::Ctrl('w') => self.input.kill_previous_word(),
            _ => return false,
        }
        true
    }

    fn submit(&mut self, effects: &mut Vec<Effect>) {
        let source = self.input.value().to_string();
        if source.is_empty() {
            effects.push(Effect::Print(vec![self.echo_line()]));
            return;
        }

        self.history.append(source.clone());
        self.input.set_placeholder(None);
        self.reset_transient();

        match source.trim() {
            "quit" => {
                effects.push(Effect::Print(vec![self.echo_line()]));
                effects.push(Effect::Quit);
            }
            "help" => {
                let mut lines = vec![self.echo_line()];
                lines.extend(help_lines(&mut rand::thread_rng()));
                effects.push(Effect::Print(lines));
                self.input.clear();
            }
            _ => {
                let id = self.next_eval_id;
                self.next_eval_id += 1;
                self.set_mode(Mode::Evaluating {
                    id,
                    source: source.clone(),
                });
                effects.push(Effect::StartEvaluation { id, source });
            }
        }
    }

    fn history_up(&mut self) {
        let Some(idx) = self.history.older(self.history_index) else {
            return;
        };
        if self.history_index.is_none() {
            self.dirty_input = self.input.value().to_string();
        }
        self.history_index = Some(idx);
        if let Some(entry) = self.history.get(idx) {
            self.input.set_value(entry);
        }
    }

    fn history_down(&mut self) {
        if self.history_index.is_none() {
            return;
        }
        self.history_index = self.history.newer(self.history_index);
        match self.history_index.and_then(|idx| self.history.get(idx)) {
            Some(entry) => self.input.set_value(entry),
            None => {
                self.input.set_value(std::mem::take(&mut self.dirty_input));
            }
        }
    }

    // ---------------------------------------------------------------------
    // Suggesting
    // ---------------------------------------------------------------------

    fn complete<R: Runtime>(&mut self, runtime: &R) {
        if self.input.is_empty() {
            if let Some(placeholder) = self.input.placeholder() {
                let statement = placeholder_statement(placeholder).to_string();
                self.input.set_value(statement);
            }
            return;
        }

        let line = self.input.value().to_string();
        let Suggestions {
            candidates,
            to_replace,
        } = suggest_for_line(runtime, &line);
        match candidates.len() {
            0 => {}
            1 => {
                self.input
                    .set_value(apply_suggestion(&line, &to_replace, &candidates[0].value));
                self.reset_transient();
            }
            _ => {
                self.dirty_input = line;
                self.set_mode(Mode::Suggesting {
                    candidates,
                    selected: None,
                    to_replace,
                });
            }
        }
    }

    fn on_suggesting_key(&mut self, key: Key) {
        match key {
            Key::Enter => self.reset_transient(),
            Key::Tab | Key::Down => self.cycle_suggestion(true),
            Key::Up => self.cycle_suggestion(false),
            _ => {
                let dirty = std::mem::take(&mut self.dirty_input);
                self.input.set_value(dirty);
                self.reset_transient();
            }
        }
    }

    fn cycle_suggestion(&mut self, forward: bool) {
        let Mode::Suggesting {
            candidates,
            selected,
            to_replace,
        } = &mut self.mode
        else {
            return;
        };
        let count = candidates.len();
        let next = match (*selected, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(idx), true) => (idx + 1) % count,
            (Some(idx), false) => (idx + count - 1) % count,
        };
        *selected = Some(next);
        let preview = apply_suggestion(&self.dirty_input, to_replace, &candidates[next].value);
        self.input.set_value(preview);
    }

    // ---------------------------------------------------------------------
    // Searching
    // ---------------------------------------------------------------------

    fn start_search(&mut self) {
        self.dirty_input = self.input.value().to_string();
        self.history_index = None;
        self.input.blur();
        self.set_mode(Mode::Searching(SearchState::start(&self.history)));
    }

    fn on_searching_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        let Mode::Searching(search) = &mut self.mode else {
            return;
        };
        let mut query = search.query().to_string();
        match key {
            Key::Esc => {
                effects.push(Effect::Quit);
                return;
            }
            Key::Enter => {
                self.input.move_end();
                self.reset_transient();
                return;
            }
            Key::Ctrl('c') | Key::Ctrl('d') => {
                let dirty = std::mem::take(&mut self.dirty_input);
                self.input.set_value(dirty);
                self.reset_transient();
                return;
            }
            Key::Ctrl('r') => {
                if let Some(entry) = search.continue_backward(&self.history) {
                    self.input.set_value(entry);
                }
                return;
            }
            Key::Char(ch) => query.push(ch),
            Key::Backspace => {
                query.pop();
            }
            _ => {}
        }
        let found = search.set_query(query, &self.history);
        if search.query().is_empty() {
            self.input.clear();
        } else if let Some(entry) = found {
            self.input.set_value(entry);
        }
    }

    // ---------------------------------------------------------------------
    // Evaluating
    // ---------------------------------------------------------------------

    fn on_evaluating_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        let Mode::Evaluating { id, .. } = self.mode else {
            return;
        };
        if key == Key::Ctrl('c') {
            effects.push(Effect::CancelEvaluation(id));
            self.on_eval_done(id, EvaluationResult::cancelled(), effects);
            return;
        }
        let bytes = key.relay_bytes();
        if !bytes.is_empty() {
            effects.push(Effect::Relay(bytes));
        }
    }

    fn on_eval_done(&mut self, id: EvalId, result: EvaluationResult, effects: &mut Vec<Effect>) {
        let Mode::Evaluating {
            id: running,
            source,
        } = &self.mode
        else {
            debug!(eval_id = id, "ignoring result: no evaluation in flight");
            return;
        };
        if *running != id {
            debug!(eval_id = id, running = *running, "ignoring stale result");
            return;
        }

        let mut lines = vec![StyledLine::new(vec![
            Span::new(self.prompt.clone(), SpanStyle::Prompt),
            Span::plain(source.clone()),
        ])];
        lines.extend(outcome_lines(&result));
        effects.push(Effect::Print(lines));
        self.input.clear();
        self.reset_transient();
    }

    // ---------------------------------------------------------------------
    // View
    // ---------------------------------------------------------------------

    /// Editor surface for the current state.
    pub fn view(&self) -> View {
        let prompt_width = char_count(&self.prompt);
        let mut input_row = vec![Span::new(self.prompt.clone(), SpanStyle::Prompt)];
        match self.input.placeholder() {
            Some(placeholder) if self.input.is_empty() => {
                input_row.push(Span::new(placeholder, SpanStyle::Placeholder));
            }
            _ => input_row.push(Span::plain(self.input.value())),
        }
        let mut lines = vec![StyledLine::new(input_row)];
        let mut cursor = Some(CursorPos {
            row: 0,
            column: prompt_width + self.input.cursor(),
        });

        match &self.mode {
            Mode::Evaluating { .. } => cursor = None,
            Mode::Suggesting {
                candidates,
                selected,
                ..
            } => {
                lines.extend(candidates.iter().enumerate().map(|(idx, candidate)| {
                    suggestion_row(candidate, *selected == Some(idx))
                }));
            }
            Mode::Searching(search) => {
                cursor = Some(CursorPos {
                    row: lines.len(),
                    column: char_count(SEARCH_PROMPT) + char_count(search.query()),
                });
                lines.push(StyledLine::new(vec![
                    Span::new(SEARCH_PROMPT, SpanStyle::SearchPrompt),
                    Span::new(search.query(), SpanStyle::SearchText),
                ]));
            }
            Mode::Normal => {}
        }

        if self.debug {
            lines.extend(debug_panel(&self.debug_entries()));
        }
        View { lines, cursor }
    }

    fn debug_entries(&self) -> Vec<(&'static str, String)> {
        let signed = |value: Option<usize>| value.map_or(-1, |v| v as i64).to_string();
        let suggestions_index = match &self.mode {
            Mode::Suggesting { selected, .. } => *selected,
            _ => None,
        };
        let search_position = match &self.mode {
            Mode::Searching(search) => Some(search.position()),
            _ => None,
        };
        vec![
            ("dirty_input", format!("{:?}", self.dirty_input)),
            ("history_index", signed(self.history_index)),
            (
                "max_history_index",
                signed(self.history.len().checked_sub(1)),
            ),
            ("is_evaluating", self.is_evaluating().to_string()),
            ("suggestions_index", signed(suggestions_index)),
            ("search_position", signed(search_position)),
        ]
    }
}

fn suggestion_row(candidate: &SuggestionCandidate, selected: bool) -> StyledLine {
    if selected {
        return StyledLine::new(vec![
            Span::new(SELECTED_PREFIX, SpanStyle::SelectedPrefix),
            Span::new(candidate.value.clone(), SpanStyle::Selected),
            Span::new(
                format!(" # {}", candidate.display_comment()),
                SpanStyle::Comment,
            ),
        ]);
    }
    let style = match candidate.kind {
        CandidateKind::Function => SpanStyle::FunctionSuggestion,
        CandidateKind::Identifier => SpanStyle::IdentifierSuggestion,
        CandidateKind::Property => SpanStyle::PropertySuggestion,
    };
    StyledLine::new(vec![
        Span::plain(SUGGESTION_PREFIX),
        Span::new(candidate.value.clone(), style),
    ])
}

/// Transcript rows for a finished evaluation: parse errors, captured stdout
/// (trailing newline trimmed), then the printed result unless it is no value.
pub fn outcome_lines(result: &EvaluationResult) -> Vec<StyledLine> {
    let mut lines = parse_error_lines(&result.parse_errors);
    let stdout = result.stdout.trim_end_matches('\n');
    if !stdout.is_empty() {
        lines.extend(stdout.split('\n').map(StyledLine::plain));
    }
    if !result.output.is_no_value() {
        let style = if result.succeeded {
            SpanStyle::Plain
        } else {
            SpanStyle::Error
        };
        lines.extend(
            result
                .output
                .printed()
                .split('\n')
                .map(|line| StyledLine::single(line, style)),
        );
    }
    lines
}

/// Header plus numbered errors; only the first line of each error is numbered.
fn parse_error_lines(errors: &[String]) -> Vec<StyledLine> {
    if errors.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![StyledLine::single(
        format!("encountered {} syntax errors:", errors.len()),
        SpanStyle::Error,
    )];
    for (idx, error) in errors.iter().enumerate() {
        for (line_no, line) in error.split('\n').enumerate() {
            let text = if line_no == 0 {
                format!("  {}) {line}", idx + 1)
            } else {
                format!("  {line}")
            };
            lines.push(StyledLine::single(text, SpanStyle::Error));
        }
    }
    lines
}

fn mode_name(mode: &Mode) -> &'static str {
    match mode {
        Mode::Normal => "normal",
        Mode::Evaluating { .. } => "evaluating",
        Mode::Suggesting { .. } => "suggesting",
        Mode::Searching(_) => "searching",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeValue;
    use crate::testsupport::ScriptedRuntime;

    fn session_with(history: &[&str]) -> Session {
        Session::new(
            SessionOptions::default(),
            HistoryStore::new(history.iter().map(|s| s.to_string()).collect()),
        )
    }

    fn press<R: Runtime>(session: Session, runtime: &R, keys: &[Key]) -> (Session, Vec<Effect>) {
        let mut all = Vec::new();
        let mut session = session;
        for key in keys {
            let (next, effects) = session.update(Msg::Key(*key), runtime);
            session = next;
            all.extend(effects);
        }
        (session, all)
    }

    fn type_text<R: Runtime>(session: Session, runtime: &R, text: &str) -> Session {
        let keys: Vec<Key> = text.chars().map(Key::Char).collect();
        press(session, runtime, &keys).0
    }

    fn printed(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Print(lines) => Some(lines.iter().map(StyledLine::text).collect::<Vec<_>>()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn any(_: &RuntimeValue) -> bool {
        true
    }

    #[test]
    fn submit_starts_evaluation_and_records_history() {
        let runtime = ScriptedRuntime::new();
        let session = type_text(session_with(&[]), &runtime, "1 + 1");
        let (session, effects) = press(session, &runtime, &[Key::Enter]);
        assert_eq!(
            effects,
            vec![Effect::StartEvaluation {
                id: 1,
                source: "1 + 1".into()
            }]
        );
        assert!(session.is_evaluating());
        assert_eq!(session.history().entries(), &["1 + 1".to_string()]);
    }

    #[test]
    fn empty_submit_only_echoes_the_prompt() {
        let runtime = ScriptedRuntime::new();
        let (session, effects) = press(session_with(&["x"]), &runtime, &[Key::Enter]);
        assert_eq!(printed(&effects), vec!["⧐  ".to_string()]);
        assert_eq!(session.mode(), &Mode::Normal);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn eval_done_renders_errors_stdout_and_result() {
        let result = EvaluationResult {
            output: RuntimeValue::Error("boom".into()),
            succeeded: false,
            parse_errors: vec!["bad token\n    x\n    ^".into(), "second".into()],
            stdout: String::new(),
        };
        let runtime = ScriptedRuntime::new()
            .with_result("x", result)
            .with_output("hi\n");
        let session = type_text(session_with(&[]), &runtime, "x");
        let (session, _) = press(session, &runtime, &[Key::Enter]);
        let outcome = runtime.run("x");
        let (session, effects) = session.update(Msg::EvalDone { id: 1, result: outcome }, &runtime);

        assert_eq!(
            printed(&effects),
            vec![
                "⧐  x",
                "encountered 2 syntax errors:",
                "  1) bad token",
                "      x",
                "      ^",
                "  2) second",
                "hi",
                "ERROR: boom",
            ]
        );
        let Effect::Print(lines) = &effects[0] else {
            panic!("expected print");
        };
        assert_eq!(lines.last().map(|l| l.spans[0].style), Some(SpanStyle::Error));
        assert_eq!(session.mode(), &Mode::Normal);
        assert!(session.input().is_empty());
    }

    #[test]
    fn keys_are_relayed_while_evaluating() {
        let runtime = ScriptedRuntime::new();
        let session = type_text(session_with(&[]), &runtime, "stdin()");
        let (session, _) = press(session, &runtime, &[Key::Enter]);
        let (session, effects) = press(
            session,
            &runtime,
            &[Key::Char('a'), Key::Up, Key::Esc, Key::Enter],
        );
        assert_eq!(
            effects,
            vec![Effect::Relay(b"a".to_vec()), Effect::Relay(b"\n".to_vec())]
        );
        assert!(session.is_evaluating());
        assert_eq!(session.input().value(), "stdin()");
    }

    #[test]
    fn cancel_returns_to_normal_and_late_result_is_ignored() {
        let runtime = ScriptedRuntime::new();
        let session = type_text(session_with(&[]), &runtime, "sleep(1000)");
        let (session, _) = press(session, &runtime, &[Key::Enter]);
        let (session, effects) = press(session, &runtime, &[Key::Ctrl('c')]);
        assert_eq!(effects[0], Effect::CancelEvaluation(1));
        assert_eq!(printed(&effects), vec!["⧐  sleep(1000)".to_string()]);
        assert_eq!(session.mode(), &Mode::Normal);

        let late = EvaluationResult::success(RuntimeValue::Str("late".into()));
        let (session, effects) = session.update(Msg::EvalDone { id: 1, result: late }, &runtime);
        assert!(effects.is_empty());
        assert_eq!(session.mode(), &Mode::Normal);
    }

    #[test]
    fn history_up_then_down_restores_dirty_input() {
        let runtime = ScriptedRuntime::new();
        let session = type_text(session_with(&["a = 1", "b = 2"]), &runtime, "draft");
        let (session, _) = press(session, &runtime, &[Key::Up, Key::Up, Key::Up]);
        assert_eq!(session.input().value(), "a = 1");
        assert_eq!(session.history_index(), Some(0));
        let (session, _) = press(session, &runtime, &[Key::Down]);
        assert_eq!(session.input().value(), "b = 2");
        let (session, _) = press(session, &runtime, &[Key::Down, Key::Down]);
        assert_eq!(session.input().value(), "draft");
        assert_eq!(session.history_index(), None);
        assert_eq!(session.dirty_input(), "");
    }

    #[test]
    fn editing_detaches_history_cursor() {
        let runtime = ScriptedRuntime::new();
        let (session, _) = press(
            session_with(&["abc"]),
            &runtime,
            &[Key::Up, Key::Backspace, Key::Down],
        );
        assert_eq!(session.input().value(), "ab");
        assert_eq!(session.history_index(), None);
    }

    #[test]
    fn suggestion_cycle_wraps_and_never_compounds() {
        let runtime = ScriptedRuntime::new()
            .with_binding("hello", RuntimeValue::Number(1.0))
            .with_binding("help", RuntimeValue::Number(2.0));
        let session = type_text(session_with(&[]), &runtime, "x = hel");
        let (session, _) = press(session, &runtime, &[Key::Tab]);
        assert!(matches!(session.mode(), Mode::Suggesting { selected: None, .. }));
        assert_eq!(session.dirty_input(), "x = hel");

        let (session, _) = press(session, &runtime, &[Key::Tab]);
        assert_eq!(session.input().value(), "x = hello");
        let (session, _) = press(session, &runtime, &[Key::Tab]);
        assert_eq!(session.input().value(), "x = help");
        let (session, _) = press(session, &runtime, &[Key::Tab]);
        assert_eq!(session.input().value(), "x = hello");
        let (session, _) = press(session, &runtime, &[Key::Up, Key::Up]);
        assert_eq!(session.input().value(), "x = hello");

        let (session, _) = press(session, &runtime, &[Key::Enter]);
        assert_eq!(session.mode(), &Mode::Normal);
        assert_eq!(session.input().value(), "x = hello");
        assert_eq!(session.dirty_input(), "");
    }

    #[test]
    fn other_key_while_suggesting_restores_dirty_input() {
        let runtime = ScriptedRuntime::new()
            .with_function("hex", "hex", false, any)
            .with_function("head", "head", false, any);
        let session = type_text(session_with(&[]), &runtime, "he");
        let (session, effects) = press(session, &runtime, &[Key::Tab, Key::Tab, Key::Esc]);
        assert!(effects.is_empty());
        assert_eq!(session.mode(), &Mode::Normal);
        assert_eq!(session.input().value(), "he");
    }

    #[test]
    fn single_candidate_is_applied_immediately() {
        let runtime = ScriptedRuntime::new().with_binding("counter", RuntimeValue::Number(0.0));
        let session = type_text(session_with(&[]), &runtime, "cou");
        let (session, _) = press(session, &runtime, &[Key::Tab]);
        assert_eq!(session.mode(), &Mode::Normal);
        assert_eq!(session.input().value(), "counter");
    }

    #[test]
    fn tab_on_empty_line_copies_placeholder_statement() {
        let runtime = ScriptedRuntime::new();
        let options = SessionOptions {
            placeholder: Some(format!("1 + 1{}", crate::session::help::PLACEHOLDER_SUFFIX)),
            ..SessionOptions::default()
        };
        let session = Session::new(options, HistoryStore::default());
        assert_eq!(
            session.view().plain_lines()[0],
            format!("⧐  1 + 1{}", crate::session::help::PLACEHOLDER_SUFFIX)
        );
        let (session, _) = press(session, &runtime, &[Key::Tab]);
        assert_eq!(session.input().value(), "1 + 1");
        let (session, _) = press(session, &runtime, &[Key::Enter]);
        assert_eq!(session.input().placeholder(), None);
    }

    #[test]
    fn search_scenario_walks_back_through_matches() {
        let runtime = ScriptedRuntime::new();
        let session = session_with(&["foo=1", "bar=2", "foo=3"]);
        let (session, _) = press(session, &runtime, &[Key::Ctrl('r')]);
        assert!(!session.input().is_focused());
        let session = type_text(session, &runtime, "foo");
        assert_eq!(session.input().value(), "foo=3");
        assert!(matches!(session.mode(), Mode::Searching(s) if s.position() == 2));

        let (session, _) = press(session, &runtime, &[Key::Ctrl('r')]);
        assert_eq!(session.input().value(), "foo=1");
        assert!(matches!(session.mode(), Mode::Searching(s) if s.position() == 0));

        let (session, _) = press(session, &runtime, &[Key::Ctrl('r')]);
        assert_eq!(session.input().value(), "foo=1");
        assert!(matches!(session.mode(), Mode::Searching(s) if s.position() == 2));

        let (session, effects) = press(session, &runtime, &[Key::Enter]);
        assert!(effects.is_empty());
        assert_eq!(session.mode(), &Mode::Normal);
        assert_eq!(session.input().value(), "foo=1");
        assert!(session.input().is_focused());
    }

    #[test]
    fn abandoning_search_restores_previous_input() {
        let runtime = ScriptedRuntime::new();
        let session = type_text(session_with(&["abc"]), &runtime, "mine");
        let (session, _) = press(session, &runtime, &[Key::Ctrl('r'), Key::Char('a')]);
        assert_eq!(session.input().value(), "abc");
        let (session, _) = press(session, &runtime, &[Key::Backspace]);
        assert_eq!(session.input().value(), "");
        let (session, _) = press(session, &runtime, &[Key::Ctrl('c')]);
        assert_eq!(session.mode(), &Mode::Normal);
        assert_eq!(session.input().value(), "mine");
    }

    #[test]
    fn quit_help_interrupt_and_clear() {
        let runtime = ScriptedRuntime::new();
        let session = type_text(session_with(&[]), &runtime, "help");
        let (session, effects) = press(session, &runtime, &[Key::Enter]);
        assert!(printed(&effects).len() > 5);
        assert!(session.input().is_empty());

        let session = type_text(session, &runtime, "oops");
        let (session, effects) = press(session, &runtime, &[Key::Ctrl('c')]);
        assert_eq!(printed(&effects), vec!["⧐  oops".to_string()]);
        assert!(session.input().is_empty());

        let (session, effects) = press(session, &runtime, &[Key::Ctrl('l')]);
        assert_eq!(effects, vec![Effect::ClearScreen]);

        let session = type_text(session, &runtime, "quit");
        let (session, effects) = press(session, &runtime, &[Key::Enter]);
        assert_eq!(effects.last(), Some(&Effect::Quit));
        assert_eq!(session.history().entries(), &["help".to_string(), "quit".to_string()]);
    }

    #[test]
    fn view_shows_suggestions_and_search_rows() {
        let runtime = ScriptedRuntime::new()
            .with_binding("alpha", RuntimeValue::Str("a".repeat(60)))
            .with_binding("alps", RuntimeValue::Number(1.0));
        let session = type_text(session_with(&[]), &runtime, "al");
        let (session, _) = press(session, &runtime, &[Key::Tab, Key::Tab]);
        let rows = session.view().plain_lines();
        assert_eq!(rows[1], format!(" → alpha # {}...", "a".repeat(50)));
        assert_eq!(rows[2], "   alps");

        let (session, _) = press(session, &runtime, &[Key::Esc, Key::Ctrl('r'), Key::Char('z')]);
        let view = session.view();
        assert_eq!(view.plain_lines()[1], " search: z");
        assert_eq!(view.cursor, Some(CursorPos { row: 1, column: 10 }));
    }

    #[test]
    fn debug_panel_lists_counters() {
        let runtime = ScriptedRuntime::new();
        let options = SessionOptions {
            debug: true,
            ..SessionOptions::default()
        };
        let session = Session::new(options, HistoryStore::new(vec!["a".into()]));
        let (session, _) = press(session, &runtime, &[Key::Up]);
        let rows = session.view().plain_lines();
        assert!(rows.contains(&"  history_index: 0".to_string()));
        assert!(rows.contains(&"  max_history_index: 0".to_string()));
        assert!(rows.contains(&"  is_evaluating: false".to_string()));
        assert!(rows.contains(&"  search_position: -1".to_string()));
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        fn key_strategy() -> impl Strategy<Value = Key> {
            prop_oneof![
                4 => prop::sample::select(vec!['a', 'l', 'p', '.', ' ']).prop_map(Key::Char),
                1 => Just(Key::Enter),
                2 => Just(Key::Tab),
                2 => Just(Key::Up),
                2 => Just(Key::Down),
                1 => Just(Key::Left),
                1 => Just(Key::Backspace),
                1 => Just(Key::Ctrl('r')),
                1 => Just(Key::Ctrl('c')),
                1 => Just(Key::Ctrl('w')),
            ]
        }

        proptest! {
            #[test]
            fn every_key_sequence_keeps_the_session_consistent(
                keys in proptest::collection::vec(key_strategy(), 0..60),
                finish_evaluations in proptest::bool::ANY,
            ) {
                let runtime = ScriptedRuntime::new()
                    .with_binding("alpha", RuntimeValue::Number(1.0))
                    .with_binding("alps", RuntimeValue::Number(2.0));
                let mut session = session_with(&["alpha", "alps + 1", "pal"]);

                for key in keys {
                    let (next, effects) = session.update(Msg::Key(key), &runtime);
                    session = next;
                    for effect in effects {
                        if let Effect::StartEvaluation { id, source } = effect {
                            if finish_evaluations {
                                let result = runtime.run(&source);
                                let (next, _) =
                                    session.update(Msg::EvalDone { id, result }, &runtime);
                                session = next;
                            }
                        }
                    }

                    prop_assert!(session.input().cursor() <= char_count(session.input().value()));
                    if let Some(index) = session.history_index() {
                        prop_assert!(index < session.history().len());
                    }
                    match session.mode() {
                        Mode::Normal => prop_assert!(session.input().is_focused()),
                        Mode::Searching(search) => {
                            prop_assert!(!session.input().is_focused());
                            prop_assert!(search.position() < session.history().len().max(1));
                        }
                        Mode::Suggesting { candidates, selected, .. } => {
                            prop_assert!(candidates.len() > 1);
                            if let Some(selected) = selected {
                                prop_assert!(*selected < candidates.len());
                            }
                        }
                        Mode::Evaluating { .. } => prop_assert!(session.view().cursor.is_none()),
                    }
                }
            }
        }
    }
}
