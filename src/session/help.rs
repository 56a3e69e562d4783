//! Example statements used for the placeholder and the `help` command.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::session::view::{SpanStyle, StyledLine};

pub const PLACEHOLDER_SUFFIX: &str = " # just something you can run... (tab + enter)";

const HELP_EXAMPLE_COUNT: usize = 5;

pub const EXAMPLES: &[&str] = &[
    "\"hello\".upper()",
    "[1, 2, 3].sum()",
    "user = {name: \"ada\", age: 36}; user.keys()",
    "\"a,b,c\".split(\",\").len()",
    "echo(\"hi there\")",
    "x = 40 + 2; x * 2",
    "[\"x\", \"y\"].join(\" - \")",
    "\"quill\".type()",
    "name = stdin(); \"hi \" + name",
    "sleep(2000); \"done\"",
    "{a: 1, b: 2}.values()",
    "len(\"ünïcödé\")",
];

/// Random example plus the placeholder hint.
pub fn placeholder<R: Rng + ?Sized>(rng: &mut R) -> String {
    let example = EXAMPLES.choose(rng).copied().unwrap_or("1 + 1");
    format!("{example}{PLACEHOLDER_SUFFIX}")
}

/// Strip the hint from a placeholder so it can be run as-is.
pub fn placeholder_statement(placeholder: &str) -> &str {
    placeholder
        .strip_suffix(PLACEHOLDER_SUFFIX)
        .unwrap_or(placeholder)
}

/// Output of the `help` command.
pub fn help_lines<R: Rng + ?Sized>(rng: &mut R) -> Vec<StyledLine> {
    let mut lines = vec![
        StyledLine::plain("Try any of these statements:"),
        StyledLine::plain(""),
    ];
    lines.extend(
        EXAMPLES
            .choose_multiple(rng, HELP_EXAMPLE_COUNT)
            .map(|example| StyledLine::single(format!("    {example}"), SpanStyle::Code)),
    );
    lines.push(StyledLine::plain(""));
    lines.push(StyledLine::single(
        "tab: complete · ctrl-r: search history · up/down: history · ctrl-l: clear · esc: quit",
        SpanStyle::Faint,
    ));
    lines
}

/// Startup banner.
pub fn welcome_lines(user: &str) -> Vec<StyledLine> {
    vec![
        StyledLine::plain(format!("Hello {user}, welcome to quill!")),
        StyledLine::single(
            "Type 'quit' when you're done, 'help' if you get lost!",
            SpanStyle::Faint,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn placeholder_round_trips_to_an_example() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = placeholder(&mut rng);
        assert!(text.ends_with(PLACEHOLDER_SUFFIX));
        assert!(EXAMPLES.contains(&placeholder_statement(&text)));
    }

    #[test]
    fn help_shows_five_distinct_examples() {
        let mut rng = StdRng::seed_from_u64(1);
        let lines = help_lines(&mut rng);
        let examples: Vec<&StyledLine> = lines
            .iter()
            .filter(|line| line.spans[0].style == SpanStyle::Code)
            .collect();
        assert_eq!(examples.len(), 5);
        let mut texts: Vec<String> = examples.iter().map(|l| l.text()).collect();
        texts.dedup();
        assert_eq!(texts.len(), 5);
    }
}
