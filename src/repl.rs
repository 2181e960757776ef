use crate::config::{Config, Mode};
use crate::environment::{Env, Environment};
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::{ParseError, Parser};
use std::io::{self, BufRead, Write};
use tracing::debug;

static PROMPT: &str = ">> ";
static PROMPT_CONTINUE: &str = ".. ";

/// Runs an interactive session until a blank entry or end of input.
/// Bindings made in evaluator mode persist across entries.
pub fn start<R: BufRead, W: Write>(config: &Config, mut input: R, mut output: W) -> io::Result<()> {
    debug!(mode = %config.mode, "session started");
    let env = Environment::new().into_shared();

    while let Some(entry) = read_entry(&mut input, &mut output)? {
        execute(config, &entry, &env, &mut output)?;
    }
    Ok(())
}

/// Runs `source` through the stage selected by `config.mode`.
pub fn execute<W: Write>(config: &Config, source: &str, env: &Env, output: &mut W) -> io::Result<()> {
    match config.mode {
        Mode::Lexer => {
            for token in Lexer::new(source) {
                writeln!(output, "{}", token)?;
            }
        }
        Mode::Parser => match Parser::new(Lexer::new(source)).parse_program() {
            Ok(program) => writeln!(output, "{}", program)?,
            Err(errors) => print_parse_errors(output, &errors)?,
        },
        Mode::Evaluator => {
            let result = Evaluator::with_output(&mut *output)
                .empty_sequence(config.empty_sequence)
                .interpret(source, env);

            match result {
                Ok(Object::Error(err)) => writeln!(output, "ERROR: {}", err)?,
                Ok(value) => writeln!(output, "{}", value)?,
                Err(errors) => print_parse_errors(output, &errors)?,
            }
        }
    }
    output.flush()
}

fn print_parse_errors<W: Write>(output: &mut W, errors: &[ParseError]) -> io::Result<()> {
    for err in errors.iter() {
        writeln!(output, "\t{}", err)?;
    }
    Ok(())
}

/// Reads lines until every `(`, `[` and `{` is closed. `None` ends the session.
fn read_entry<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<String>> {
    let mut entry = String::new();
    let mut prompt = PROMPT;

    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Some(entry).filter(|e| !e.trim().is_empty()));
        }
        entry.push_str(&line);

        if entry.trim().is_empty() {
            return Ok(None);
        }
        if !has_open_brackets(&entry) {
            return Ok(Some(entry));
        }
        prompt = PROMPT_CONTINUE;
    }
}

fn has_open_brackets(text: &str) -> bool {
    let mut depth = 0;
    let mut in_string = false;

    for c in text.chars() {
        match c {
            '"' => in_string = !in_string,
            '(' | '[' | '{' if !in_string => depth += 1,
            ')' | ']' | '}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth > 0
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::builtins::EmptySequence;
    use std::io::Cursor;

    fn run(mode: Mode, input: &str) -> String {
        let config = Config {
            mode,
            ..Config::default()
        };
        let mut output = Vec::new();
        start(&config, Cursor::new(input), &mut output).expect("in-memory io");
        String::from_utf8_lossy(&output).into_owned()
    }

    #[test]
    fn test_open_brackets() {
        assert!(has_open_brackets("let f = fn(x) {"));
        assert!(has_open_brackets("[1, (2"));
        assert!(!has_open_brackets("let f = fn(x) { x }"));
        assert!(!has_open_brackets("\"{\""));
        assert!(!has_open_brackets("1 + 2"));
    }

    #[test]
    fn test_lexer_mode() {
        assert_eq!(
            run(Mode::Lexer, "1+a\n\n"),
            ">> (INT, '1')\n(PLUS, '+')\n(IDENTIFIER, 'a')\n>> "
        );
    }

    #[test]
    fn test_parser_mode() {
        assert_eq!(run(Mode::Parser, "1 + 2 * 3\n"), ">> {\n\t((1 + (2 * 3)))\n}\n>> ");
        assert!(run(Mode::Parser, "let = 1\n")
            .contains("\tUnexpected token (ASSIGN, '='), expected IDENTIFIER\n"));
    }

    #[test]
    fn test_evaluator_mode() {
        let output = run(
            Mode::Evaluator,
            "let f = fn(x) {\n  x * 2\n}\nf(4)\n-true\nprint(\"hi\")\n\nf(1)\n",
        );

        assert_eq!(
            output,
            ">> .. .. null\n>> 8\n>> ERROR: Cannot apply prefix operator '-' to BOOLEAN\n>> \"hi\"\nnull\n>> "
        );
    }

    #[test]
    fn test_unclosed_entry_at_end_of_input() {
        let output = run(Mode::Evaluator, "if (true) { 1");
        assert!(output.contains("\tUnexpected token (EOF, ''), expected RBRACE\n"));
    }

    #[test]
    fn test_execute_with_policy() {
        let config = Config {
            empty_sequence: EmptySequence::Empty,
            ..Config::default()
        };
        let env = Environment::new().into_shared();
        let mut output = Vec::new();

        execute(&config, "let s = \"\"\nrest(s)", &env, &mut output).expect("in-memory io");
        assert_eq!(String::from_utf8_lossy(&output), "\"\"\n");
    }
}
