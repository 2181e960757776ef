use pretty_assertions::assert_eq;
use simple_interpreter::{Environment, Evaluator, Lexer, Object, Parser};

fn run(source: &str) -> String {
    let env = Environment::new().into_shared();
    let mut evaluator = Evaluator::with_output(Vec::new());

    let result = evaluator
        .interpret(source, &env)
        .unwrap_or_else(|errors| panic!("parse errors in {:?}: {:?}", source, errors));
    result.to_string()
}

fn run_with_output(source: &str) -> (String, String) {
    let env = Environment::new().into_shared();
    let mut evaluator = Evaluator::with_output(Vec::new());

    let result = evaluator
        .interpret(source, &env)
        .unwrap_or_else(|errors| panic!("parse errors in {:?}: {:?}", source, errors));
    let printed = String::from_utf8(evaluator.into_output()).expect("utf-8 output");
    (result.to_string(), printed)
}

#[test]
fn programs_produce_expected_values() {
    let cases = [
        ("5 + 5 * 2", "15"),
        ("(5 + 5) * 2", "20"),
        ("-7 / 2", "-3"),
        ("2147483647 + 1", "-2147483648"),
        ("1 < 2 == true", "true"),
        ("append(\"foo\", \"bar\")", "\"foobar\""),
        ("if (1 > 2) { 10 }", "null"),
        ("let a = [1, 2, 3]\na[-1]", "3"),
        ("let f = fn(x) { fn(y) { x + y } }\nf(2)(3)", "5"),
    ];

    for (source, expected) in cases.iter() {
        assert_eq!(run(source), *expected, "source: {}", source);
    }
}

#[test]
fn recursive_functions() {
    let fib = "
        let fib = fn(n) {
            if (n < 2) { return n }
            fib(n - 1) + fib(n - 2)
        }
        fib(12)";
    assert_eq!(run(fib), "144");

    let reduce = "
        let reduce = fn(arr, acc, f) {
            if (len(arr) == 0) { acc } else { reduce(rest(arr), f(acc, first(arr)), f) }
        }
        reduce([1, 2, 3, 4], 0, fn(a, b) { a + b })";
    assert_eq!(run(reduce), "10");
}

#[test]
fn while_loop_with_postfix_counter() {
    let source = "
        let i = 0
        let total = 0
        while (i < 5) {
            let total = total + i
            i++
        }
        i";
    assert_eq!(run(source), "5");
}

#[test]
fn print_writes_to_the_configured_output() {
    let (result, printed) = run_with_output("print(\"hi\", 1 + 2, [1, true])");

    assert_eq!(result, "null");
    assert_eq!(printed, "\"hi\"\n3\n[1,true]\n");
}

#[test]
fn errors_stop_evaluation() {
    let (result, printed) = run_with_output("print(1)\n10 / 0\nprint(2)");

    assert_eq!(result, "Division by zero");
    assert_eq!(printed, "1\n");
    assert_eq!(run("let x = 5\nx()"), "Cannot invoke INTEGER: not a FUNCTION");
}

#[test]
fn bindings_persist_across_programs() {
    let env = Environment::new().into_shared();
    let mut evaluator = Evaluator::with_output(std::io::sink());

    let first = evaluator.interpret("let counter = 41", &env);
    let second = evaluator.interpret("counter++\ncounter", &env);

    assert_eq!(first, Ok(Object::Null));
    assert_eq!(second, Ok(Object::Integer(42)));
}

#[test]
fn malformed_programs_report_parse_errors() {
    let errors = Parser::new(Lexer::new("let x 5"))
        .parse_program()
        .expect_err("missing assignment");

    assert_eq!(
        errors[0].to_string(),
        "Unexpected token (INT, '5'), expected ASSIGN"
    );
}
