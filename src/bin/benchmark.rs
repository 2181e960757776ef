use simple_interpreter::{Environment, Evaluator, Lexer, Parser};
use std::env;
use std::io;
use std::time::Instant;

static DEFINITION: &str = "let fibonacci = fn(x) {
if (x == 0) { 0
     } else {
       if (x == 1) {
         return 1
       } else {
         fibonacci(x - 1) + fibonacci(x - 2)
       }
} }";

fn main() {
    let n: u32 = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(25);

    let program = Parser::new(Lexer::new(format!("{}\nfibonacci({})", DEFINITION, n)))
        .parse_program()
        .expect("Parse errors found");

    let env = Environment::new().into_shared();
    let mut evaluator = Evaluator::with_output(io::sink());

    let start = Instant::now();
    let result = evaluator.eval(&program, &env);
    let duration = start.elapsed();

    println!(
        "n={}, result={}, duration={}",
        n,
        result,
        duration.as_secs_f64(),
    );
}
