use simple_interpreter::{init_tracing, repl, Config, Environment};
use std::fs;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = match &config.file {
        Some(path) => fs::read_to_string(path).and_then(|source| {
            let env = Environment::new().into_shared();
            repl::execute(&config, &source, &env, &mut io::stdout())
        }),
        None => {
            println!("Hello! This is the simple interpreter, in {} mode.", config.mode);
            println!("Feel free to type in commands, or an empty line to quit");
            repl::start(&config, io::stdin().lock(), io::stdout())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
