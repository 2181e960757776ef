pub mod ast;
pub mod builtins;
pub mod config;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;

pub use config::Config;
pub use environment::{Env, Environment};
pub use evaluator::Evaluator;
pub use lexer::Lexer;
pub use object::Object;
pub use parser::Parser;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber when `RUST_LOG` is set.
///
/// Enable with `RUST_LOG=simple_interpreter=debug` or `=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
