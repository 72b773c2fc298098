mod common;
mod simulate;
mod validate;

use std::path::PathBuf;

pub use simulate::SimulateArgs;

pub enum Command {
    Simulate(SimulateArgs),
    Validate {
        data: Option<PathBuf>,
        config: Option<PathBuf>,
        strict: bool,
    },
}

pub fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Simulate(args) => simulate::run_simulate(args),
        Command::Validate {
            data,
            config,
            strict,
        } => validate::run_validate(data, config, strict),
    }
}

/// Trade outcomes (including rejected trades) exit 0 and never reach here;
/// strict validation failures exit 2, every other fault 1.
pub fn exit_code(err: &str) -> i32 {
    if err.to_lowercase().contains("strict validation failed") {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::exit_code;
    use tradesim_application::validation::STRICT_FAILURE;

    #[test]
    fn strict_failures_exit_with_two() {
        assert_eq!(exit_code(STRICT_FAILURE), 2);
        assert_eq!(exit_code("failed to open price CSV data: missing"), 1);
    }
}
