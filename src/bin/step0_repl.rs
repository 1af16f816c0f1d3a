use mal_core::cmdline;
use std::convert::Infallible;

fn read(line: &str) -> &str {
    line
}

fn eval(line: &str) -> &str {
    line
}

fn print(line: &str) -> &str {
    line
}

fn rep(line: &str) -> Result<String, Infallible> {
    Ok(print(eval(read(line))).to_string())
}

fn main() -> Result<(), cmdline::Error> {
    pretty_env_logger::init();
    cmdline::run(rep)
}
