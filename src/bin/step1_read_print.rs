use mal_core::{cmdline, interpreter};

fn main() -> Result<(), cmdline::Error> {
    pretty_env_logger::init();
    cmdline::run(interpreter::read_print)
}
