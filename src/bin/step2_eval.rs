use mal_core::{cmdline, environment, interpreter};

fn main() -> Result<(), cmdline::Error> {
    pretty_env_logger::init();
    let options = cmdline::Options::from_args(std::env::args().skip(1))?;
    log::debug!("starting with {:?}", options);
    let env = environment::repl_env_with(options.resolution);
    cmdline::run(|line| interpreter::rep(line, &env))
}
