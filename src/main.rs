use ipnet_calc::cli::{self, CommandLine};
use ipnet_calc::config::{self, Config};
use ipnet_calc::output::render_error;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = CommandLine::parse_args();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    config::init_logging(&config.log_config);
    log::info!("#Start main() {:?}", args.command);

    if let Err(e) = cli::run(args, &config) {
        fail(&e);
    }
    Ok(())
}

fn fail(e: &ipnet_calc::Error) -> ! {
    eprint!(
        "{}",
        render_error(e.title(), &e.to_string(), e.suggestion().as_deref())
    );
    std::process::exit(1)
}
