use vela_engine::logging::{init_logging, LoggingConfig};
use vela_engine::window::{Runtime, RuntimeConfig};
use vela_examples::Cubes;

fn main() {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig::from_env("vela - 01-cubes");
    match Runtime::run(config, Box::new(Cubes::new())) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    }
}
