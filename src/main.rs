use clap::Parser;

use epaper_badge::{hardware, Config, Interrupt, Routine, Session};

/// Draw on the Waveshare 2.13" black/red e-paper HAT
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Routine to run: name_badge, badge_img, clear or demo
    routine: Option<String>,
}

// https://docs.rs/env_logger/latest/env_logger/
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let cli = Cli::parse();
    let routine = Routine::resolve(cli.routine.as_deref());

    let config = Config::from_env()?;
    log::debug!("{:?}", config);

    let interrupt = Interrupt::install()?;

    let driver = match hardware::open(&config) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("{:#}", e);
            return Ok(());
        }
    };

    let mut session = Session::new(driver, config, interrupt);
    // run() logs its own failures and always leaves the panel asleep
    let _ = session.run(routine);

    Ok(())
}
