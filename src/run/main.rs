// run — the periodic entry point (cron invokes this with no arguments).
// Resolves its own directory, runs the scraper there, and prints the
// instructions for serving the map.

use anyhow::Result;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let dir = txbwn::runner::install_dir()?;
    match txbwn::runner::run_in(&dir)? {
        0 => Ok(()),
        code => std::process::exit(code),
    }
}
