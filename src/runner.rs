// runner.rs
// the cron-facing sequencer: enter the install directory, run the
// scraper, then tell the operator how to serve the results

use crate::settings;
use anyhow::{Context, Result};
use chrono::Local;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Port the instructional block tells the operator to serve on.
pub const SERVE_PORT: u16 = 8000;

/// Directory containing the running executable. The scraper binary and
/// its artifacts live next to it.
pub fn install_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("cannot resolve the running executable's path")?;
    let dir = exe
        .parent()
        .context("the running executable has no parent directory")?;
    dir.canonicalize()
        .with_context(|| format!("cannot resolve {}", dir.display()))
}

/// Run the whole sequence rooted at `dir`: chdir, banner, scraper,
/// instructions. Returns the process exit code.
///
/// Only entering `dir` can fail. Once the banner is out the sequence runs
/// to completion no matter what the scraper does; a non-zero scraper exit
/// only shows up in the exit code when `propagate_exit_code` is set.
pub fn run_in(dir: &Path) -> Result<i32> {
    env::set_current_dir(dir).with_context(|| format!("cannot enter {}", dir.display()))?;

    // config.toml is looked up in the install directory we just entered
    let settings = settings::load().context("invalid config.toml")?.runner;

    println!(
        "=== TX BWN Scraper Run: {} ===",
        Local::now().format("%a %b %e %H:%M:%S %Y")
    );

    let mut exit_code = 0;
    match Command::new(&settings.scraper_command).status() {
        Ok(status) if !status.success() => {
            log::warn!("scraper exited with {status}");
            if settings.propagate_exit_code {
                exit_code = status.code().unwrap_or(1);
            }
        }
        Ok(_) => {}
        // a missing scraper does not stop the sequence
        Err(e) => log::warn!("could not run {}: {e}", settings.scraper_command),
    }

    print_instructions(dir);
    Ok(exit_code)
}

fn print_instructions(dir: &Path) {
    println!();
    println!("To view the map:");
    println!("  cd {}", dir.display());
    println!("  python3 -m http.server {SERVE_PORT}");
    println!("  open http://localhost:{SERVE_PORT}");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unenterable_directory_is_fatal() {
        let err = run_in(Path::new("/nonexistent/txbwn-test-dir")).unwrap_err();
        assert!(err.to_string().contains("cannot enter"));
    }
}
