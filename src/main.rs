mod codec;
mod date;
mod error;
mod menu;
mod store;

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use crate::error::{Error, Result};
use crate::menu::Menu;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the backing file (defaults to tasks.csv in the app directory)
    #[arg(long)]
    file: Option<PathBuf>,
}

/// Single-instance guard: holds the lock file for the lifetime of the
/// process and removes it on drop.
struct LockFile {
    path: PathBuf,
    _file: File,
}

impl LockFile {
    fn acquire(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join("lockfile");

        if path.exists() {
            return Err(Error::AlreadyRunning(path));
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        writeln!(file, "{}", process::id())?;
        file.flush()?;

        Ok(Self { path, _file: file })
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn app_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(Error::NoHomeDir)?;
    Ok(home_dir.join(".taskline"))
}

fn run() -> Result<()> {
    let args = Args::parse();

    let app_dir = app_dir()?;
    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    let _lock = LockFile::acquire(&app_dir)?;

    let data_file = args.file.unwrap_or_else(|| app_dir.join("tasks.csv"));
    let store = codec::load(&data_file)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(store, stdin.lock(), stdout.lock(), data_file);
    menu.run()
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
