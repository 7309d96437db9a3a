use anyhow::{Context, Result};
use std::env;

use railctl_store::file::STORE_DIR;
use railctl_store::FileStore;

pub fn run() -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    FileStore::init(&cwd).context("failed to initialize decision store")?;
    println!("Initialized empty railctl store in {}", cwd.join(STORE_DIR).display());
    Ok(())
}
