use std::path::PathBuf;

use crate::project;

pub fn run(config: Option<PathBuf>) -> anyhow::Result<()> {
    let loaded = project::load_config(config.as_deref())?;
    let scripts = &loaded.config.scripts;

    println!("{} scripts from {}:", scripts.len(), loaded.source());
    for (i, url) in scripts.iter().enumerate() {
        println!("{:>3}. {url}", i + 1);
    }
    println!("hosts: {}", scripts.hosts().join(", "));
    Ok(())
}
