use std::path::PathBuf;

use crate::project;

pub fn run(config: Option<PathBuf>) -> anyhow::Result<()> {
    let loaded = project::load_config(config.as_deref())?;
    loaded.config.validate()?;

    let scene = loaded.config.scene();
    println!("{} is valid", loaded.source());
    println!("  scripts:  {}", loaded.config.scripts.len());
    println!("  surface:  #{}", scene.surface_id);
    println!("  card:     `{}` at {}", scene.card.name, scene.card.position);
    println!("  shadows:  {}", if scene.shadows.is_some() { "on" } else { "off" });
    println!("  physics:  {:?}, gravity {}", scene.physics.order, scene.physics.gravity);
    Ok(())
}
