use std::path::PathBuf;
use std::rc::Rc;

use cardtable_shared::trace::{Call, RecordingEngine};
use cardtable_shared::{AppConfig, Bootstrapper, Preset, SceneConfig};

use crate::project;

pub struct PlanArgs {
    pub config: Option<PathBuf>,
    pub preset: Option<Preset>,
    pub frames: usize,
    pub resizes: usize,
    pub no_surface: bool,
    pub no_engine: bool,
}

/// What a dry run recorded.
pub struct Plan {
    pub calls: Vec<Call>,
    pub renders: u64,
    pub resizes: u64,
}

pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    let loaded = project::load_config(args.config.as_deref())?;
    println!("Bootstrap plan for {}:", loaded.source());

    let (plan, result) = dry_run(resolve_scene(loaded.config, args.preset), &args);
    for (i, call) in plan.calls.iter().enumerate() {
        println!("{:>3}. {call}", i + 1);
    }

    match result {
        Ok(()) => {
            println!(
                "{} frame(s) rendered, {} resize(s) forwarded",
                plan.renders, plan.resizes
            );
            Ok(())
        }
        Err(e) => anyhow::bail!("bootstrap aborted: {e}"),
    }
}

/// The scene to plan. A preset given on the command line replaces the config's
/// own scene, including a `[scene]` table.
pub fn resolve_scene(mut config: AppConfig, preset: Option<Preset>) -> SceneConfig {
    if let Some(preset) = preset {
        config.preset = Some(preset);
        config.scene = None;
    }
    config.scene()
}

/// Run the bootstrapper against the recording engine, then drive frames and resizes.
pub fn dry_run(scene: SceneConfig, args: &PlanArgs) -> (Plan, Result<(), cardtable_shared::BootstrapError>) {
    let mut engine = RecordingEngine::new();
    if args.no_surface {
        engine = engine.without_surface();
    }
    if args.no_engine {
        engine = engine.without_engine();
    }
    let engine = Rc::new(engine);

    let result = pollster::block_on(Bootstrapper::new(Rc::clone(&engine), scene).run());
    let result = result.map(|_context| {
        engine.run_frames(args.frames);
        for _ in 0..args.resizes {
            engine.fire_resize();
        }
    });

    let plan = Plan {
        calls: engine.calls(),
        renders: engine.render_count(),
        resizes: engine.resize_count(),
    };
    (plan, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init_cmd::write_config;
    use cardtable_shared::BootstrapError;

    fn args() -> PlanArgs {
        PlanArgs {
            config: None,
            preset: None,
            frames: 3,
            resizes: 2,
            no_surface: false,
            no_engine: false,
        }
    }

    #[test]
    fn test_dry_run_drives_frames_and_resizes() {
        let (plan, result) = dry_run(SceneConfig::default(), &args());
        result.unwrap();
        assert_eq!(plan.renders, 3);
        assert_eq!(plan.resizes, 2);
        assert!(matches!(plan.calls.first(), Some(Call::FindSurface(_))));
    }

    #[test]
    fn test_dry_run_without_surface() {
        let mut args = args();
        args.no_surface = true;
        let (plan, result) = dry_run(SceneConfig::default(), &args);

        assert!(matches!(result, Err(BootstrapError::SurfaceNotFound { .. })));
        assert_eq!(plan.calls.len(), 1);
        assert_eq!(plan.renders, 0);
    }

    #[test]
    fn test_dry_run_without_engine() {
        let mut args = args();
        args.no_engine = true;
        let (plan, result) = dry_run(SceneConfig::shadowed(), &args);

        assert_eq!(result, Err(BootstrapError::EngineUnavailable));
        assert!(!plan.calls.iter().any(|c| matches!(c, Call::CreateScene)));
    }

    #[test]
    fn test_preset_overrides_initialized_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), Preset::Shadowed, false).unwrap();
        let config = project::read_config(&path).unwrap();
        assert_eq!(config.scene(), SceneConfig::shadowed());

        let scene = resolve_scene(config, Some(Preset::Classic));
        assert_eq!(scene, SceneConfig::default());

        let (plan, result) = dry_run(scene, &args());
        result.unwrap();
        assert!(plan.calls.contains(&Call::CreateCard("card1".into())));
        assert!(!plan.calls.iter().any(|c| matches!(c, Call::CreateShadowGenerator(_))));
    }

    #[test]
    fn test_config_scene_kept_without_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), Preset::Shadowed, false).unwrap();
        let config = project::read_config(&path).unwrap();

        assert_eq!(resolve_scene(config, None), SceneConfig::shadowed());
    }
}
