use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{PhysicsOrder, SceneConfig};
use crate::engine::{CameraAxes, EngineApi};
use crate::error::BootstrapError;

/// Per-frame data handed to the game loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Number of frames rendered before this one.
    pub frame: u64,
    pub camera: CameraAxes,
}

/// Per-frame gameplay hook, run before each rendered frame.
pub trait GameLoop {
    fn tick(&mut self, _frame: &FrameContext) {}
}

/// The default game loop: does nothing.
#[derive(Debug, Default)]
pub struct IdleGameLoop;

impl GameLoop for IdleGameLoop {}

/// Handles of a fully built scene. Keeps the scene reachable for the caller.
pub struct SceneContext<A: EngineApi> {
    pub api: Rc<A>,
    pub surface: A::Surface,
    pub engine: A::Engine,
    pub scene: A::Scene,
    pub camera: A::Camera,
    pub light: A::Light,
    pub shadows: Option<A::ShadowGenerator>,
    pub ground: A::Mesh,
    pub card: A::Mesh,
    pub physics: A::Physics,
}

impl<A: EngineApi> SceneContext<A> {
    pub fn resize(&self) {
        self.api.resize(&self.engine);
    }
}

/// Builds the demo scene through an [`EngineApi`] and starts its render loop.
pub struct Bootstrapper<A: EngineApi> {
    api: Rc<A>,
    config: SceneConfig,
    game_loop: Rc<RefCell<dyn GameLoop>>,
}

impl<A: EngineApi + 'static> Bootstrapper<A> {
    pub fn new(api: Rc<A>, config: SceneConfig) -> Self {
        Self {
            api,
            config,
            game_loop: Rc::new(RefCell::new(IdleGameLoop)),
        }
    }

    pub fn with_game_loop(mut self, game_loop: impl GameLoop + 'static) -> Self {
        self.game_loop = Rc::new(RefCell::new(game_loop));
        self
    }

    /// Build the scene and hand it to the engine's render loop.
    ///
    /// Nothing is constructed when the render surface is missing, and no scene
    /// is built when the engine yields no instance. Failures are logged here and
    /// returned to the caller.
    pub async fn run(self) -> Result<SceneContext<A>, BootstrapError> {
        let result = self.build().await;
        if let Err(e) = &result {
            log::error!("{e}");
        }
        result
    }

    async fn build(self) -> Result<SceneContext<A>, BootstrapError> {
        let api = &self.api;
        let config = &self.config;
        config.validate()?;

        let surface = api
            .find_surface(&config.surface_id)
            .ok_or_else(|| BootstrapError::SurfaceNotFound {
                id: config.surface_id.clone(),
            })?;

        let engine = api
            .create_engine(&surface, &config.engine)
            .ok_or(BootstrapError::EngineUnavailable)?;
        log::info!("Engine created on #{}", config.surface_id);

        let mut physics = None;
        if config.physics.order == PhysicsOrder::BeforeSceneGraph {
            physics = Some(api.init_physics().await?);
        }

        let scene = api.create_scene(&engine)?;

        let camera = api.create_camera(&scene, &config.camera)?;
        let camera = camera.ok_or(BootstrapError::MissingCapability("camera"))?;
        if config.camera.attach_control {
            api.attach_camera_control(&camera, &surface)?;
        }
        api.bind_camera_keys(&camera, &config.camera.keys)?;

        let light = api.create_hemispheric_light(&scene, &config.light)?;
        let shadows = match &config.shadows {
            Some(shadow_config) => Some(api.create_shadow_generator(&scene, shadow_config)?),
            None => None,
        };

        let ground = api.create_ground(&scene, &config.ground)?;
        let card = api.create_card(&scene, &config.card)?;

        let physics = match physics {
            Some(physics) => physics,
            None => api.init_physics().await?,
        };
        api.enable_physics(&scene, config.physics.gravity, &physics)?;
        api.add_physics_body(&scene, &ground, &config.ground.body)?;
        api.add_physics_body(&scene, &card, &config.card.body)?;

        if let Some(shadows) = &shadows {
            api.add_shadow_caster(shadows, &card, &ground)?;
        }

        api.run_render_loop(&engine, self.frame_callback(&scene, &camera))?;

        let resize_api = Rc::clone(api);
        let resize_engine = engine.clone();
        api.on_resize(Box::new(move || resize_api.resize(&resize_engine)))?;

        log::info!("Scene ready: {} and {} on the ground", config.camera.name, config.card.name);

        Ok(SceneContext {
            api: Rc::clone(api),
            surface,
            engine,
            scene,
            camera,
            light,
            shadows,
            ground,
            card,
            physics,
        })
    }

    /// Renders the scene only on frames where it has an active camera.
    fn frame_callback(&self, scene: &A::Scene, camera: &A::Camera) -> Box<dyn FnMut()> {
        let api = Rc::clone(&self.api);
        let game_loop = Rc::clone(&self.game_loop);
        let scene = scene.clone();
        let camera = camera.clone();
        let mut frame = 0u64;

        Box::new(move || {
            if !api.has_active_camera(&scene) {
                return;
            }
            let ctx = FrameContext {
                frame,
                camera: api.camera_axes(&camera),
            };
            game_loop.borrow_mut().tick(&ctx);
            api.render(&scene);
            frame += 1;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::trace::{Call, RecordingEngine};

    fn bootstrap(
        engine: &Rc<RecordingEngine>,
        config: SceneConfig,
    ) -> Result<SceneContext<RecordingEngine>, BootstrapError> {
        pollster::block_on(Bootstrapper::new(Rc::clone(engine), config).run())
    }

    fn position(calls: &[Call], pred: impl Fn(&Call) -> bool) -> usize {
        calls.iter().position(pred).expect("call not recorded")
    }

    #[test]
    fn test_classic_bootstrap_order() {
        let engine = Rc::new(RecordingEngine::new());
        bootstrap(&engine, SceneConfig::default()).unwrap();
        let calls = engine.calls();

        assert!(matches!(calls[0], Call::FindSurface(ref id) if id == "renderCanvas"));
        assert!(matches!(calls[1], Call::CreateEngine { .. }));
        assert!(matches!(calls[2], Call::CreateScene));

        let card = position(&calls, |c| matches!(c, Call::CreateCard(_)));
        let init = position(&calls, |c| matches!(c, Call::InitPhysics));
        let enable = position(&calls, |c| matches!(c, Call::EnablePhysics { .. }));
        let bodies: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::AddPhysicsBody { .. }))
            .map(|(i, _)| i)
            .collect();
        let render_loop = position(&calls, |c| matches!(c, Call::RunRenderLoop));

        assert!(card < init, "physics starts after the scene graph");
        assert!(init < enable);
        assert_eq!(bodies.len(), 2);
        assert!(bodies.iter().all(|&b| b > enable && b < render_loop));
        assert!(matches!(calls.last(), Some(Call::OnResize)));
        assert!(!calls.iter().any(|c| matches!(c, Call::CreateShadowGenerator(_))));
    }

    #[test]
    fn test_shadowed_starts_physics_first() {
        let engine = Rc::new(RecordingEngine::new());
        let ctx = bootstrap(&engine, Preset::Shadowed.config()).unwrap();
        let calls = engine.calls();

        let init = position(&calls, |c| matches!(c, Call::InitPhysics));
        let scene = position(&calls, |c| matches!(c, Call::CreateScene));
        let enable = position(&calls, |c| matches!(c, Call::EnablePhysics { .. }));
        assert!(init < scene);
        assert!(init < enable);
        assert_eq!(calls.iter().filter(|c| matches!(c, Call::InitPhysics)).count(), 1);

        assert!(ctx.shadows.is_some());
        assert!(calls.iter().any(|c| matches!(c, Call::AddShadowCaster)));
        assert!(calls.iter().any(|c| matches!(c, Call::CreateCard(name) if name == "card")));
    }

    #[test]
    fn test_missing_surface_constructs_nothing() {
        let engine = Rc::new(RecordingEngine::new().without_surface());
        let err = bootstrap(&engine, SceneConfig::default()).err().unwrap();

        assert_eq!(
            err,
            BootstrapError::SurfaceNotFound {
                id: "renderCanvas".into()
            }
        );
        assert!(err.to_string().starts_with("Canvas not found!"));
        assert_eq!(engine.calls(), vec![Call::FindSurface("renderCanvas".into())]);
    }

    #[test]
    fn test_missing_engine_halts_before_scene() {
        let engine = Rc::new(RecordingEngine::new().without_engine());
        let err = bootstrap(&engine, SceneConfig::shadowed()).err().unwrap();

        assert_eq!(err, BootstrapError::EngineUnavailable);
        let calls = engine.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[1], Call::CreateEngine { .. }));
    }

    #[test]
    fn test_missing_camera_is_an_error() {
        let engine = Rc::new(RecordingEngine::new().without_camera());
        let err = bootstrap(&engine, SceneConfig::default()).err().unwrap();

        assert_eq!(err, BootstrapError::MissingCapability("camera"));
        assert!(!engine.calls().iter().any(|c| matches!(c, Call::AttachControl)));
        assert!(!engine.is_rendering());
    }

    #[test]
    fn test_physics_failure_propagates() {
        let engine = Rc::new(RecordingEngine::new().with_failing_physics());
        let err = bootstrap(&engine, SceneConfig::default()).err().unwrap();

        assert!(matches!(err, BootstrapError::Engine(_)));
        assert!(!engine.calls().iter().any(|c| matches!(c, Call::EnablePhysics { .. })));
    }

    #[test]
    fn test_invalid_config_constructs_nothing() {
        let engine = Rc::new(RecordingEngine::new());
        let mut config = SceneConfig::default();
        config.ground.width = -1.0;

        let err = bootstrap(&engine, config).err().unwrap();
        assert!(matches!(err, BootstrapError::Config(_)));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_render_requires_active_camera() {
        let engine = Rc::new(RecordingEngine::new());
        bootstrap(&engine, SceneConfig::default()).unwrap();

        engine.set_active_camera(false);
        engine.run_frames(3);
        assert_eq!(engine.render_count(), 0);

        engine.set_active_camera(true);
        engine.run_frames(2);
        assert_eq!(engine.render_count(), 2);
    }

    #[test]
    fn test_each_resize_forwarded_once() {
        let engine = Rc::new(RecordingEngine::new());
        let ctx = bootstrap(&engine, SceneConfig::default()).unwrap();

        for _ in 0..5 {
            engine.fire_resize();
        }
        assert_eq!(engine.resize_count(), 5);

        ctx.resize();
        assert_eq!(engine.resize_count(), 6);
    }

    struct CountingLoop {
        ticks: Rc<RefCell<Vec<FrameContext>>>,
    }

    impl GameLoop for CountingLoop {
        fn tick(&mut self, frame: &FrameContext) {
            self.ticks.borrow_mut().push(*frame);
        }
    }

    #[test]
    fn test_game_loop_ticks_on_rendered_frames() {
        let engine = Rc::new(RecordingEngine::new());
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let bootstrapper = Bootstrapper::new(Rc::clone(&engine), SceneConfig::default())
            .with_game_loop(CountingLoop {
                ticks: Rc::clone(&ticks),
            });
        pollster::block_on(bootstrapper.run()).unwrap();

        engine.run_frames(2);
        engine.set_active_camera(false);
        engine.run_frames(1);

        let ticks = ticks.borrow();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].frame, 0);
        assert_eq!(ticks[1].frame, 1);
        assert_eq!(ticks[0].camera, CameraAxes::default());
    }
}
