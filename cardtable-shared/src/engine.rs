//! The capability surface of the external 3D/physics engine.
//!
//! The bootstrapper only ever talks to the engine through [`EngineApi`]. Handles
//! are opaque to it; an implementation decides what they are (JS objects in the
//! browser, numbered ids in the recording engine).

use glam::Vec3;

use crate::config::{
    BodyConfig, CameraConfig, CardConfig, EngineOptions, GroundConfig, KeyBindings, LightConfig,
    ShadowConfig,
};
use crate::error::EngineError;

/// Unit direction vectors of a camera in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAxes {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for CameraAxes {
    fn default() -> Self {
        Self {
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }
}

/// Callback invoked by the engine once per display refresh.
pub type FrameCallback = Box<dyn FnMut()>;

/// Callback invoked once per viewport resize event.
pub type ResizeCallback = Box<dyn FnMut()>;

#[allow(async_fn_in_trait)]
pub trait EngineApi {
    type Surface: Clone + 'static;
    type Engine: Clone + 'static;
    type Scene: Clone + 'static;
    type Camera: Clone + 'static;
    type Light: Clone + 'static;
    type Mesh: Clone + 'static;
    type ShadowGenerator: Clone + 'static;
    type Physics: Clone + 'static;

    /// Find the render surface by element id.
    fn find_surface(&self, id: &str) -> Option<Self::Surface>;

    /// Construct an engine bound to `surface`. `None` when the engine yields no usable instance.
    fn create_engine(&self, surface: &Self::Surface, options: &EngineOptions) -> Option<Self::Engine>;

    fn create_scene(&self, engine: &Self::Engine) -> Result<Self::Scene, EngineError>;

    /// `None` when the engine cannot provide a camera.
    fn create_camera(
        &self,
        scene: &Self::Scene,
        config: &CameraConfig,
    ) -> Result<Option<Self::Camera>, EngineError>;

    fn attach_camera_control(
        &self,
        camera: &Self::Camera,
        surface: &Self::Surface,
    ) -> Result<(), EngineError>;

    fn bind_camera_keys(&self, camera: &Self::Camera, keys: &KeyBindings) -> Result<(), EngineError>;

    fn create_hemispheric_light(
        &self,
        scene: &Self::Scene,
        config: &LightConfig,
    ) -> Result<Self::Light, EngineError>;

    /// Directional light plus the shadow generator fed by it.
    fn create_shadow_generator(
        &self,
        scene: &Self::Scene,
        config: &ShadowConfig,
    ) -> Result<Self::ShadowGenerator, EngineError>;

    fn create_ground(&self, scene: &Self::Scene, config: &GroundConfig) -> Result<Self::Mesh, EngineError>;

    fn create_card(&self, scene: &Self::Scene, config: &CardConfig) -> Result<Self::Mesh, EngineError>;

    fn add_shadow_caster(
        &self,
        shadows: &Self::ShadowGenerator,
        caster: &Self::Mesh,
        receiver: &Self::Mesh,
    ) -> Result<(), EngineError>;

    /// Start the physics backend. Completes once the backend is ready for use.
    async fn init_physics(&self) -> Result<Self::Physics, EngineError>;

    fn enable_physics(
        &self,
        scene: &Self::Scene,
        gravity: Vec3,
        physics: &Self::Physics,
    ) -> Result<(), EngineError>;

    fn add_physics_body(
        &self,
        scene: &Self::Scene,
        mesh: &Self::Mesh,
        body: &BodyConfig,
    ) -> Result<(), EngineError>;

    /// Hand `frame` to the engine's render loop. Never returns control of the loop.
    fn run_render_loop(&self, engine: &Self::Engine, frame: FrameCallback) -> Result<(), EngineError>;

    fn has_active_camera(&self, scene: &Self::Scene) -> bool;

    fn camera_axes(&self, camera: &Self::Camera) -> CameraAxes;

    fn render(&self, scene: &Self::Scene);

    /// Register `callback` for viewport resize events.
    fn on_resize(&self, callback: ResizeCallback) -> Result<(), EngineError>;

    fn resize(&self, engine: &Self::Engine);
}
