//! An [`EngineApi`] that records calls instead of rendering anything.
//!
//! Used by the tests and by `cardtable plan` to show what the bootstrapper
//! would ask of the real engine.

use std::cell::{Cell, RefCell};
use std::fmt;

use glam::Vec3;

use crate::config::{
    BodyConfig, CameraConfig, CardConfig, EngineOptions, GroundConfig, KeyBindings, LightConfig,
    PhysicsShape, ShadowConfig,
};
use crate::engine::{CameraAxes, EngineApi, FrameCallback, ResizeCallback};
use crate::error::EngineError;

/// Opaque handle given out by the recording engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u32);

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindSurface(String),
    CreateEngine { antialias: bool, stencil: bool },
    CreateScene,
    CreateCamera(String),
    AttachControl,
    BindKeys { speed: f32 },
    CreateHemisphericLight(String),
    CreateShadowGenerator(u32),
    CreateGround(String),
    CreateCard(String),
    AddShadowCaster,
    InitPhysics,
    EnablePhysics { gravity: Vec3 },
    AddPhysicsBody { mesh: Handle, shape: PhysicsShape, mass: f32 },
    RunRenderLoop,
    OnResize,
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindSurface(id) => write!(f, "find surface #{id}"),
            Self::CreateEngine { antialias, stencil } => {
                write!(f, "create engine (antialias: {antialias}, stencil: {stencil})")
            }
            Self::CreateScene => write!(f, "create scene"),
            Self::CreateCamera(name) => write!(f, "create free camera `{name}`"),
            Self::AttachControl => write!(f, "attach camera control to surface"),
            Self::BindKeys { speed } => write!(f, "bind camera keys (speed {speed})"),
            Self::CreateHemisphericLight(name) => write!(f, "create hemispheric light `{name}`"),
            Self::CreateShadowGenerator(size) => write!(f, "create shadow generator ({size}px)"),
            Self::CreateGround(name) => write!(f, "create ground `{name}`"),
            Self::CreateCard(name) => write!(f, "create card `{name}`"),
            Self::AddShadowCaster => write!(f, "card casts shadows onto ground"),
            Self::InitPhysics => write!(f, "start physics backend"),
            Self::EnablePhysics { gravity } => write!(f, "enable physics (gravity {gravity})"),
            Self::AddPhysicsBody { mesh, shape, mass } => {
                write!(f, "add {} body to mesh #{} (mass {mass})", shape.engine_name(), mesh.0)
            }
            Self::RunRenderLoop => write!(f, "run render loop"),
            Self::OnResize => write!(f, "listen for resize"),
        }
    }
}

/// Records every call and hands out sequential handles.
pub struct RecordingEngine {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<u32>,
    has_surface: bool,
    has_engine: bool,
    has_camera: bool,
    physics_fails: bool,
    active_camera: Cell<bool>,
    frame: RefCell<Option<FrameCallback>>,
    resize_listeners: RefCell<Vec<ResizeCallback>>,
    renders: Cell<u64>,
    resizes: Cell<u64>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
            has_surface: true,
            has_engine: true,
            has_camera: true,
            physics_fails: false,
            active_camera: Cell::new(true),
            frame: RefCell::new(None),
            resize_listeners: RefCell::new(Vec::new()),
            renders: Cell::new(0),
            resizes: Cell::new(0),
        }
    }

    /// The render surface lookup finds nothing.
    pub fn without_surface(mut self) -> Self {
        self.has_surface = false;
        self
    }

    /// Engine construction yields no instance.
    pub fn without_engine(mut self) -> Self {
        self.has_engine = false;
        self
    }

    /// Camera construction yields no camera.
    pub fn without_camera(mut self) -> Self {
        self.has_camera = false;
        self
    }

    pub fn with_failing_physics(mut self) -> Self {
        self.physics_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn set_active_camera(&self, active: bool) {
        self.active_camera.set(active);
    }

    pub fn is_rendering(&self) -> bool {
        self.frame.borrow().is_some()
    }

    /// Drive `count` display refreshes through the registered render loop.
    pub fn run_frames(&self, count: usize) {
        // The callback calls back into `self`, so it is taken out while it runs.
        let Some(mut frame) = self.frame.borrow_mut().take() else {
            return;
        };
        for _ in 0..count {
            frame();
        }
        *self.frame.borrow_mut() = Some(frame);
    }

    /// Deliver one viewport resize event to every listener.
    pub fn fire_resize(&self) {
        let mut listeners = std::mem::take(&mut *self.resize_listeners.borrow_mut());
        for listener in listeners.iter_mut() {
            listener();
        }
        self.resize_listeners.borrow_mut().append(&mut listeners);
    }

    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    pub fn resize_count(&self) -> u64 {
        self.resizes.get()
    }

    fn record(&self, call: Call) {
        log::debug!("engine: {call}");
        self.calls.borrow_mut().push(call);
    }

    fn handle(&self) -> Handle {
        let id = self.next_handle.get();
        self.next_handle.set(id + 1);
        Handle(id)
    }
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineApi for RecordingEngine {
    type Surface = Handle;
    type Engine = Handle;
    type Scene = Handle;
    type Camera = Handle;
    type Light = Handle;
    type Mesh = Handle;
    type ShadowGenerator = Handle;
    type Physics = Handle;

    fn find_surface(&self, id: &str) -> Option<Handle> {
        self.record(Call::FindSurface(id.to_string()));
        self.has_surface.then(|| self.handle())
    }

    fn create_engine(&self, _surface: &Handle, options: &EngineOptions) -> Option<Handle> {
        self.record(Call::CreateEngine {
            antialias: options.antialias,
            stencil: options.stencil,
        });
        self.has_engine.then(|| self.handle())
    }

    fn create_scene(&self, _engine: &Handle) -> Result<Handle, EngineError> {
        self.record(Call::CreateScene);
        Ok(self.handle())
    }

    fn create_camera(&self, _scene: &Handle, config: &CameraConfig) -> Result<Option<Handle>, EngineError> {
        self.record(Call::CreateCamera(config.name.clone()));
        Ok(self.has_camera.then(|| self.handle()))
    }

    fn attach_camera_control(&self, _camera: &Handle, _surface: &Handle) -> Result<(), EngineError> {
        self.record(Call::AttachControl);
        Ok(())
    }

    fn bind_camera_keys(&self, _camera: &Handle, keys: &KeyBindings) -> Result<(), EngineError> {
        self.record(Call::BindKeys { speed: keys.speed });
        Ok(())
    }

    fn create_hemispheric_light(&self, _scene: &Handle, config: &LightConfig) -> Result<Handle, EngineError> {
        self.record(Call::CreateHemisphericLight(config.name.clone()));
        Ok(self.handle())
    }

    fn create_shadow_generator(&self, _scene: &Handle, config: &ShadowConfig) -> Result<Handle, EngineError> {
        self.record(Call::CreateShadowGenerator(config.map_size));
        Ok(self.handle())
    }

    fn create_ground(&self, _scene: &Handle, config: &GroundConfig) -> Result<Handle, EngineError> {
        self.record(Call::CreateGround(config.name.clone()));
        Ok(self.handle())
    }

    fn create_card(&self, _scene: &Handle, config: &CardConfig) -> Result<Handle, EngineError> {
        self.record(Call::CreateCard(config.name.clone()));
        Ok(self.handle())
    }

    fn add_shadow_caster(&self, _shadows: &Handle, _caster: &Handle, _receiver: &Handle) -> Result<(), EngineError> {
        self.record(Call::AddShadowCaster);
        Ok(())
    }

    async fn init_physics(&self) -> Result<Handle, EngineError> {
        self.record(Call::InitPhysics);
        if self.physics_fails {
            return Err(EngineError::call("HavokPhysics()", "backend failed to start"));
        }
        Ok(self.handle())
    }

    fn enable_physics(&self, _scene: &Handle, gravity: Vec3, _physics: &Handle) -> Result<(), EngineError> {
        self.record(Call::EnablePhysics { gravity });
        Ok(())
    }

    fn add_physics_body(&self, _scene: &Handle, mesh: &Handle, body: &BodyConfig) -> Result<(), EngineError> {
        self.record(Call::AddPhysicsBody {
            mesh: *mesh,
            shape: body.shape,
            mass: body.mass,
        });
        Ok(())
    }

    fn run_render_loop(&self, _engine: &Handle, frame: FrameCallback) -> Result<(), EngineError> {
        self.record(Call::RunRenderLoop);
        *self.frame.borrow_mut() = Some(frame);
        Ok(())
    }

    fn has_active_camera(&self, _scene: &Handle) -> bool {
        self.active_camera.get()
    }

    fn camera_axes(&self, _camera: &Handle) -> CameraAxes {
        CameraAxes::default()
    }

    fn render(&self, _scene: &Handle) {
        self.renders.set(self.renders.get() + 1);
    }

    fn on_resize(&self, callback: ResizeCallback) -> Result<(), EngineError> {
        self.record(Call::OnResize);
        self.resize_listeners.borrow_mut().push(callback);
        Ok(())
    }

    fn resize(&self, _engine: &Handle) {
        self.resizes.set(self.resizes.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_sequential() {
        let engine = RecordingEngine::new();
        let a = engine.find_surface("renderCanvas").unwrap();
        let b = engine.create_scene(&a).unwrap();
        assert_eq!(b.0, a.0 + 1);
    }

    #[test]
    fn test_run_frames_without_loop_is_noop() {
        let engine = RecordingEngine::new();
        engine.run_frames(10);
        assert_eq!(engine.render_count(), 0);
        assert!(!engine.is_rendering());
    }

    #[test]
    fn test_call_display() {
        let call = Call::AddPhysicsBody {
            mesh: Handle(7),
            shape: PhysicsShape::Box,
            mass: 10.0,
        };
        assert_eq!(call.to_string(), "add BOX body to mesh #7 (mass 10)");
        assert_eq!(Call::FindSurface("renderCanvas".into()).to_string(), "find surface #renderCanvas");
    }
}
