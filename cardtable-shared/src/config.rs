use std::fmt;
use std::str::FromStr;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::SURFACE_ID;
use crate::manifest::ScriptManifest;

// ─── Engine ──────────────────────────────────────────────────────────

/// Flags passed to the engine constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub antialias: bool,
    pub preserve_drawing_buffer: bool,
    pub stencil: bool,
    pub disable_webgl2_support: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            preserve_drawing_buffer: true,
            stencil: true,
            disable_webgl2_support: false,
        }
    }
}

// ─── Camera ──────────────────────────────────────────────────────────

/// Keyboard bindings for the free camera, as DOM key codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub speed: f32,
    pub up: Vec<u32>,
    pub down: Vec<u32>,
    pub left: Vec<u32>,
    pub right: Vec<u32>,
}

impl Default for KeyBindings {
    /// Arrow keys plus WASD.
    fn default() -> Self {
        Self {
            speed: 0.5,
            up: vec![38, 87],
            down: vec![40, 83],
            left: vec![37, 65],
            right: vec![39, 68],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub name: String,
    pub position: Vec3,
    pub target: Option<Vec3>,
    pub up_vector: Option<Vec3>,
    pub attach_control: bool,
    pub keys: KeyBindings,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            name: "camera1".into(),
            position: Vec3::new(0.0, 5.0, -10.0),
            target: None,
            up_vector: None,
            attach_control: true,
            keys: KeyBindings::default(),
        }
    }
}

// ─── Lights ──────────────────────────────────────────────────────────

/// Hemispheric (ambient) light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub name: String,
    pub direction: Vec3,
    pub intensity: Option<f32>,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            name: "light".into(),
            direction: Vec3::new(1.0, 1.0, 0.0),
            intensity: None,
        }
    }
}

/// Directional light with a shadow generator. The card casts, the ground receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub light_name: String,
    pub direction: Vec3,
    pub position: Vec3,
    pub map_size: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            light_name: "sun".into(),
            direction: Vec3::new(-1.0, -2.0, -1.0),
            position: Vec3::new(20.0, 40.0, 20.0),
            map_size: 1024,
        }
    }
}

// ─── Meshes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    pub url: String,
    #[serde(default = "unit_scale")]
    pub u_scale: f32,
    #[serde(default = "unit_scale")]
    pub v_scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

impl TextureConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            u_scale: 1.0,
            v_scale: 1.0,
        }
    }
}

/// Collision shape of a physics aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsShape {
    Box,
    Sphere,
}

impl PhysicsShape {
    /// Member name on the engine's shape-type enumeration.
    pub fn engine_name(&self) -> &'static str {
        match self {
            Self::Box => "BOX",
            Self::Sphere => "SPHERE",
        }
    }
}

/// Physics aggregate attached to a mesh. Mass 0 makes the body static.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub shape: PhysicsShape,
    pub mass: f32,
}

impl BodyConfig {
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub texture: Option<TextureConfig>,
    pub body: BodyConfig,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            name: "ground".into(),
            width: 10.0,
            height: 10.0,
            texture: Some(TextureConfig {
                url: "https://raw.githubusercontent.com/CedricGuillemet/dump/master/Ground_1mx1m.png"
                    .into(),
                u_scale: 5.0,
                v_scale: 5.0,
            }),
            body: BodyConfig {
                shape: PhysicsShape::Box,
                mass: 0.0,
            },
        }
    }
}

/// A double-sided plane with separate UV windows for its front and back faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// (u0, v0, u1, v1) of the front face.
    pub front_uvs: Vec4,
    pub back_uvs: Vec4,
    pub position: Vec3,
    pub texture: Option<TextureConfig>,
    pub body: BodyConfig,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            name: "card1".into(),
            width: 0.665,
            height: 1.0,
            front_uvs: Vec4::new(0.5, 0.0, 1.0, 1.0),
            back_uvs: Vec4::new(0.0, 0.0, 0.5, 1.0),
            position: Vec3::new(0.0, 40.0, 0.0),
            texture: Some(TextureConfig::new("assets/ninediamond.jpg")),
            body: BodyConfig {
                shape: PhysicsShape::Box,
                mass: 10.0,
            },
        }
    }
}

// ─── Physics ─────────────────────────────────────────────────────────

/// When the physics backend is started relative to building the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsOrder {
    BeforeSceneGraph,
    #[default]
    AfterSceneGraph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    pub order: PhysicsOrder,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            order: PhysicsOrder::AfterSceneGraph,
        }
    }
}

// ─── Scene ───────────────────────────────────────────────────────────

/// Named scene configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Hemispheric light only, physics started after the meshes exist.
    #[default]
    Classic,
    /// Adds a shadow-casting sun, starts physics first, names the card `card`.
    Shadowed,
}

impl Preset {
    pub const ALL: &'static [Preset] = &[Preset::Classic, Preset::Shadowed];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Shadowed => "shadowed",
        }
    }

    pub fn config(&self) -> SceneConfig {
        match self {
            Self::Classic => SceneConfig::default(),
            Self::Shadowed => SceneConfig::shadowed(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "default" => Ok(Self::Classic),
            "shadowed" | "shadows" => Ok(Self::Shadowed),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

/// Everything the bootstrapper needs to build the demo scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Id of the canvas element to render into.
    pub surface_id: String,
    pub engine: EngineOptions,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub shadows: Option<ShadowConfig>,
    pub ground: GroundConfig,
    pub card: CardConfig,
    pub physics: PhysicsConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            surface_id: SURFACE_ID.into(),
            engine: EngineOptions::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            shadows: None,
            ground: GroundConfig::default(),
            card: CardConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn shadowed() -> Self {
        let mut config = Self::default();
        config.camera.up_vector = Some(Vec3::Y);
        config.shadows = Some(ShadowConfig::default());
        config.physics.order = PhysicsOrder::BeforeSceneGraph;
        config.card.name = "card".into();
        config
    }

    /// Check the values the engine would otherwise reject or silently misuse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("surface_id", &self.surface_id)?;

        non_empty("camera.name", &self.camera.name)?;
        finite_vec3("camera.position", self.camera.position)?;
        if let Some(target) = self.camera.target {
            finite_vec3("camera.target", target)?;
        }
        if let Some(up) = self.camera.up_vector {
            finite_vec3("camera.up_vector", up)?;
            if up.length_squared() == 0.0 {
                return Err(ConfigError::invalid("camera.up_vector", "must not be zero"));
            }
        }
        let keys = &self.camera.keys;
        if !keys.speed.is_finite() || keys.speed <= 0.0 {
            return Err(ConfigError::invalid("camera.keys.speed", "must be positive"));
        }
        for (field, codes) in [
            ("camera.keys.up", &keys.up),
            ("camera.keys.down", &keys.down),
            ("camera.keys.left", &keys.left),
            ("camera.keys.right", &keys.right),
        ] {
            if codes.is_empty() {
                return Err(ConfigError::invalid(field, "needs at least one key code"));
            }
        }

        non_empty("light.name", &self.light.name)?;
        finite_vec3("light.direction", self.light.direction)?;
        if let Some(intensity) = self.light.intensity {
            if !intensity.is_finite() || intensity < 0.0 {
                return Err(ConfigError::invalid("light.intensity", "must be >= 0"));
            }
        }

        if let Some(shadows) = &self.shadows {
            non_empty("shadows.light_name", &shadows.light_name)?;
            finite_vec3("shadows.direction", shadows.direction)?;
            finite_vec3("shadows.position", shadows.position)?;
            if !shadows.map_size.is_power_of_two() {
                return Err(ConfigError::invalid(
                    "shadows.map_size",
                    format!("{} is not a power of two", shadows.map_size),
                ));
            }
        }

        non_empty("ground.name", &self.ground.name)?;
        positive("ground.width", self.ground.width)?;
        positive("ground.height", self.ground.height)?;
        texture("ground.texture", self.ground.texture.as_ref())?;
        mass("ground.body.mass", self.ground.body.mass)?;

        non_empty("card.name", &self.card.name)?;
        positive("card.width", self.card.width)?;
        positive("card.height", self.card.height)?;
        finite_vec3("card.position", self.card.position)?;
        if !self.card.front_uvs.is_finite() || !self.card.back_uvs.is_finite() {
            return Err(ConfigError::invalid("card uvs", "must be finite"));
        }
        texture("card.texture", self.card.texture.as_ref())?;
        mass("card.body.mass", self.card.body.mass)?;

        finite_vec3("physics.gravity", self.physics.gravity)?;
        Ok(())
    }
}

fn non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    Ok(())
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(field, format!("{value} is not a positive size")));
    }
    Ok(())
}

fn mass(field: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(field, format!("{value} is not a valid mass")));
    }
    Ok(())
}

fn finite_vec3(field: &str, value: Vec3) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::invalid(field, "must be finite"));
    }
    Ok(())
}

fn texture(field: &str, value: Option<&TextureConfig>) -> Result<(), ConfigError> {
    let Some(texture) = value else {
        return Ok(());
    };
    non_empty(field, &texture.url)?;
    positive(field, texture.u_scale)?;
    positive(field, texture.v_scale)
}

// ─── App ─────────────────────────────────────────────────────────────

/// Top-level configuration: which scripts to load and which scene to build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub preset: Option<Preset>,
    pub scripts: ScriptManifest,
    pub scene: Option<SceneConfig>,
}

impl AppConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset: Some(preset),
            scripts: ScriptManifest::default(),
            scene: None,
        }
    }

    /// The scene to build: an explicit `[scene]` table wins over `preset`.
    pub fn scene(&self) -> SceneConfig {
        match (&self.scene, self.preset) {
            (Some(scene), _) => scene.clone(),
            (None, Some(preset)) => preset.config(),
            (None, None) => SceneConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scripts.is_empty() {
            return Err(ConfigError::invalid("scripts.urls", "must list at least one script"));
        }
        for url in self.scripts.iter() {
            non_empty("scripts.urls", url)?;
        }
        self.scene().validate()
    }
}
