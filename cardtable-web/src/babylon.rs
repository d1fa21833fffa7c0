//! [`EngineApi`] over the `BABYLON` global and the `HavokPhysics` factory.
//!
//! Every engine object is a plain `JsValue`; calls go through `js_sys::Reflect`
//! so nothing here depends on generated bindings for Babylon.js.

use cardtable_shared::config::{
    BodyConfig, CameraConfig, CardConfig, EngineOptions, GroundConfig, KeyBindings, LightConfig,
    ShadowConfig, TextureConfig,
};
use cardtable_shared::engine::{CameraAxes, FrameCallback, ResizeCallback};
use cardtable_shared::{EngineApi, EngineError};
use glam::{Vec3, Vec4};
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlCanvasElement, Window};

pub struct BabylonApi {
    window: Window,
    document: Document,
    babylon: JsValue,
}

impl BabylonApi {
    /// Bind to the `BABYLON` namespace defined by the core script.
    pub fn from_globals(window: Window, document: Document) -> Result<Self, EngineError> {
        let babylon = get(&js_sys::global(), "BABYLON")?;
        if babylon.is_undefined() || babylon.is_null() {
            return Err(EngineError::MissingGlobal("BABYLON".into()));
        }
        Ok(Self {
            window,
            document,
            babylon,
        })
    }

    fn class(&self, name: &str) -> Result<Function, EngineError> {
        let class = get(&self.babylon, name)?;
        class
            .dyn_into::<Function>()
            .map_err(|_| EngineError::MissingGlobal(format!("BABYLON.{name}")))
    }

    fn construct(&self, name: &str, args: &[JsValue]) -> Result<JsValue, EngineError> {
        let class = self.class(name)?;
        let args: Array = args.iter().collect();
        Reflect::construct(&class, &args).map_err(|e| js_error(&format!("new BABYLON.{name}"), &e))
    }

    fn vector3(&self, v: Vec3) -> Result<JsValue, EngineError> {
        self.construct("Vector3", &[v.x.into(), v.y.into(), v.z.into()])
    }

    fn vector4(&self, v: Vec4) -> Result<JsValue, EngineError> {
        self.construct("Vector4", &[v.x.into(), v.y.into(), v.z.into(), v.w.into()])
    }

    /// `BABYLON.<namespace>.<member>`, e.g. `Mesh.DOUBLESIDE`.
    fn constant(&self, namespace: &str, member: &str) -> Result<JsValue, EngineError> {
        let value = get(&get(&self.babylon, namespace)?, member)?;
        if value.is_undefined() {
            return Err(EngineError::MissingGlobal(format!("BABYLON.{namespace}.{member}")));
        }
        Ok(value)
    }

    fn mesh_builder(&self, method: &str, name: &str, options: &Object, scene: &JsValue) -> Result<JsValue, EngineError> {
        let builder = get(&self.babylon, "MeshBuilder")?;
        call(&builder, method, &[name.into(), JsValue::from(options.clone()), scene.clone()])
    }

    /// Give `mesh` a standard material, textured when `texture` is set.
    fn apply_material(
        &self,
        scene: &JsValue,
        mesh: &JsValue,
        name: &str,
        texture: Option<&TextureConfig>,
    ) -> Result<(), EngineError> {
        let material = self.construct("StandardMaterial", &[format!("{name}Material").into(), scene.clone()])?;
        if let Some(texture) = texture {
            let diffuse = self.construct("Texture", &[texture.url.as_str().into(), scene.clone()])?;
            set(&diffuse, "uScale", &texture.u_scale.into())?;
            set(&diffuse, "vScale", &texture.v_scale.into())?;
            set(&material, "diffuseTexture", &diffuse)?;
        }
        set(mesh, "material", &material)
    }

    fn direction(&self, camera: &JsValue, local: Vec3) -> Result<Vec3, EngineError> {
        let dir = call(camera, "getDirection", &[self.vector3(local)?])?;
        let component = |axis: &str| -> Result<f32, EngineError> {
            Ok(get(&dir, axis)?.as_f64().unwrap_or_default() as f32)
        };
        Ok(Vec3::new(component("x")?, component("y")?, component("z")?))
    }
}

impl EngineApi for BabylonApi {
    type Surface = HtmlCanvasElement;
    type Engine = JsValue;
    type Scene = JsValue;
    type Camera = JsValue;
    type Light = JsValue;
    type Mesh = JsValue;
    type ShadowGenerator = JsValue;
    type Physics = JsValue;

    fn find_surface(&self, id: &str) -> Option<HtmlCanvasElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()
    }

    fn create_engine(&self, surface: &HtmlCanvasElement, options: &EngineOptions) -> Option<JsValue> {
        let result = object(&[
            ("preserveDrawingBuffer", options.preserve_drawing_buffer.into()),
            ("stencil", options.stencil.into()),
            ("disableWebGL2Support", options.disable_webgl2_support.into()),
        ])
        .and_then(|flags| {
            self.construct(
                "Engine",
                &[JsValue::from(surface.clone()), options.antialias.into(), flags.into()],
            )
        });

        match result {
            Ok(engine) if engine.is_truthy() => Some(engine),
            Ok(_) => None,
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    fn create_scene(&self, engine: &JsValue) -> Result<JsValue, EngineError> {
        self.construct("Scene", &[engine.clone()])
    }

    fn create_camera(&self, scene: &JsValue, config: &CameraConfig) -> Result<Option<JsValue>, EngineError> {
        let camera = self.construct(
            "FreeCamera",
            &[config.name.as_str().into(), self.vector3(config.position)?, scene.clone()],
        )?;
        if !camera.is_truthy() {
            return Ok(None);
        }
        if let Some(up) = config.up_vector {
            set(&camera, "upVector", &self.vector3(up)?)?;
        }
        if let Some(target) = config.target {
            call(&camera, "setTarget", &[self.vector3(target)?])?;
        }
        Ok(Some(camera))
    }

    fn attach_camera_control(&self, camera: &JsValue, surface: &HtmlCanvasElement) -> Result<(), EngineError> {
        call(camera, "attachControl", &[JsValue::from(surface.clone()), true.into()]).map(|_| ())
    }

    fn bind_camera_keys(&self, camera: &JsValue, keys: &KeyBindings) -> Result<(), EngineError> {
        set(camera, "speed", &keys.speed.into())?;
        for (property, codes) in [
            ("keysUp", &keys.up),
            ("keysDown", &keys.down),
            ("keysLeft", &keys.left),
            ("keysRight", &keys.right),
        ] {
            let codes: Array = codes.iter().map(|&code| JsValue::from(code)).collect();
            set(camera, property, &codes)?;
        }
        Ok(())
    }

    fn create_hemispheric_light(&self, scene: &JsValue, config: &LightConfig) -> Result<JsValue, EngineError> {
        let light = self.construct(
            "HemisphericLight",
            &[config.name.as_str().into(), self.vector3(config.direction)?, scene.clone()],
        )?;
        if let Some(intensity) = config.intensity {
            set(&light, "intensity", &intensity.into())?;
        }
        Ok(light)
    }

    fn create_shadow_generator(&self, scene: &JsValue, config: &ShadowConfig) -> Result<JsValue, EngineError> {
        let light = self.construct(
            "DirectionalLight",
            &[config.light_name.as_str().into(), self.vector3(config.direction)?, scene.clone()],
        )?;
        set(&light, "position", &self.vector3(config.position)?)?;
        self.construct("ShadowGenerator", &[config.map_size.into(), light])
    }

    fn create_ground(&self, scene: &JsValue, config: &GroundConfig) -> Result<JsValue, EngineError> {
        let options = object(&[("width", config.width.into()), ("height", config.height.into())])?;
        let ground = self.mesh_builder("CreateGround", &config.name, &options, scene)?;
        self.apply_material(scene, &ground, &config.name, config.texture.as_ref())?;
        Ok(ground)
    }

    fn create_card(&self, scene: &JsValue, config: &CardConfig) -> Result<JsValue, EngineError> {
        let options = object(&[
            ("height", config.height.into()),
            ("width", config.width.into()),
            ("sideOrientation", self.constant("Mesh", "DOUBLESIDE")?),
            ("frontUVs", self.vector4(config.front_uvs)?),
            ("backUVs", self.vector4(config.back_uvs)?),
        ])?;
        let card = self.mesh_builder("CreatePlane", &config.name, &options, scene)?;
        set(&card, "position", &self.vector3(config.position)?)?;
        self.apply_material(scene, &card, &config.name, config.texture.as_ref())?;
        Ok(card)
    }

    fn add_shadow_caster(&self, shadows: &JsValue, caster: &JsValue, receiver: &JsValue) -> Result<(), EngineError> {
        call(shadows, "addShadowCaster", &[caster.clone()])?;
        set(receiver, "receiveShadows", &true.into())
    }

    async fn init_physics(&self) -> Result<JsValue, EngineError> {
        let factory = get(&js_sys::global(), "HavokPhysics")?
            .dyn_into::<Function>()
            .map_err(|_| EngineError::MissingGlobal("HavokPhysics".into()))?;
        let pending = factory
            .call0(&JsValue::NULL)
            .map_err(|e| js_error("HavokPhysics()", &e))?;
        let havok = JsFuture::from(Promise::resolve(&pending))
            .await
            .map_err(|e| js_error("HavokPhysics()", &e))?;

        let plugin = self.construct("HavokPlugin", &[true.into(), havok])?;
        if !plugin.is_truthy() {
            return Err(EngineError::call("new BABYLON.HavokPlugin", "Failed calling Physics."));
        }
        log::info!("Havok physics ready");
        Ok(plugin)
    }

    fn enable_physics(&self, scene: &JsValue, gravity: Vec3, physics: &JsValue) -> Result<(), EngineError> {
        call(scene, "enablePhysics", &[self.vector3(gravity)?, physics.clone()]).map(|_| ())
    }

    fn add_physics_body(&self, scene: &JsValue, mesh: &JsValue, body: &BodyConfig) -> Result<(), EngineError> {
        let shape = self.constant("PhysicsShapeType", body.shape.engine_name())?;
        let options = object(&[("mass", body.mass.into())])?;
        self.construct("PhysicsAggregate", &[mesh.clone(), shape, options.into(), scene.clone()])
            .map(|_| ())
    }

    fn run_render_loop(&self, engine: &JsValue, frame: FrameCallback) -> Result<(), EngineError> {
        let closure = Closure::wrap(frame);
        call(engine, "runRenderLoop", &[closure.as_ref().clone()])?;
        // The loop lives as long as the page.
        closure.forget();
        Ok(())
    }

    fn has_active_camera(&self, scene: &JsValue) -> bool {
        get(scene, "activeCamera").map_or(false, |camera| camera.is_truthy())
    }

    fn camera_axes(&self, camera: &JsValue) -> CameraAxes {
        let axes = (|| {
            Ok::<_, EngineError>(CameraAxes {
                forward: self.direction(camera, Vec3::Z)?,
                right: self.direction(camera, Vec3::X)?,
                up: self.direction(camera, Vec3::Y)?,
            })
        })();
        axes.unwrap_or_else(|e| {
            log::warn!("{e}");
            CameraAxes::default()
        })
    }

    fn render(&self, scene: &JsValue) {
        if let Err(e) = call(scene, "render", &[]) {
            log::error!("{e}");
        }
    }

    fn on_resize(&self, callback: ResizeCallback) -> Result<(), EngineError> {
        let closure = Closure::wrap(callback);
        self.window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| js_error("addEventListener(\"resize\")", &e))?;
        closure.forget();
        Ok(())
    }

    fn resize(&self, engine: &JsValue) {
        if let Err(e) = call(engine, "resize", &[]) {
            log::error!("{e}");
        }
    }
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, EngineError> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(|e| js_error(key, &e))
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), EngineError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| js_error(key, &e))
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, EngineError> {
    let function = get(target, method)?
        .dyn_into::<Function>()
        .map_err(|_| EngineError::call(method, "not a function"))?;
    let args: Array = args.iter().collect();
    function.apply(target, &args).map_err(|e| js_error(method, &e))
}

fn object(entries: &[(&str, JsValue)]) -> Result<Object, EngineError> {
    let object = Object::new();
    for (key, value) in entries {
        set(&object, key, value)?;
    }
    Ok(object)
}

fn js_error(call: &str, error: &JsValue) -> EngineError {
    let reason = error
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{error:?}"));
    EngineError::call(call, reason)
}
