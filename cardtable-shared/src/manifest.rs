use serde::{Deserialize, Serialize};

/// Babylon.js and its plugins, in load order. Later entries read globals
/// defined by earlier ones (the core must precede every `babylonjs.*` plugin).
pub const BABYLON_SCRIPTS: [&str; 17] = [
    "https://cdnjs.cloudflare.com/ajax/libs/dat-gui/0.6.2/dat.gui.min.js",
    "https://assets.babylonjs.com/generated/Assets.js",
    "https://cdn.babylonjs.com/recast.js",
    "https://cdn.babylonjs.com/ammo.js",
    "https://cdn.babylonjs.com/havok/HavokPhysics_umd.js",
    "https://cdn.babylonjs.com/cannon.js",
    "https://cdn.babylonjs.com/Oimo.js",
    "https://cdn.babylonjs.com/earcut.min.js",
    "https://cdn.babylonjs.com/babylon.js",
    "https://cdn.babylonjs.com/materialsLibrary/babylonjs.materials.min.js",
    "https://cdn.babylonjs.com/proceduralTexturesLibrary/babylonjs.proceduralTextures.min.js",
    "https://cdn.babylonjs.com/postProcessesLibrary/babylonjs.postProcess.min.js",
    "https://cdn.babylonjs.com/loaders/babylonjs.loaders.js",
    "https://cdn.babylonjs.com/serializers/babylonjs.serializers.min.js",
    "https://cdn.babylonjs.com/gui/babylon.gui.min.js",
    "https://cdn.babylonjs.com/addons/babylonjs.addons.min.js",
    "https://cdn.babylonjs.com/inspector/babylon.inspector.bundle.js",
];

/// Ordered list of script URLs. Order is significant and duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptManifest {
    pub urls: Vec<String>,
}

impl ScriptManifest {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    /// The Babylon.js CDN bundle the demo scene needs.
    pub fn babylon() -> Self {
        Self::new(BABYLON_SCRIPTS)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// Distinct hosts the manifest fetches from, in first-seen order.
    pub fn hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = Vec::new();
        for url in self.iter() {
            let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
            let host = rest.split('/').next().unwrap_or(rest);
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        hosts
    }
}

impl Default for ScriptManifest {
    fn default() -> Self {
        Self::babylon()
    }
}
