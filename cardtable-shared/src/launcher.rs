use std::rc::Rc;

use crate::bootstrap::{Bootstrapper, SceneContext};
use crate::config::AppConfig;
use crate::engine::EngineApi;
use crate::error::{BootstrapError, EngineError};
use crate::sequencer::{load_sequential, LoadReport, ScriptHost};

/// A scene that is up and rendering, with the load report that preceded it.
pub struct Launched<A: EngineApi> {
    pub report: LoadReport,
    pub context: SceneContext<A>,
}

/// Load every script of `config`, then bootstrap its scene.
///
/// The bootstrap starts once the last script has settled, whether or not every
/// load succeeded. `connect` binds the engine and is only called at that
/// point, since the engine's globals are defined by the scripts.
pub async fn launch<H, A, F>(
    host: &H,
    config: &AppConfig,
    connect: F,
) -> Result<Launched<A>, BootstrapError>
where
    H: ScriptHost,
    A: EngineApi + 'static,
    F: FnOnce() -> Result<A, EngineError>,
{
    config.validate()?;

    let report = load_sequential(host, &config.scripts).await;
    if !report.all_loaded() {
        log::warn!(
            "{} of {} scripts failed to load; the scene may be incomplete",
            report.failed().count(),
            report.len()
        );
    }

    let api = connect().map_err(|e| {
        log::error!("{e}");
        BootstrapError::from(e)
    })?;
    let context = Bootstrapper::new(Rc::new(api), config.scene()).run().await?;

    Ok(Launched { report, context })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::manifest::ScriptManifest;
    use crate::trace::{Call, RecordingEngine};
    use std::cell::RefCell;

    /// Host that fails the listed URLs and records the order of requests.
    struct ListHost {
        failing: Vec<&'static str>,
        requests: RefCell<Vec<String>>,
    }

    impl ListHost {
        fn new(failing: &[&'static str]) -> Self {
            Self {
                failing: failing.to_vec(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl ScriptHost for ListHost {
        async fn load(&self, url: &str) -> Result<(), LoadError> {
            self.requests.borrow_mut().push(url.to_string());
            if self.failing.iter().any(|f| *f == url) {
                Err(LoadError::new(url, "404"))
            } else {
                Ok(())
            }
        }
    }

    fn config(urls: [&str; 3]) -> AppConfig {
        AppConfig {
            scripts: ScriptManifest::new(urls),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_bootstrap_runs_after_failed_script() {
        let host = ListHost::new(&["B"]);
        let config = config(["A", "B", "C"]);

        let launched = pollster::block_on(launch(&host, &config, || {
            assert_eq!(host.requests.borrow().len(), 3, "engine bound before loading finished");
            Ok(RecordingEngine::new())
        }))
        .unwrap();

        assert_eq!(*host.requests.borrow(), vec!["A", "B", "C"]);
        assert_eq!(launched.report.loaded().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(launched.report.failed().map(|e| e.url.as_str()).collect::<Vec<_>>(), vec!["B"]);

        let engine = &launched.context.api;
        assert!(engine.is_rendering());
        assert_eq!(engine.calls().last(), Some(&Call::OnResize));
        engine.run_frames(2);
        assert_eq!(engine.render_count(), 2);
    }

    #[test]
    fn test_missing_engine_global_after_load() {
        let host = ListHost::new(&["A", "B", "C"]);
        let result = pollster::block_on(launch::<_, RecordingEngine, _>(&host, &config(["A", "B", "C"]), || {
            Err(EngineError::MissingGlobal("BABYLON".into()))
        }));

        assert_eq!(
            result.err(),
            Some(BootstrapError::Engine(EngineError::MissingGlobal("BABYLON".into())))
        );
        assert_eq!(host.requests.borrow().len(), 3);
    }

    #[test]
    fn test_invalid_config_loads_nothing() {
        let host = ListHost::new(&[]);
        let mut config = config(["A", "B", "C"]);
        config.scripts = ScriptManifest::new(Vec::<String>::new());

        let result = pollster::block_on(launch(&host, &config, || Ok(RecordingEngine::new())));

        assert!(matches!(result, Err(BootstrapError::Config(_))));
        assert!(host.requests.borrow().is_empty());
    }
}
