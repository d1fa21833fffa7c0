use crate::error::LoadError;
use crate::manifest::ScriptManifest;

/// Something that can inject a script into the host environment and report
/// when it has settled. A successful load may define new globals.
#[allow(async_fn_in_trait)]
pub trait ScriptHost {
    async fn load(&self, url: &str) -> Result<(), LoadError>;
}

/// Outcome of one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    pub url: String,
    pub result: Result<(), LoadError>,
}

impl ScriptOutcome {
    pub fn is_loaded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-script outcomes of a sequential load, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub outcomes: Vec<ScriptOutcome>,
}

impl LoadReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_loaded())
            .map(|o| o.url.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = &LoadError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn all_loaded(&self) -> bool {
        self.outcomes.iter().all(ScriptOutcome::is_loaded)
    }
}

/// Load every URL of `manifest` through `host`, strictly one at a time.
///
/// Each load is awaited to completion before the next one is requested, so a
/// script may rely on globals defined by any script before it. A failed load is
/// logged and recorded; the remaining scripts are still attempted.
pub async fn load_sequential<H: ScriptHost>(host: &H, manifest: &ScriptManifest) -> LoadReport {
    let mut outcomes = Vec::with_capacity(manifest.len());

    for url in manifest.iter() {
        log::debug!("Loading script: {url}");
        let result = host.load(url).await;
        if let Err(e) = &result {
            log::error!("Failed to load script: {url} ({})", e.reason);
        }
        outcomes.push(ScriptOutcome {
            url: url.to_string(),
            result,
        });
    }

    let report = LoadReport { outcomes };
    log::info!(
        "Loaded {}/{} scripts",
        report.loaded().count(),
        report.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Future that returns `Pending` once before completing, like a network load.
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Request(String),
        Settled(String),
    }

    /// Host that fails the URLs it is told to and records every request.
    struct FakeHost {
        failing: Vec<String>,
        events: RefCell<Vec<Event>>,
        in_flight: Cell<usize>,
        max_in_flight: Cell<usize>,
    }

    impl FakeHost {
        fn new(failing: &[&str]) -> Self {
            Self {
                failing: failing.iter().map(|s| s.to_string()).collect(),
                events: RefCell::new(Vec::new()),
                in_flight: Cell::new(0),
                max_in_flight: Cell::new(0),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Event::Request(url) => Some(url.clone()),
                    Event::Settled(_) => None,
                })
                .collect()
        }
    }

    impl ScriptHost for FakeHost {
        async fn load(&self, url: &str) -> Result<(), LoadError> {
            self.events.borrow_mut().push(Event::Request(url.to_string()));
            self.in_flight.set(self.in_flight.get() + 1);
            self.max_in_flight
                .set(self.max_in_flight.get().max(self.in_flight.get()));

            YieldOnce(false).await;

            self.in_flight.set(self.in_flight.get() - 1);
            self.events.borrow_mut().push(Event::Settled(url.to_string()));
            if self.failing.iter().any(|f| f == url) {
                Err(LoadError::new(url, "network error"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_mixed_outcomes_keep_order() {
        let host = FakeHost::new(&["B"]);
        let report = pollster::block_on(load_sequential(&host, &ScriptManifest::new(["A", "B", "C"])));

        assert_eq!(host.requests(), vec!["A", "B", "C"]);
        assert_eq!(report.loaded().collect::<Vec<_>>(), vec!["A", "C"]);
        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].url, "B");
        assert!(!report.all_loaded());
    }

    #[test]
    fn test_every_outcome_combination_is_serial() {
        let urls = ["s0", "s1", "s2", "s3"];
        let manifest = ScriptManifest::new(urls);

        for mask in 0u32..(1 << urls.len()) {
            let failing: Vec<&str> = urls
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u32 << *i) != 0)
                .map(|(_, u)| *u)
                .collect();
            let host = FakeHost::new(&failing);
            let report = pollster::block_on(load_sequential(&host, &manifest));

            // Each request is immediately followed by its own settlement.
            let expected: Vec<Event> = urls
                .iter()
                .flat_map(|u| [Event::Request(u.to_string()), Event::Settled(u.to_string())])
                .collect();
            assert_eq!(*host.events.borrow(), expected, "mask {mask:#06b}");
            assert_eq!(host.max_in_flight.get(), 1);
            assert_eq!(report.len(), urls.len());
            assert_eq!(report.failed().count(), failing.len());
        }
    }

    #[test]
    fn test_all_failing_still_completes() {
        let host = FakeHost::new(&["A", "B", "C"]);
        let report = pollster::block_on(load_sequential(&host, &ScriptManifest::new(["A", "B", "C"])));

        assert_eq!(host.requests(), vec!["A", "B", "C"]);
        assert_eq!(report.len(), 3);
        assert_eq!(report.loaded().count(), 0);
    }

    #[test]
    fn test_duplicate_urls_requested_twice() {
        let host = FakeHost::new(&[]);
        let report = pollster::block_on(load_sequential(&host, &ScriptManifest::new(["A", "A"])));

        assert_eq!(host.requests(), vec!["A", "A"]);
        assert!(report.all_loaded());
    }

    #[test]
    fn test_empty_manifest() {
        let host = FakeHost::new(&[]);
        let report = pollster::block_on(load_sequential(&host, &ScriptManifest::new(Vec::<String>::new())));

        assert!(report.is_empty());
        assert!(report.all_loaded());
        assert!(host.requests().is_empty());
    }
}
