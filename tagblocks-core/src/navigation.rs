//! In-app navigation after a tracked click

use url::Url;

/// Host router used for client-side transitions.
///
/// Receives a path plus query (`/a/b?c=1`), never a full URL, so a transition
/// cannot leave the current origin.
pub trait Navigator: Send + Sync {
    fn transition_to(&self, path: &str);
}

/// Navigator that ignores transitions
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn transition_to(&self, path: &str) {
        tracing::debug!(path, "Ignoring in-app transition");
    }
}

/// Path and query of a URL, with origin and fragment stripped
pub fn in_app_path(url: &Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
        _ => url.path().to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Navigator;
    use std::sync::Mutex;

    /// Records every transition
    #[derive(Default)]
    pub struct RecordingNavigator {
        pub paths: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        pub fn visited(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn transition_to(&self, path: &str) {
            self.paths.lock().unwrap().push(path.to_string());
        }
    }
}
