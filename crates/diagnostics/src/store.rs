use crate::types::FileDiagnostics;
use querylens_results::RunId;
use std::collections::HashMap;

/// The diagnostics published per run, owned by the session that serves the
/// runs. Setting a run's diagnostics replaces whatever was there before.
#[derive(Default)]
pub struct DiagnosticsStore {
    runs: HashMap<RunId, FileDiagnostics>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, run_id: RunId, diagnostics: FileDiagnostics) {
        self.runs.insert(run_id, diagnostics);
    }

    pub fn clear(&mut self, run_id: RunId) {
        self.runs.remove(&run_id);
    }

    pub fn get(&self, run_id: RunId) -> Option<&FileDiagnostics> {
        self.runs.get(&run_id)
    }

    pub fn is_visible(&self, run_id: RunId) -> bool {
        self.runs.contains_key(&run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Diagnostic, Severity};
    use querylens_locations::Range;
    use std::path::PathBuf;

    fn one_diagnostic() -> FileDiagnostics {
        let mut map = FileDiagnostics::new();
        map.insert(
            PathBuf::from("/snap/src/a.c"),
            vec![Diagnostic {
                range: Range::file_start(),
                message: "hello".to_string(),
                severity: Severity::Warning,
                related: Vec::new(),
            }],
        );
        map
    }

    #[test]
    fn set_replaces_and_clear_removes() {
        let mut store = DiagnosticsStore::new();
        assert!(!store.is_visible(1));
        store.set(1, one_diagnostic());
        assert!(store.is_visible(1));
        store.set(1, FileDiagnostics::new());
        assert_eq!(store.get(1).unwrap().len(), 0);
        store.clear(1);
        assert!(store.get(1).is_none());
    }
}
