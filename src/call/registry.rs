use super::Call;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Live calls keyed by call id.
///
/// `add`/`remove` are the only mutators; they keep the session's
/// `ongoing_call` flag equal to "registry non-empty".
#[derive(Default)]
pub(crate) struct CallRegistry {
    calls: Mutex<HashMap<Uuid, Arc<Call>>>,
    ongoing: AtomicBool,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, call: Arc<Call>) {
        let mut calls = self.calls.lock().unwrap();
        calls.insert(call.call_id(), call);
        self.ongoing.store(!calls.is_empty(), Ordering::SeqCst);
    }

    pub fn remove(&self, call_id: Uuid) -> Option<Arc<Call>> {
        let mut calls = self.calls.lock().unwrap();
        let removed = calls.remove(&call_id);
        self.ongoing.store(!calls.is_empty(), Ordering::SeqCst);
        removed
    }

    pub fn get(&self, call_id: Uuid) -> Option<Arc<Call>> {
        self.calls.lock().unwrap().get(&call_id).cloned()
    }

    pub fn snapshot(&self) -> Vec<Arc<Call>> {
        self.calls.lock().unwrap().values().cloned().collect()
    }

    pub fn ongoing_call(&self) -> bool {
        self.ongoing.load(Ordering::SeqCst)
    }
}
