//! Request diagnostics log.
//!
//! Default [`RequestObserver`]: traces start/end of each render, tracks the
//! request currently being rendered on this thread, and keeps a bounded
//! history of finished requests for the debug console.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::debug::RequestObserver;
use crate::http::HttpRequest;

thread_local! {
    static CURRENT_REQUEST: RefCell<Option<ActiveRequest>> = const { RefCell::new(None) };
}

struct ActiveRequest {
    request_id: String,
    started: Instant,
}

/// A finished request, as shown by the debug console.
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub request_id: String,
    pub method: String,
    pub uri: String,
    pub kind: &'static str,
    pub finished_at_ms: u64,
    pub duration_ms: u64,
}

/// Bounded log of rendered requests.
pub struct DebugLog {
    capacity: usize,
    history: Mutex<VecDeque<RequestRecord>>,
}

impl DebugLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    /// ID of the request being rendered on the calling thread, if any.
    pub fn current_request_id() -> Option<String> {
        CURRENT_REQUEST.with(|current| {
            current
                .borrow()
                .as_ref()
                .map(|active| active.request_id.clone())
        })
    }

    /// Finished requests, oldest first.
    pub fn recent(&self) -> Vec<RequestRecord> {
        match self.history.lock() {
            Ok(history) => history.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    fn push(&self, record: RequestRecord) {
        if self.capacity == 0 {
            return;
        }
        let mut history = match self.history.lock() {
            Ok(history) => history,
            Err(poisoned) => poisoned.into_inner(),
        };
        while history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(record);
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RequestObserver for DebugLog {
    fn request_started(&self, request: &HttpRequest) {
        tracing::debug!(
            request_id = %request.request_id(),
            uri = %request.uri(),
            "Request started"
        );
        CURRENT_REQUEST.with(|current| {
            *current.borrow_mut() = Some(ActiveRequest {
                request_id: request.request_id().to_string(),
                started: Instant::now(),
            });
        });
    }

    fn request_ended(&self, request: &HttpRequest) {
        let started = CURRENT_REQUEST.with(|current| current.borrow_mut().take().map(|a| a.started));
        let duration_ms = started
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or_default();
        let finished_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        tracing::debug!(
            request_id = %request.request_id(),
            uri = %request.uri(),
            duration_ms,
            "Request ended"
        );
        self.push(RequestRecord {
            request_id: request.request_id().to_string(),
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            kind: request.kind().as_str(),
            finished_at_ms,
            duration_ms,
        });
    }
}
