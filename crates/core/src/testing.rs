//! Test doubles shared by the store and auth service tests

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use pavilion_domain::{
    ApiError, ApiResponse, RequestDescriptor, ResponseSnapshot, Result,
};
use serde_json::Value;

use crate::ports::Gateway;

/// Scripted gateway: returns queued outcomes and records every descriptor.
#[derive(Default)]
pub struct FakeGateway {
    outcomes: Mutex<VecDeque<Result<ApiResponse>>>,
    sent: Mutex<Vec<RequestDescriptor>>,
    cache_cleared: AtomicBool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with the given JSON body.
    pub fn push_ok(&self, body: Value) {
        let snapshot = ResponseSnapshot { status: 200, headers: BTreeMap::new(), body };
        self.outcomes.lock().push_back(Ok(ApiResponse::from_network(snapshot)));
    }

    /// Queue a classified failure.
    pub fn push_err(&self, err: ApiError) {
        self.outcomes.lock().push_back(Err(err));
    }

    /// Descriptors sent so far, in order.
    pub fn sent(&self) -> Vec<RequestDescriptor> {
        self.sent.lock().clone()
    }

    /// Whether `clear_cached_responses` has been called.
    pub fn cache_cleared(&self) -> bool {
        self.cache_cleared.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn send(&self, descriptor: RequestDescriptor) -> Result<ApiResponse> {
        self.sent.lock().push(descriptor);
        self.outcomes.lock().pop_front().unwrap_or_else(|| {
            Err(ApiError::Unknown { status: None, message: "no scripted outcome".into() })
        })
    }

    fn clear_cached_responses(&self) {
        self.cache_cleared.store(true, Ordering::SeqCst);
    }
}
