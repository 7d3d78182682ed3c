//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `convo_stream::adapters::mock` and provides script helpers for bodies.

// Each test binary uses a different subset of these re-exports.
#![allow(unused_imports)]

pub use convo_stream::adapters::mock::{
    ChunkSender, MockHttpClient, MockResponse, RecordingNotifier,
};
pub use convo_stream::traits::{Headers, HttpClient, HttpError};

use bytes::Bytes;

/// Builder for a scripted response body.
///
/// Each call to [`read`](BodyScript::read) becomes one physical read on
/// the consumer side.
#[derive(Default)]
pub struct BodyScript {
    reads: Vec<Bytes>,
}

impl BodyScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one physical read.
    pub fn read(mut self, text: impl Into<String>) -> Self {
        self.reads.push(Bytes::from(text.into()));
        self
    }

    /// Append one read per frame.
    pub fn frames<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for frame in frames {
            self.reads.push(Bytes::from(frame.into()));
        }
        self
    }

    /// Body that ends normally after the scripted reads.
    pub fn build(self) -> MockResponse {
        MockResponse::Stream(self.reads)
    }

    /// Body that fails with `error` after the scripted reads.
    pub fn fail_with(self, error: HttpError) -> MockResponse {
        MockResponse::StreamError {
            chunks: self.reads,
            error,
        }
    }
}

/// Server error response as returned for a rejected open.
pub fn server_error(status: u16, message: &str) -> MockResponse {
    MockResponse::Error(HttpError::ServerError {
        status,
        message: message.to_string(),
    })
}
