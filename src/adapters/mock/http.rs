//! Mock HTTP client for testing.
//!
//! Provides a scriptable streaming client: each URL owns a queue of
//! responses consumed one per request, so a test can describe several
//! successive attempts against the same conversation.

use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::mpsc;
use futures::stream;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (always POST for this transport)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

/// Sender half of a [`MockResponse::Channel`] body.
pub type ChunkSender = mpsc::UnboundedSender<Result<Bytes, HttpError>>;

/// Configuration for a mock response.
#[derive(Debug)]
pub enum MockResponse {
    /// Stream the chunks then end the body
    Stream(Vec<Bytes>),
    /// Fail before any body is produced
    Error(HttpError),
    /// Stream the chunks then fail mid-body
    StreamError { chunks: Vec<Bytes>, error: HttpError },
    /// Deliver whatever the test pushes through the paired sender
    Channel(mpsc::UnboundedReceiver<Result<Bytes, HttpError>>),
    /// Open successfully and never produce a chunk
    Pending,
}

impl MockResponse {
    /// Stream built from string chunks
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(chunks.into_iter().map(|s| Bytes::from(s.into())).collect())
    }

    /// Channel-driven body and the sender that feeds it
    pub fn channel() -> (Self, ChunkSender) {
        let (tx, rx) = mpsc::unbounded();
        (MockResponse::Channel(rx), tx)
    }

    fn into_result(self) -> Result<ByteStream, HttpError> {
        match self {
            MockResponse::Stream(chunks) => {
                Ok(Box::pin(stream::iter(
                    chunks.into_iter().map(Ok::<Bytes, HttpError>),
                )))
            }
            MockResponse::Error(e) => Err(e),
            MockResponse::StreamError { chunks, error } => {
                let items = chunks
                    .into_iter()
                    .map(Ok::<Bytes, HttpError>)
                    .chain(std::iter::once(Err(error)));
                Ok(Box::pin(stream::iter(items)))
            }
            MockResponse::Channel(rx) => Ok(Box::pin(rx)),
            MockResponse::Pending => Ok(Box::pin(stream::pending::<Result<Bytes, HttpError>>())),
        }
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use convo_stream::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.push_response(
///     "http://localhost:8000/conversations/c1/stream",
///     MockResponse::chunks(["data: {\"type\":\"done\",\"data\":\"\"}\n\n"]),
/// );
///
/// let body = client.post_stream(url, "{}", &Headers::new()).await?;
/// assert_eq!(client.request_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Queued responses by URL
    responses: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Used when a URL has nothing queued
    default_response: Arc<Mutex<Option<Vec<Bytes>>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for an exact URL.
    pub fn push_response(&self, url: impl Into<String>, response: MockResponse) {
        lock(&self.responses)
            .entry(url.into())
            .or_default()
            .push_back(response);
    }

    /// Queue a channel-driven response and return its sender.
    pub fn push_channel(&self, url: impl Into<String>) -> ChunkSender {
        let (response, tx) = MockResponse::channel();
        self.push_response(url, response);
        tx
    }

    /// Stream returned for URLs with an empty queue.
    pub fn set_default_stream(&self, chunks: Vec<Bytes>) {
        *lock(&self.default_response) = Some(chunks);
    }

    /// All requests made to this client.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        lock(&self.requests).push(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    fn next_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(response) = lock(&self.responses)
            .get_mut(url)
            .and_then(VecDeque::pop_front)
        {
            return Some(response);
        }
        lock(&self.default_response)
            .clone()
            .map(MockResponse::Stream)
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, body);

        match self.next_response(url) {
            Some(response) => response.into_result(),
            None => Err(HttpError::Other(format!(
                "No mock response configured for URL: {}",
                url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(body: ByteStream) -> Vec<Result<Bytes, HttpError>> {
        body.collect().await
    }

    #[tokio::test]
    async fn test_queued_responses_consumed_in_order() {
        let client = MockHttpClient::new();
        client.push_response("http://x/s", MockResponse::chunks(["one"]));
        client.push_response("http://x/s", MockResponse::chunks(["two"]));

        let first = collect(client.post_stream("http://x/s", "", &Headers::new()).await.unwrap()).await;
        let second = collect(client.post_stream("http://x/s", "", &Headers::new()).await.unwrap()).await;

        assert_eq!(first, vec![Ok(Bytes::from("one"))]);
        assert_eq!(second, vec![Ok(Bytes::from("two"))]);
    }

    #[tokio::test]
    async fn test_unconfigured_url_errors() {
        let client = MockHttpClient::new();
        let result = client.post_stream("http://x/none", "", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_default_stream_used_when_queue_empty() {
        let client = MockHttpClient::new();
        client.set_default_stream(vec![Bytes::from("d")]);
        let body = client.post_stream("http://x/any", "", &Headers::new()).await.unwrap();
        assert_eq!(collect(body).await, vec![Ok(Bytes::from("d"))]);
    }

    #[tokio::test]
    async fn test_open_error() {
        let client = MockHttpClient::new();
        client.push_response(
            "http://x/s",
            MockResponse::Error(HttpError::ServerError {
                status: 500,
                message: "boom".to_string(),
            }),
        );
        let result = client.post_stream("http://x/s", "", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::ServerError { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_mid_stream_error() {
        let client = MockHttpClient::new();
        client.push_response(
            "http://x/s",
            MockResponse::StreamError {
                chunks: vec![Bytes::from("a")],
                error: HttpError::Io("reset".to_string()),
            },
        );
        let body = client.post_stream("http://x/s", "", &Headers::new()).await.unwrap();
        let items = collect(body).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], Err(HttpError::Io("reset".to_string())));
    }

    #[tokio::test]
    async fn test_channel_response() {
        let client = MockHttpClient::new();
        let tx = client.push_channel("http://x/s");
        let mut body = client.post_stream("http://x/s", "", &Headers::new()).await.unwrap();

        tx.unbounded_send(Ok(Bytes::from("late"))).unwrap();
        assert_eq!(body.next().await, Some(Ok(Bytes::from("late"))));
        drop(tx);
        assert_eq!(body.next().await, None);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let client = MockHttpClient::new();
        client.push_response("http://x/s", MockResponse::Pending);
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        let _body = client.post_stream("http://x/s", "{\"content\":\"hi\"}", &headers).await;

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].body, "{\"content\":\"hi\"}");
        assert_eq!(requests[0].headers.get("Accept").unwrap(), "text/event-stream");

        client.clear_requests();
        assert_eq!(client.request_count(), 0);
    }
}
