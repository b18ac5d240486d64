//! Response body for the composed robots.txt

use crate::metrics::Metrics;
use axum::body::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::warn;

/// Single-buffer body that counts an error when it is dropped unsent,
/// e.g. because the client went away before the write.
#[derive(Debug)]
pub struct ComposedBody {
    data: Option<Bytes>,
    metrics: Arc<Metrics>,
}

impl ComposedBody {
    pub fn new(data: impl Into<Bytes>, metrics: Arc<Metrics>) -> Self {
        let data: Bytes = data.into();
        Self {
            data: (!data.is_empty()).then_some(data),
            metrics,
        }
    }
}

impl HttpBody for ComposedBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
        Poll::Ready(self.data.take().map(|data| Ok(Frame::data(data))))
    }

    fn is_end_stream(&self) -> bool {
        self.data.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.data.as_ref().map_or(0, |data| data.len() as u64))
    }
}

impl Drop for ComposedBody {
    fn drop(&mut self) {
        if let Some(data) = &self.data {
            self.metrics.record_error();
            warn!(bytes = data.len(), "robots.txt response dropped before it was written");
        }
    }
}
