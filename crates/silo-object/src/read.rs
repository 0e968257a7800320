use async_trait::async_trait;
use silo_store::HeaderView;

use crate::error::ObjectResult;

/// Splits a payload into consecutive chunks of at most `chunk_size` bytes.
///
/// An empty payload yields no chunks; only the last chunk may be shorter.
#[derive(Clone, Debug)]
pub struct PayloadChunks<'a> {
    rest: &'a [u8],
    chunk_size: usize,
}

impl<'a> PayloadChunks<'a> {
    /// `chunk_size` of zero is treated as one.
    pub fn new(payload: &'a [u8], chunk_size: usize) -> Self {
        Self {
            rest: payload,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl<'a> Iterator for PayloadChunks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let at = self.chunk_size.min(self.rest.len());
        let (chunk, rest) = self.rest.split_at(at);
        self.rest = rest;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rest.len().div_ceil(self.chunk_size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for PayloadChunks<'_> {}

/// Response side of a streamed Get: one header part, then payload chunks.
#[async_trait]
pub trait GetResponseStream: Send {
    async fn send_header(&mut self, header: HeaderView) -> ObjectResult<()>;
    async fn send_chunk(&mut self, chunk: Vec<u8>) -> ObjectResult<()>;
}

/// Response side of a streamed GetRange: payload chunks only.
#[async_trait]
pub trait RangeResponseStream: Send {
    async fn send_chunk(&mut self, chunk: Vec<u8>) -> ObjectResult<()>;
}
