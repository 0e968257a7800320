use silo_store::Object;
use silo_types::ObjectId;

use crate::error::{ObjectError, ObjectResult};
use crate::target::ObjectTarget;

/// Counts payload bytes and fails once their total passes `max`.
///
/// Unlike [`ValidatingTarget`](super::ValidatingTarget) it never compares
/// against a declared size.
pub struct PayloadSizeLimiter<T> {
    next: T,
    max: u64,
    written: u64,
}

impl<T: ObjectTarget> PayloadSizeLimiter<T> {
    pub fn new(next: T, max: u64) -> Self {
        Self {
            next,
            max,
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    fn count(&mut self, len: usize) -> ObjectResult<()> {
        let total = self.written.checked_add(len as u64);
        match total {
            Some(total) if total <= self.max => {
                self.written = total;
                Ok(())
            }
            _ => Err(ObjectError::ExceedingMaxSize {
                size: self.written.saturating_add(len as u64),
                max: self.max,
            }),
        }
    }
}

impl<T: ObjectTarget> ObjectTarget for PayloadSizeLimiter<T> {
    fn begin(&mut self, object: Object) -> ObjectResult<()> {
        self.count(object.payload.len())?;
        self.next.begin(object)
    }

    fn append(&mut self, chunk: &[u8]) -> ObjectResult<usize> {
        self.count(chunk.len())?;
        self.next.append(chunk)
    }

    fn finalize(&mut self) -> ObjectResult<ObjectId> {
        self.next.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sink {
        bytes: usize,
    }

    impl ObjectTarget for Sink {
        fn begin(&mut self, object: Object) -> ObjectResult<()> {
            self.bytes += object.payload.len();
            Ok(())
        }
        fn append(&mut self, chunk: &[u8]) -> ObjectResult<usize> {
            self.bytes += chunk.len();
            Ok(chunk.len())
        }
        fn finalize(&mut self) -> ObjectResult<ObjectId> {
            Ok(ObjectId::null())
        }
    }

    #[test]
    fn counts_until_limit() {
        let mut limiter = PayloadSizeLimiter::new(Sink::default(), 8);
        limiter.append(b"1234").unwrap();
        limiter.append(b"5678").unwrap();
        assert_eq!(limiter.written(), 8);
        let err = limiter.append(b"9").unwrap_err();
        assert!(matches!(err, ObjectError::ExceedingMaxSize { size: 9, max: 8 }));
        assert_eq!(limiter.next.bytes, 8);
    }

    #[test]
    fn unbounded_limiter_never_overflows() {
        let mut limiter = PayloadSizeLimiter::new(Sink::default(), u64::MAX);
        limiter.written = u64::MAX - 1;
        assert!(limiter.append(b"x").is_ok());
        assert!(limiter.append(b"y").is_err());
    }
}
