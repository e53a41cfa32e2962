//! Mutex-guarded append-only byte buffer.

use std::sync::Mutex;

/// Byte buffer safe for concurrent writers and readers.
///
/// Decoders append rendered message text; the HTTP output sink snapshots
/// the contents and optionally clears them.
#[derive(Debug, Default)]
pub struct Buffer {
    inner: Mutex<Vec<u8>>,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Buffer::default()
    }

    /// Append p to the buffer.
    pub fn write(&self, p: &[u8]) {
        self.inner.lock().unwrap().extend_from_slice(p);
    }

    /// Copy the current contents out.
    pub fn snapshot(&self) -> Vec<u8> {
        self.inner.lock().unwrap().clone()
    }

    /// Drop everything buffered so far.
    pub fn reset(&self) {
        self.inner.lock().unwrap().clear();
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_snapshot_reset() {
        let buffer = Buffer::new();
        assert!(buffer.is_empty());

        buffer.write(b"hello ");
        buffer.write(b"world");
        assert_eq!(buffer.snapshot(), b"hello world");
        assert_eq!(buffer.len(), 11);

        // snapshot does not consume
        assert_eq!(buffer.snapshot(), b"hello world");

        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.snapshot(), b"");
    }

    #[test]
    fn test_concurrent_writers() {
        use std::sync::Arc;

        let buffer = Arc::new(Buffer::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let buffer = Arc::clone(&buffer);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    buffer.write(b"x");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(buffer.len(), 400);
    }
}
