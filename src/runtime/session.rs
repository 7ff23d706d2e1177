//! Connection session: drives the frame codec and the dispatcher in
//! lockstep for one connection.
//!
//! The loop is synchronous and half-duplex: each extracted request is
//! dispatched and its response fully written back before more bytes are
//! read from the socket. Frames on one connection are therefore answered
//! strictly in arrival order, which is what lets a client correlate the
//! acknowledgment for chunk *n* with exactly chunk *n* during uploads.

use crate::runtime::frame::{frame_response, FrameBuffer, RECV_CHUNK};
use crate::runtime::Dispatch;
use std::io::{self, Read, Write};
use tracing::trace;

/// Serve one connection to completion.
///
/// Returns `Ok(())` on orderly peer close (zero-byte read) and the error
/// on any receive or send failure; the caller owns logging and cleanup.
/// There is no idle timeout: a silent peer parks the calling execution
/// unit in `read` indefinitely.
pub fn serve_connection<S, D>(stream: &mut S, dispatcher: &D) -> io::Result<()>
where
    S: Read + Write,
    D: Dispatch + ?Sized,
{
    let mut frames = FrameBuffer::new();
    let mut chunk = [0u8; RECV_CHUNK];

    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            trace!("Peer closed connection");
            return Ok(());
        }
        frames.extend(&chunk[..n]);

        while let Some(request) = frames.next_frame() {
            trace!(len = request.len(), "Dispatching request");
            let response = dispatcher.dispatch(&request);
            stream.write_all(&frame_response(&response))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Dispatcher that tags each request so responses are distinguishable.
    struct Echo;

    impl Dispatch for Echo {
        fn dispatch(&self, request: &str) -> String {
            format!("echo:{request}")
        }
    }

    /// In-memory stream with scripted reads and captured writes.
    struct ScriptedStream {
        reads: VecDeque<Vec<u8>>,
        written: Vec<u8>,
    }

    impl ScriptedStream {
        fn new(reads: Vec<Vec<u8>>) -> Self {
            Self {
                reads: reads.into(),
                written: Vec::new(),
            }
        }
    }

    impl Read for ScriptedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                None => Ok(0),
                Some(mut chunk) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        self.reads.push_front(chunk.split_off(n));
                    }
                    Ok(n)
                }
            }
        }
    }

    impl Write for ScriptedStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_responses_in_request_order() {
        let mut stream = ScriptedStream::new(vec![b"one\r\n\r\ntwo\r\n\r\nthree\r\n\r\n".to_vec()]);

        serve_connection(&mut stream, &Echo).unwrap();

        assert_eq!(
            stream.written,
            b"echo:one\r\n\r\necho:two\r\n\r\necho:three\r\n\r\n"
        );
    }

    #[test]
    fn test_frame_split_across_reads() {
        let mut stream = ScriptedStream::new(vec![
            b"GET fi".to_vec(),
            b"le.txt\r".to_vec(),
            b"\n\r\n".to_vec(),
        ]);

        serve_connection(&mut stream, &Echo).unwrap();

        assert_eq!(stream.written, b"echo:GET file.txt\r\n\r\n");
    }

    #[test]
    fn test_one_byte_reads() {
        let reads = b"hello\r\n\r\n".iter().map(|&b| vec![b]).collect();
        let mut stream = ScriptedStream::new(reads);

        serve_connection(&mut stream, &Echo).unwrap();

        assert_eq!(stream.written, b"echo:hello\r\n\r\n");
    }

    #[test]
    fn test_orderly_close_with_partial_frame() {
        // Peer disconnects before completing a frame; nothing is dispatched.
        let mut stream = ScriptedStream::new(vec![b"GET half".to_vec()]);

        serve_connection(&mut stream, &Echo).unwrap();

        assert!(stream.written.is_empty());
    }

    #[test]
    fn test_read_error_ends_session() {
        struct FailingStream;

        impl Read for FailingStream {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        impl Write for FailingStream {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = serve_connection(&mut FailingStream, &Echo).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
