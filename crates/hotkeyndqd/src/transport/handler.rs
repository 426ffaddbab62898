//! Connection handling abstraction for the command listener.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream};

/// Handles accepted command connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Serves one connection until it closes. Runs on its own thread and
    /// should avoid panicking.
    fn handle(&self, stream: TcpStream, peer: SocketAddr);
}

/// Reads one chunk, retrying reads interrupted by a signal.
pub(crate) fn read_chunk_with_retry<R: Read>(stream: &mut R, chunk: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(chunk) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}

/// Returns `true` for the errors a read timeout produces.
pub(crate) fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;

    use super::*;

    struct InterruptOnce<R> {
        interrupted: bool,
        inner: R,
    }

    impl<R: Read> Read for InterruptOnce<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut stream = InterruptOnce {
            interrupted: false,
            inner: Cursor::new(b"GEAR".to_vec()),
        };
        let mut chunk = [0_u8; 8];
        let read = read_chunk_with_retry(&mut stream, &mut chunk).expect("read chunk");
        assert_eq!(&chunk[..read], b"GEAR");
    }

    #[rstest]
    #[case(io::ErrorKind::WouldBlock, true)]
    #[case(io::ErrorKind::TimedOut, true)]
    #[case(io::ErrorKind::ConnectionReset, false)]
    fn classifies_read_timeouts(#[case] kind: io::ErrorKind, #[case] expected: bool) {
        assert_eq!(is_timeout(&io::Error::from(kind)), expected);
    }
}
