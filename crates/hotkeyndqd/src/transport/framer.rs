//! Newline framing of the command byte stream.

use tracing::warn;

use crate::protocol::Message;

use super::{FrameError, TRANSPORT_TARGET};

/// Accumulates bytes from one connection and splits them into lines.
///
/// Lines are delimited by `\n`; the delimiter is not part of the yielded
/// line. Lines consisting only of ASCII whitespace are skipped.
#[derive(Debug)]
pub(crate) struct LineFramer {
    buffer: Vec<u8>,
    max_line_bytes: usize,
}

impl LineFramer {
    pub(crate) const fn new(max_line_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line_bytes,
        }
    }

    /// Appends a chunk read from the socket.
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Removes and returns the next complete non-blank line.
    pub(crate) fn next_line(&mut self) -> Option<Vec<u8>> {
        loop {
            let newline = self.buffer.iter().position(|byte| *byte == b'\n')?;
            let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Some(line);
        }
    }

    /// Decodes complete lines lazily, logging and dropping malformed ones.
    pub(crate) fn messages(&mut self) -> Messages<'_> {
        Messages { framer: self }
    }

    /// Checks the incomplete tail against the configured cap.
    ///
    /// Call after draining complete lines so only the unterminated remainder
    /// counts towards the limit.
    pub(crate) fn ensure_within_limit(&self) -> Result<(), FrameError> {
        if self.buffer.len() > self.max_line_bytes {
            return Err(FrameError::LineTooLong {
                pending: self.buffer.len(),
                limit: self.max_line_bytes,
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Iterator over the messages currently framed in a [`LineFramer`].
pub(crate) struct Messages<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Messages<'_> {
    type Item = Message;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.framer.next_line()?;
            match Message::parse(&line) {
                Ok(message) => return Some(message),
                Err(error) => warn!(
                    target: TRANSPORT_TARGET,
                    error = %error,
                    line = %String::from_utf8_lossy(&line),
                    "dropping malformed line"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    const STREAM: &[u8] = b"{\"type\":\"command\",\"id\":\"GEAR_TOGGLE\"}\n\n  \t\r\n{bad json\n{\"type\":\"command\",\"id\":\"FLAPS_UP\",\"extra\":true}\r\n{\"type\":\"status\"}\n";

    #[fixture]
    fn framer() -> LineFramer {
        LineFramer::new(64 * 1024)
    }

    fn ids(framer: &mut LineFramer) -> Vec<Option<String>> {
        framer.messages().map(|message| message.id).collect()
    }

    #[rstest]
    fn yields_lines_without_delimiters(mut framer: LineFramer) {
        framer.push(b"first\nsecond\r\nthird");
        assert_eq!(framer.next_line(), Some(b"first".to_vec()));
        assert_eq!(framer.next_line(), Some(b"second\r".to_vec()));
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.pending(), b"third".len());
    }

    #[rstest]
    fn blank_lines_are_skipped(mut framer: LineFramer) {
        framer.push(b"\n   \n\t\r\n\n");
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.pending(), 0);
    }

    #[rstest]
    fn malformed_lines_do_not_stop_later_messages(mut framer: LineFramer) {
        framer.push(STREAM);
        assert_eq!(
            ids(&mut framer),
            vec![
                Some("GEAR_TOGGLE".to_owned()),
                Some("FLAPS_UP".to_owned()),
                None
            ]
        );
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    #[case(1024)]
    fn output_is_independent_of_chunk_size(mut framer: LineFramer, #[case] chunk_size: usize) {
        let mut reference = LineFramer::new(64 * 1024);
        reference.push(STREAM);
        let expected = ids(&mut reference);

        let mut seen = Vec::new();
        for chunk in STREAM.chunks(chunk_size) {
            framer.push(chunk);
            seen.extend(ids(&mut framer));
        }
        assert_eq!(seen, expected);
    }

    #[rstest]
    fn every_split_point_yields_the_same_messages(mut framer: LineFramer) {
        let mut reference = LineFramer::new(64 * 1024);
        reference.push(STREAM);
        let expected = ids(&mut reference);

        for split in 0..=STREAM.len() {
            let (head, tail) = STREAM.split_at(split);
            framer.push(head);
            let mut seen = ids(&mut framer);
            framer.push(tail);
            seen.extend(ids(&mut framer));
            assert_eq!(seen, expected, "split at byte {split}");
        }
    }

    #[test]
    fn unterminated_tail_over_limit_is_rejected() {
        let mut framer = LineFramer::new(16);
        framer.push(b"{\"type\":\"command\"}\n");
        framer.push(&[b'x'; 17]);
        assert_eq!(ids(&mut framer), vec![None]);
        assert_eq!(
            framer.ensure_within_limit(),
            Err(FrameError::LineTooLong {
                pending: 17,
                limit: 16
            })
        );
    }

    #[test]
    fn complete_lines_longer_than_limit_are_still_delivered() {
        let mut framer = LineFramer::new(16);
        framer.push(b"{\"type\":\"command\",\"id\":\"AP_MASTER\"}\n");
        assert_eq!(ids(&mut framer), vec![Some("AP_MASTER".to_owned())]);
        assert_eq!(framer.ensure_within_limit(), Ok(()));
    }
}
