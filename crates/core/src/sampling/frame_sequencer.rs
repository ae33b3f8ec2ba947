/// Tag for one in-flight sample: the frame it was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
    frame_index: usize,
}

impl FrameTicket {
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }
}

/// Drops results that arrive for frames already superseded by a newer one.
///
/// In-flight samples are never cancelled. The caller issues a ticket when it
/// starts sampling a frame and hands the result back through
/// [`FrameSequencer::accept`], which only lets through results for the newest
/// issued frame that are also newer than anything accepted before.
#[derive(Debug, Default)]
pub struct FrameSequencer {
    latest_issued: Option<usize>,
    last_accepted: Option<usize>,
    dropped: usize,
}

impl FrameSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, frame_index: usize) -> FrameTicket {
        self.latest_issued = Some(self.latest_issued.map_or(frame_index, |i| i.max(frame_index)));
        FrameTicket { frame_index }
    }

    pub fn accept<T>(&mut self, ticket: FrameTicket, result: T) -> Option<T> {
        let index = ticket.frame_index;
        let superseded = self.latest_issued.is_some_and(|latest| index < latest);
        let stale = self.last_accepted.is_some_and(|last| index <= last);
        if superseded || stale {
            self.dropped += 1;
            log::debug!("Dropping stale result for frame {index}");
            return None;
        }
        self.last_accepted = Some(index);
        Some(result)
    }

    /// Number of results dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
