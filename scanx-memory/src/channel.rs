use scanx_core::{ColumnInfo, Cursor, Error, Result, Row, Slot, assign_row};
use tokio::sync::mpsc::{self, Receiver, Sender};

/// Creates a cursor fed by a producer, possibly running on another thread.
///
/// At most `buffer` rows wait in the channel, the producer is suspended until
/// the cursor makes room. The result ends when every [`RowSender`] is dropped.
pub fn channel(columns: Vec<ColumnInfo>, buffer: usize) -> (RowSender, ChannelCursor) {
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    (
        RowSender { sender },
        ChannelCursor {
            columns,
            receiver,
            done: false,
        },
    )
}

/// Producing half of [`channel`].
#[derive(Debug, Clone)]
pub struct RowSender {
    sender: Sender<Result<Row>>,
}

impl RowSender {
    /// Sends a row, blocking while the channel is full. Must not be called
    /// from an asynchronous context.
    pub fn send(&self, row: Row) -> Result<()> {
        self.sender
            .blocking_send(Ok(row))
            .map_err(|_| Error::msg("The cursor was closed, the row cannot be sent"))
    }

    pub async fn send_async(&self, row: Row) -> Result<()> {
        self.sender
            .send(Ok(row))
            .await
            .map_err(|_| Error::msg("The cursor was closed, the row cannot be sent"))
    }

    /// Ends the result with an error.
    pub fn fail(self, error: Error) -> Result<()> {
        self.sender
            .blocking_send(Err(error))
            .map_err(|_| Error::msg("The cursor was closed, the error cannot be sent"))
    }
}

/// Consuming half of [`channel`], each fetch blocks until a row arrives.
#[derive(Debug)]
pub struct ChannelCursor {
    columns: Vec<ColumnInfo>,
    receiver: Receiver<Result<Row>>,
    done: bool,
}

impl Cursor for ChannelCursor {
    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    fn row_count_hint(&self) -> usize {
        self.receiver.len()
    }

    fn fetch_into(&mut self, slots: &mut [Slot<'_>]) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        match self.receiver.blocking_recv() {
            Some(Ok(row)) => {
                assign_row(slots, row.into_vec())?;
                Ok(true)
            }
            Some(Err(e)) => {
                self.done = true;
                Err(e)
            }
            None => {
                log::debug!("The channel was closed by the producer");
                self.done = true;
                Ok(false)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.done = true;
        self.receiver.close();
        Ok(())
    }
}
