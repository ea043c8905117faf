use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The store that owned the receiving side has been dropped.
    #[error("Event channel closed, context: {context}")]
    ChannelClosed { context: String },
}

impl Error {
    pub fn channel_closed(context: impl Into<String>) -> Self {
        Self::ChannelClosed {
            context: context.into(),
        }
    }
}
