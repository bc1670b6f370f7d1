//! Git wire protocol for the clone exchange.
//!
//! Covers pkt-line framing, side-band demultiplexing, the v0/v1 ref
//! advertisement, and the single want/done upload-pack round trip this
//! client performs.

pub mod fetch;
pub mod pktline;
pub mod refs;
pub mod sideband;

use grit_transport::TransportError;

/// Errors that can occur during protocol operations.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid pkt-line: {0}")]
    InvalidPktLine(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("remote error: {0}")]
    Server(String),

    #[error("remote did not advertise HEAD")]
    MissingHead,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
