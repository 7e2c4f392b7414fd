//! Errors surfaced by the lamp engine and its collaborators.

use std::io;

use thiserror::Error;
use uuid::Uuid;

use crate::protocol::ProtocolError;
use crate::transport::{LampAddress, TransportError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input, rejected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The link to the lamp could not be established.
    #[error("unable to connect to lamp {address}")]
    Connection {
        address: LampAddress,
        #[source]
        source: TransportError,
    },

    /// The control characteristic is missing on the peripheral.
    #[error("characteristic {characteristic} of service {service} not found")]
    CharacteristicNotFound {
        service: Uuid,
        characteristic: Uuid,
        #[source]
        source: Option<TransportError>,
    },

    /// Writing a packet to a resolved characteristic failed.
    #[error("failed to write command to lamp")]
    TransportWrite(#[source] TransportError),

    /// Tearing down the link failed. Local connection state is cleared anyway.
    #[error("failed to disconnect from lamp")]
    Disconnect(#[source] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
