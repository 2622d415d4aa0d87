// lib.rs

mod core;
mod reader;
mod transport;
mod writer;

pub use crate::core::{ConfigError, RegisterValue};
pub use reader::{HoldingRegistersReader, HoldingRegistersReaderBuilder};
pub use transport::RegisterTransport;
pub use writer::{ModbusWriter, ModbusWriterBuilder};

#[derive(Debug, thiserror::Error)]
pub enum ModbusMasterError<E>
where
    E: std::error::Error + 'static,
{
    #[error("Transport error: {0}")]
    Transport(#[source] E),

    #[error("Address range overflow: {address} + {count} > 65536")]
    AddressOverflow { address: u16, count: usize },

    #[error("Response length mismatch at address {address}: expected {expected}, received {actual}")]
    ResponseLengthMismatch { address: u16, expected: usize, actual: usize },
}

impl<E> ModbusMasterError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns the transport fault, if that is what this error carries.
    pub fn into_transport(self) -> Option<E> {
        match self {
            ModbusMasterError::Transport(err) => Some(err),
            _ => None,
        }
    }
}
