use crate::core::{span_fits, validate_registers_per_request, ConfigError, RegisterValue};
use crate::{ModbusMasterError, RegisterTransport};

type ReadResult<V, T> = Result<V, ModbusMasterError<<T as RegisterTransport>::Error>>;

pub struct HoldingRegistersReaderBuilder<T> {
    transport: T,
    registers_per_request: Option<u16>,
    little_endian: Option<bool>,
}

impl<T: RegisterTransport> HoldingRegistersReaderBuilder<T> {
    pub fn registers_per_request(mut self, count: u16) -> Self {
        self.registers_per_request = Some(count);
        self
    }

    pub fn little_endian(mut self, little_endian: bool) -> Self {
        self.little_endian = Some(little_endian);
        self
    }

    pub fn build(self) -> Result<HoldingRegistersReader<T>, ConfigError> {
        let registers_per_request = match self.registers_per_request {
            Some(count) => validate_registers_per_request(
                count,
                HoldingRegistersReader::<T>::MAXIMUM_REGISTERS_PER_REQUEST,
            )?,
            None => HoldingRegistersReader::<T>::MAXIMUM_REGISTERS_PER_REQUEST,
        };

        Ok(HoldingRegistersReader {
            transport: self.transport,
            registers_per_request,
            little_endian: self.little_endian.unwrap_or(true),
        })
    }
}

/// Reads typed values and arbitrarily long register blocks from holding
/// registers, splitting requests to fit the FC 0x03 quantity limit.
///
/// Chunks are issued in ascending address order. When a chunk fails, every
/// chunk before it has completed and none after it has been sent.
pub struct HoldingRegistersReader<T> {
    transport: T,
    registers_per_request: u16,
    little_endian: bool,
}

impl<T: RegisterTransport> HoldingRegistersReader<T> {
    /// Largest quantity a single read holding registers request may carry.
    pub const MAXIMUM_REGISTERS_PER_REQUEST: u16 = 125;

    pub fn new(transport: T) -> Self {
        HoldingRegistersReader {
            transport,
            registers_per_request: Self::MAXIMUM_REGISTERS_PER_REQUEST,
            little_endian: true,
        }
    }

    pub fn builder(transport: T) -> HoldingRegistersReaderBuilder<T> {
        HoldingRegistersReaderBuilder {
            transport,
            registers_per_request: None,
            little_endian: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Whether multi-register values are decoded as little-endian.
    pub fn little_endian(&self) -> bool {
        self.little_endian
    }

    pub fn set_little_endian(&mut self, little_endian: bool) {
        self.little_endian = little_endian;
    }

    pub fn registers_per_request(&self) -> u16 {
        self.registers_per_request
    }

    /// Rejects 0 and anything above [`Self::MAXIMUM_REGISTERS_PER_REQUEST`],
    /// keeping the previous value.
    pub fn set_registers_per_request(&mut self, count: u16) -> Result<(), ConfigError> {
        self.registers_per_request =
            validate_registers_per_request(count, Self::MAXIMUM_REGISTERS_PER_REQUEST)?;
        Ok(())
    }

    /// Reads one scalar with a single request of `V::REGISTERS` registers.
    pub fn read<V: RegisterValue>(&self, slave_id: u8, address: u16) -> ReadResult<V, T> {
        let count = V::REGISTERS;
        if !span_fits(address, count as usize) {
            return Err(ModbusMasterError::AddressOverflow { address, count: count as usize });
        }

        tracing::trace!(slave_id, address, count, "reading scalar");
        let registers = self
            .transport
            .read_holding_registers(slave_id, address, count)
            .map_err(ModbusMasterError::Transport)?;

        V::decode(&registers, self.little_endian).ok_or_else(|| ModbusMasterError::ResponseLengthMismatch {
            address,
            expected: count as usize,
            actual: registers.len(),
        })
    }

    pub fn read_i16(&self, slave_id: u8, address: u16) -> ReadResult<i16, T> {
        self.read(slave_id, address)
    }

    pub fn read_u16(&self, slave_id: u8, address: u16) -> ReadResult<u16, T> {
        self.read(slave_id, address)
    }

    pub fn read_i32(&self, slave_id: u8, address: u16) -> ReadResult<i32, T> {
        self.read(slave_id, address)
    }

    pub fn read_u32(&self, slave_id: u8, address: u16) -> ReadResult<u32, T> {
        self.read(slave_id, address)
    }

    pub fn read_i64(&self, slave_id: u8, address: u16) -> ReadResult<i64, T> {
        self.read(slave_id, address)
    }

    pub fn read_u64(&self, slave_id: u8, address: u16) -> ReadResult<u64, T> {
        self.read(slave_id, address)
    }

    pub fn read_f32(&self, slave_id: u8, address: u16) -> ReadResult<f32, T> {
        self.read(slave_id, address)
    }

    pub fn read_f64(&self, slave_id: u8, address: u16) -> ReadResult<f64, T> {
        self.read(slave_id, address)
    }

    /// Reads `count` registers starting at `address`.
    ///
    /// Index `i` of the result always holds register `address + i`, however
    /// many requests it took. A zero count returns an empty vector without
    /// touching the transport.
    pub fn read_registers(&self, slave_id: u8, address: u16, count: u16) -> ReadResult<Vec<u16>, T> {
        if !span_fits(address, count as usize) {
            return Err(ModbusMasterError::AddressOverflow { address, count: count as usize });
        }

        let mut result = vec![0u16; count as usize];
        let mut offset = 0usize;

        while offset < result.len() {
            let chunk_len = (result.len() - offset).min(self.registers_per_request as usize);
            // span_fits guarantees address + offset <= 65535 here
            let chunk_address = address + offset as u16;

            tracing::debug!(slave_id, address = chunk_address, count = chunk_len, "reading register chunk");
            let registers = match self
                .transport
                .read_holding_registers(slave_id, chunk_address, chunk_len as u16)
            {
                Ok(registers) => registers,
                Err(err) => {
                    tracing::debug!(slave_id, address = chunk_address, error = %err, "register chunk read failed");
                    return Err(ModbusMasterError::Transport(err));
                }
            };

            if registers.len() != chunk_len {
                return Err(ModbusMasterError::ResponseLengthMismatch {
                    address: chunk_address,
                    expected: chunk_len,
                    actual: registers.len(),
                });
            }

            result[offset..offset + chunk_len].copy_from_slice(&registers);
            offset += chunk_len;
        }

        Ok(result)
    }
}
