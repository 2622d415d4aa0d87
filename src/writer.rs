use crate::core::{span_fits, validate_registers_per_request, ConfigError, RegisterValue};
use crate::{ModbusMasterError, RegisterTransport};

type WriteResult<T> = Result<(), ModbusMasterError<<T as RegisterTransport>::Error>>;

pub struct ModbusWriterBuilder<T> {
    transport: T,
    registers_per_request: Option<u16>,
    little_endian: Option<bool>,
}

impl<T: RegisterTransport> ModbusWriterBuilder<T> {
    pub fn registers_per_request(mut self, count: u16) -> Self {
        self.registers_per_request = Some(count);
        self
    }

    pub fn little_endian(mut self, little_endian: bool) -> Self {
        self.little_endian = Some(little_endian);
        self
    }

    pub fn build(self) -> Result<ModbusWriter<T>, ConfigError> {
        let registers_per_request = match self.registers_per_request {
            Some(count) => {
                validate_registers_per_request(count, ModbusWriter::<T>::MAXIMUM_REGISTERS_PER_REQUEST)?
            }
            None => ModbusWriter::<T>::MAXIMUM_REGISTERS_PER_REQUEST,
        };

        Ok(ModbusWriter {
            transport: self.transport,
            registers_per_request,
            little_endian: self.little_endian.unwrap_or(true),
        })
    }
}

/// Writes typed values, register blocks and coils, splitting register blocks
/// to fit the FC 0x10 quantity limit.
///
/// Coil blocks are handed to the transport in one request; their limit is the
/// transport's concern.
pub struct ModbusWriter<T> {
    transport: T,
    registers_per_request: u16,
    little_endian: bool,
}

impl<T: RegisterTransport> ModbusWriter<T> {
    /// Largest quantity a single write multiple registers request may carry.
    pub const MAXIMUM_REGISTERS_PER_REQUEST: u16 = 123;

    pub fn new(transport: T) -> Self {
        ModbusWriter {
            transport,
            registers_per_request: Self::MAXIMUM_REGISTERS_PER_REQUEST,
            little_endian: true,
        }
    }

    pub fn builder(transport: T) -> ModbusWriterBuilder<T> {
        ModbusWriterBuilder {
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

    /// Whether multi-register values are encoded as little-endian.
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

    /// Writes one scalar. Single-register values go out as a single register
    /// write, wider ones as one multiple-register write.
    pub fn write<V: RegisterValue>(&self, slave_id: u8, address: u16, value: V) -> WriteResult<T> {
        let count = V::REGISTERS as usize;
        if !span_fits(address, count) {
            return Err(ModbusMasterError::AddressOverflow { address, count });
        }

        let registers = value.encode(self.little_endian);
        tracing::trace!(slave_id, address, ?registers, "writing scalar");

        let written = match registers.as_slice() {
            [register] => self.transport.write_single_register(slave_id, address, *register),
            _ => self.transport.write_multiple_registers(slave_id, address, &registers),
        };
        written.map_err(ModbusMasterError::Transport)
    }

    pub fn write_i16(&self, slave_id: u8, address: u16, value: i16) -> WriteResult<T> {
        self.write(slave_id, address, value)
    }

    pub fn write_u16(&self, slave_id: u8, address: u16, value: u16) -> WriteResult<T> {
        self.write(slave_id, address, value)
    }

    pub fn write_i32(&self, slave_id: u8, address: u16, value: i32) -> WriteResult<T> {
        self.write(slave_id, address, value)
    }

    pub fn write_u32(&self, slave_id: u8, address: u16, value: u32) -> WriteResult<T> {
        self.write(slave_id, address, value)
    }

    pub fn write_i64(&self, slave_id: u8, address: u16, value: i64) -> WriteResult<T> {
        self.write(slave_id, address, value)
    }

    pub fn write_u64(&self, slave_id: u8, address: u16, value: u64) -> WriteResult<T> {
        self.write(slave_id, address, value)
    }

    pub fn write_f32(&self, slave_id: u8, address: u16, value: f32) -> WriteResult<T> {
        self.write(slave_id, address, value)
    }

    pub fn write_f64(&self, slave_id: u8, address: u16, value: f64) -> WriteResult<T> {
        self.write(slave_id, address, value)
    }

    /// Writes `registers` starting at `address`, one request per
    /// `registers_per_request` registers, in ascending address order.
    pub fn write_registers(&self, slave_id: u8, address: u16, registers: &[u16]) -> WriteResult<T> {
        if !span_fits(address, registers.len()) {
            return Err(ModbusMasterError::AddressOverflow { address, count: registers.len() });
        }

        for (index, chunk) in registers.chunks(self.registers_per_request as usize).enumerate() {
            let chunk_address = address + (index * self.registers_per_request as usize) as u16;

            tracing::debug!(slave_id, address = chunk_address, count = chunk.len(), "writing register chunk");
            if let Err(err) = self.transport.write_multiple_registers(slave_id, chunk_address, chunk) {
                tracing::debug!(slave_id, address = chunk_address, error = %err, "register chunk write failed");
                return Err(ModbusMasterError::Transport(err));
            }
        }

        Ok(())
    }

    pub fn write_coil(&self, slave_id: u8, address: u16, value: bool) -> WriteResult<T> {
        tracing::trace!(slave_id, address, value, "writing coil");
        self.transport
            .write_single_coil(slave_id, address, value)
            .map_err(ModbusMasterError::Transport)
    }

    /// Writes all `coils` in a single request, unchunked.
    pub fn write_coils(&self, slave_id: u8, address: u16, coils: &[bool]) -> WriteResult<T> {
        if !span_fits(address, coils.len()) {
            return Err(ModbusMasterError::AddressOverflow { address, count: coils.len() });
        }

        tracing::debug!(slave_id, address, count = coils.len(), "writing coils");
        self.transport
            .write_multiple_coils(slave_id, address, coils)
            .map_err(ModbusMasterError::Transport)
    }
}
