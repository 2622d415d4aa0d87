use std::rc::Rc;
use std::sync::Arc;

/// Register-level Modbus master capability.
///
/// Implementors own framing, addressing and link-level policy. Each call is
/// expected to be atomic and to reject counts above its own protocol limit.
/// Methods take `&self` so one transport can back a reader and a writer at the
/// same time; serialize access internally if the link cannot be shared.
pub trait RegisterTransport {
    type Error: std::error::Error + 'static;

    /// Reads `count` holding registers (FC 0x03). `count` never exceeds 125.
    fn read_holding_registers(&self, slave_id: u8, address: u16, count: u16) -> Result<Vec<u16>, Self::Error>;

    /// Writes consecutive registers (FC 0x10). `values` never exceeds 123.
    fn write_multiple_registers(&self, slave_id: u8, address: u16, values: &[u16]) -> Result<(), Self::Error>;

    /// Writes one register (FC 0x06).
    fn write_single_register(&self, slave_id: u8, address: u16, value: u16) -> Result<(), Self::Error>;

    /// Writes one coil (FC 0x05).
    fn write_single_coil(&self, slave_id: u8, address: u16, value: bool) -> Result<(), Self::Error>;

    /// Writes consecutive coils (FC 0x0F).
    fn write_multiple_coils(&self, slave_id: u8, address: u16, values: &[bool]) -> Result<(), Self::Error>;
}

macro_rules! forward_transport {
    ($($ptr:ty),*) => {$(
        impl<T: RegisterTransport + ?Sized> RegisterTransport for $ptr {
            type Error = T::Error;

            fn read_holding_registers(&self, slave_id: u8, address: u16, count: u16) -> Result<Vec<u16>, Self::Error> {
                (**self).read_holding_registers(slave_id, address, count)
            }

            fn write_multiple_registers(&self, slave_id: u8, address: u16, values: &[u16]) -> Result<(), Self::Error> {
                (**self).write_multiple_registers(slave_id, address, values)
            }

            fn write_single_register(&self, slave_id: u8, address: u16, value: u16) -> Result<(), Self::Error> {
                (**self).write_single_register(slave_id, address, value)
            }

            fn write_single_coil(&self, slave_id: u8, address: u16, value: bool) -> Result<(), Self::Error> {
                (**self).write_single_coil(slave_id, address, value)
            }

            fn write_multiple_coils(&self, slave_id: u8, address: u16, values: &[bool]) -> Result<(), Self::Error> {
                (**self).write_multiple_coils(slave_id, address, values)
            }
        }
    )*};
}

forward_transport!(&T, Box<T>, Rc<T>, Arc<T>);
