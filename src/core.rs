use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Registers per request {value} out of range, expected 1..={maximum}")]
    InvalidRegistersPerRequest { value: u16, maximum: u16 },
}

/// Highest register address plus one.
pub(crate) const ADDRESS_SPACE: usize = 1 << 16;

pub(crate) fn validate_registers_per_request(value: u16, maximum: u16) -> Result<u16, ConfigError> {
    if value == 0 || value > maximum {
        return Err(ConfigError::InvalidRegistersPerRequest { value, maximum });
    }
    Ok(value)
}

/// `true` when `address..address + count` stays inside the 16-bit address space.
pub(crate) fn span_fits(address: u16, count: usize) -> bool {
    address as usize + count <= ADDRESS_SPACE
}

/// Whether the configured byte order differs from the target's.
fn needs_reversal(little_endian: bool) -> bool {
    little_endian != cfg!(target_endian = "little")
}

/// Packs bytes already laid out in the configured order into registers, so
/// little-endian puts the low word first and big-endian the high word first.
fn pack_registers(bytes: &[u8], little_endian: bool) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if little_endian {
                u16::from_le_bytes(pair)
            } else {
                u16::from_be_bytes(pair)
            }
        })
        .collect()
}

fn unpack_registers(registers: &[u16], bytes: &mut [u8], little_endian: bool) {
    for (pair, register) in bytes.chunks_exact_mut(2).zip(registers) {
        let register = if little_endian {
            register.to_le_bytes()
        } else {
            register.to_be_bytes()
        };
        pair.copy_from_slice(&register);
    }
}

/// A scalar stored across one or more consecutive 16-bit registers.
///
/// Values wider than one register are laid out from their native byte
/// encoding, reversed as a whole when `little_endian` disagrees with the
/// target, then packed into registers in that same order: `0x12345678` is
/// `[0x5678, 0x1234]` little-endian and `[0x1234, 0x5678]` big-endian on any
/// host.
/// Single-register values are written as-is and byte-swapped on read when the
/// flag disagrees with the target.
pub trait RegisterValue: Copy {
    /// Registers occupied by one value.
    const REGISTERS: u16;

    fn encode(self, little_endian: bool) -> Vec<u16>;

    /// Returns `None` unless `registers` holds exactly [`Self::REGISTERS`] entries.
    fn decode(registers: &[u16], little_endian: bool) -> Option<Self>;
}

macro_rules! impl_single_register_value {
    ($($ty:ty),*) => {$(
        impl RegisterValue for $ty {
            const REGISTERS: u16 = 1;

            fn encode(self, _little_endian: bool) -> Vec<u16> {
                vec![self as u16]
            }

            fn decode(registers: &[u16], little_endian: bool) -> Option<Self> {
                let &[register] = registers else {
                    return None;
                };
                if needs_reversal(little_endian) {
                    Some(register.swap_bytes() as $ty)
                } else {
                    Some(register as $ty)
                }
            }
        }
    )*};
}

macro_rules! impl_multi_register_value {
    ($($ty:ty),*) => {$(
        impl RegisterValue for $ty {
            const REGISTERS: u16 = (size_of::<$ty>() / 2) as u16;

            fn encode(self, little_endian: bool) -> Vec<u16> {
                let mut bytes = self.to_ne_bytes();
                if needs_reversal(little_endian) {
                    bytes.reverse();
                }
                pack_registers(&bytes, little_endian)
            }

            fn decode(registers: &[u16], little_endian: bool) -> Option<Self> {
                if registers.len() != Self::REGISTERS as usize {
                    return None;
                }
                let mut bytes = [0u8; size_of::<$ty>()];
                unpack_registers(registers, &mut bytes, little_endian);
                if needs_reversal(little_endian) {
                    bytes.reverse();
                }
                Some(<$ty>::from_ne_bytes(bytes))
            }
        }
    )*};
}

impl_single_register_value!(i16, u16);
impl_multi_register_value!(i32, u32, i64, u64, f32, f64);
