//! Byte order used when unpacking multi-byte values.
//!
//! Image table rows carry numbers as raw machine words written in the
//! producer's native order, which in practice is little-endian. Decoders
//! take an explicit [`ByteOrder`] and default to little-endian.

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of packed numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Least significant byte first (the default for all buffers)
    #[default]
    LittleEndian,
    /// Most significant byte first
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the machine running this code.
    ///
    /// Only meaningful for buffers that never leave the current process.
    #[inline]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Short name, as accepted by the command line.
    pub const fn name(self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "little",
            ByteOrder::BigEndian => "big",
        }
    }

    /// Read an i64 from the first 8 bytes of a slice.
    ///
    /// # Panics
    /// Panics if the slice has fewer than 8 bytes.
    #[inline]
    pub fn read_i64(self, bytes: &[u8]) -> i64 {
        let raw = [
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ];
        match self {
            ByteOrder::LittleEndian => i64::from_le_bytes(raw),
            ByteOrder::BigEndian => i64::from_be_bytes(raw),
        }
    }

    /// Append an i64 to `out` using this byte order.
    #[inline]
    pub fn write_i64(self, value: i64, out: &mut Vec<u8>) {
        match self {
            ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
