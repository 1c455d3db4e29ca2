//! `embedded-hal` 1.0 / `embedded-io` 0.6 interop
//!
//! Lets ecosystem driver crates consume the handles directly:
//!
//! | Handle    | Traits                                                   |
//! |-----------|----------------------------------------------------------|
//! | `Gpio<H>` | `OutputPin`, `StatefulOutputPin`, `InputPin`             |
//! | `Spi<H>`  | `SpiBus<u8>`                                             |
//! | `I2c<H>`  | `I2c<SevenBitAddress>`                                   |
//! | `Uart<H>` | `embedded_io::Read`, `embedded_io::Write`                |
//!
//! Every impl routes through the capability traits, so configuration
//! checks (output-only writes, MOSI/MISO presence, address range) apply
//! unchanged.

use embedded_hal::digital;
use embedded_hal::i2c::{self, NoAcknowledgeSource, Operation, SevenBitAddress};
use embedded_hal::spi;

use crate::error::ErrorCode;
use crate::gpio::{Gpio, GpioHardware, GpioPin};
use crate::i2c::{I2c, I2cHardware, I2cPeripheral};
use crate::spi::{Spi, SpiHardware, SpiPeripheral};
use crate::uart::{Uart, UartHardware, UartPeripheral};

// ─── Error kinds ─────────────────────────────────────────────────────────────

impl digital::Error for ErrorCode {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl spi::Error for ErrorCode {
    fn kind(&self) -> spi::ErrorKind {
        match self {
            Self::Overrun => spi::ErrorKind::Overrun,
            _ => spi::ErrorKind::Other,
        }
    }
}

impl i2c::Error for ErrorCode {
    fn kind(&self) -> i2c::ErrorKind {
        match self {
            Self::AddressNack => i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Self::DataNack => i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Self::ArbitrationLost => i2c::ErrorKind::ArbitrationLoss,
            Self::BusError => i2c::ErrorKind::Bus,
            Self::Overrun => i2c::ErrorKind::Overrun,
            _ => i2c::ErrorKind::Other,
        }
    }
}

impl embedded_io::Error for ErrorCode {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::Timeout => embedded_io::ErrorKind::TimedOut,
            Self::InvalidParameter => embedded_io::ErrorKind::InvalidInput,
            Self::NotSupported => embedded_io::ErrorKind::Unsupported,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

// ─── GPIO ────────────────────────────────────────────────────────────────────

impl<H: GpioHardware> digital::ErrorType for Gpio<H> {
    type Error = ErrorCode;
}

impl<H: GpioHardware> digital::OutputPin for Gpio<H> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        GpioPin::clear(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        GpioPin::set(self)
    }
}

impl<H: GpioHardware> digital::StatefulOutputPin for Gpio<H> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        GpioPin::read(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        GpioPin::read(self).map(|high| !high)
    }
}

impl<H: GpioHardware> digital::InputPin for Gpio<H> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        GpioPin::read(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        GpioPin::read(self).map(|high| !high)
    }
}

// ─── SPI ─────────────────────────────────────────────────────────────────────

impl<H: SpiHardware> spi::ErrorType for Spi<H> {
    type Error = ErrorCode;
}

impl<H: SpiHardware> spi::SpiBus<u8> for Spi<H> {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        SpiPeripheral::receive(self, words)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        SpiPeripheral::transmit(self, words)
    }

    /// Unequal lengths: the shared prefix is full-duplex, the longer side
    /// finishes half-duplex.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let common = read.len().min(write.len());
        let (read_head, read_tail) = read.split_at_mut(common);
        let (write_head, write_tail) = write.split_at(common);
        if common > 0 {
            SpiPeripheral::transfer(self, write_head, read_head)?;
        }
        if !write_tail.is_empty() {
            SpiPeripheral::transmit(self, write_tail)?;
        }
        if !read_tail.is_empty() {
            SpiPeripheral::receive(self, read_tail)?;
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        SpiPeripheral::transfer_in_place(self, words)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        while SpiPeripheral::is_busy(self) {
            core::hint::spin_loop();
        }
        Ok(())
    }
}

// ─── I2C ─────────────────────────────────────────────────────────────────────

impl<H: I2cHardware> i2c::ErrorType for I2c<H> {
    type Error = ErrorCode;
}

impl<H: I2cHardware> i2c::I2c<SevenBitAddress> for I2c<H> {
    fn read(&mut self, address: SevenBitAddress, read: &mut [u8]) -> Result<(), Self::Error> {
        I2cPeripheral::read(self, u16::from(address), read)
    }

    fn write(&mut self, address: SevenBitAddress, write: &[u8]) -> Result<(), Self::Error> {
        I2cPeripheral::write(self, u16::from(address), write)
    }

    fn write_read(
        &mut self,
        address: SevenBitAddress,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        I2cPeripheral::write_read(self, u16::from(address), write, read)
    }

    /// One START, one STOP. Adjacent same-direction operations are merged;
    /// the single direction change (writes then reads) becomes a repeated
    /// start through `write_read`. A write after a read has no primitive
    /// and returns `NotSupported` without touching the bus.
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let address = u16::from(address);
        let first_read = operations
            .iter()
            .position(|op| matches!(op, Operation::Read(_)))
            .unwrap_or(operations.len());
        let (writes, reads) = operations.split_at_mut(first_read);
        if reads.iter().any(|op| matches!(op, Operation::Write(_))) {
            hal_warn!("i2c transaction writes after a read");
            return Err(ErrorCode::NotSupported);
        }

        match (writes, reads) {
            ([], []) => Ok(()),
            ([Operation::Write(data)], []) => I2cPeripheral::write(self, address, data),
            ([], [Operation::Read(buffer)]) => I2cPeripheral::read(self, address, buffer),
            ([Operation::Write(data)], [Operation::Read(buffer)]) => {
                I2cPeripheral::write_read(self, address, data, buffer)
            }
            (writes, reads) => merged_transaction(self, address, writes, reads),
        }
    }
}

/// Bytes a merged transaction may stage per direction.
pub const TRANSACTION_SCRATCH: usize = 64;

/// Gather every write into one buffer, read into one buffer, then scatter
/// the read bytes back in operation order.
fn merged_transaction<P: I2cPeripheral>(
    bus: &mut P,
    address: u16,
    writes: &[Operation<'_>],
    reads: &mut [Operation<'_>],
) -> Result<(), ErrorCode> {
    let mut outgoing: heapless::Vec<u8, TRANSACTION_SCRATCH> = heapless::Vec::new();
    for op in writes {
        if let Operation::Write(data) = op {
            outgoing
                .extend_from_slice(data)
                .map_err(|_| ErrorCode::NotSupported)?;
        }
    }

    let read_len = reads
        .iter()
        .try_fold(0usize, |total, op| match op {
            Operation::Read(buffer) => total.checked_add(buffer.len()),
            Operation::Write(_) => Some(total),
        })
        .ok_or(ErrorCode::NotSupported)?;
    let mut scratch = [0u8; TRANSACTION_SCRATCH];
    let incoming = scratch.get_mut(..read_len).ok_or(ErrorCode::NotSupported)?;

    if incoming.is_empty() {
        return bus.write(address, &outgoing);
    }
    if outgoing.is_empty() {
        bus.read(address, incoming)?;
    } else {
        bus.write_read(address, &outgoing, incoming)?;
    }

    let mut rest: &[u8] = incoming;
    for op in reads {
        if let Operation::Read(buffer) = op {
            let (head, tail) = rest.split_at(buffer.len());
            buffer.copy_from_slice(head);
            rest = tail;
        }
    }
    Ok(())
}

// ─── UART ────────────────────────────────────────────────────────────────────

impl<H: UartHardware> embedded_io::ErrorType for Uart<H> {
    type Error = ErrorCode;
}

impl<H: UartHardware> embedded_io::Read for Uart<H> {
    /// Blocks for the first byte, then drains whatever else is buffered.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some((first, rest)) = buf.split_first_mut() else {
            return Ok(0);
        };
        *first = UartPeripheral::receive(self)?;
        if rest.is_empty() || !UartPeripheral::is_readable(self) {
            return Ok(1);
        }
        let more = UartPeripheral::receive_buffer(self, rest)?;
        Ok(more.saturating_add(1))
    }
}

impl<H: UartHardware> embedded_io::Write for Uart<H> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        match UartPeripheral::send_buffer(self, buf)? {
            0 => Err(ErrorCode::Busy),
            accepted => Ok(accepted),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        UartPeripheral::flush(self)
    }
}
