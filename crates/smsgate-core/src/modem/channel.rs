//! Transport channel to the modem
//!
//! The AT protocol is half-duplex text with no request IDs, so the channel
//! has a single logical owner: the command engine holds the only handle and
//! serializes every exchange.

use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Byte-oriented duplex channel to the modem (serial port, or TCP for
/// ser2net-style bridges)
pub trait ModemChannel: Read + Write + Send {
    /// Set the timeout for a single blocking read
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Discard any unread input (stale response data)
    fn clear_input_buffer(&mut self) -> io::Result<()>;
}

/// Serial port wrapper implementing [`ModemChannel`]
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Wrap an already-open serial port
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl Read for SerialChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl ModemChannel for SerialChannel {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port
            .set_timeout(timeout)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    fn clear_input_buffer(&mut self) -> io::Result<()> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// TCP stream wrapper implementing [`ModemChannel`], for modems reachable
/// through a serial-to-network bridge
pub struct TcpChannel {
    stream: TcpStream,
}

impl TcpChannel {
    /// Connect to a bridge address
    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        Ok(Self { stream })
    }
}

impl Read for TcpChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TcpChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl ModemChannel for TcpChannel {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.stream.set_read_timeout(Some(timeout))?;
        self.stream.set_write_timeout(Some(timeout))?;
        Ok(())
    }

    fn clear_input_buffer(&mut self) -> io::Result<()> {
        // TCP has no "clear buffer" syscall; drain with non-blocking reads
        // and restore blocking mode afterwards.
        self.stream.set_nonblocking(true)?;
        let mut buf = [0u8; 1024];
        loop {
            match self.stream.read(&mut buf) {
                Ok(0) => break,       // EOF
                Ok(_) => continue,    // Discard
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break, // Empty
                Err(e) => {
                    let _ = self.stream.set_nonblocking(false);
                    return Err(e);
                }
            }
        }
        self.stream.set_nonblocking(false)?;
        Ok(())
    }
}
