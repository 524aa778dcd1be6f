//! Host serial port: a raw-mode tty driven through `async-io`.

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use async_io::Async;
use embedded_io_adapters::futures_03::FromFutures;
use embedded_io_async::{ErrorType, Read};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use nix::sys::termios::{self, BaudRate, ControlFlags, FlushArg, SetArg};

use crate::ingestion::SerialTransport;

pub struct SerialPort {
    fd: RawFd,
}

impl SerialPort {
    /// Opens `path` as an 8N1 raw tty at `baud_rate` and drops any stale input.
    pub fn open<P: ?Sized + nix::NixPath>(path: &P, baud_rate: BaudRate) -> io::Result<Self> {
        let fd = nix::fcntl::open(
            path,
            OFlag::O_RDWR | OFlag::O_NOCTTY | OFlag::O_NONBLOCK,
            Mode::empty(),
        )
        .map_err(to_io_error)?;

        let mut cfg = termios::tcgetattr(fd).map_err(to_io_error)?;
        termios::cfmakeraw(&mut cfg);
        cfg.control_flags &= !(ControlFlags::PARENB | ControlFlags::CSTOPB | ControlFlags::CSIZE);
        cfg.control_flags |= ControlFlags::CS8 | ControlFlags::CREAD | ControlFlags::CLOCAL;
        termios::cfsetspeed(&mut cfg, baud_rate).map_err(to_io_error)?;
        termios::tcsetattr(fd, SetArg::TCSANOW, &cfg).map_err(to_io_error)?;
        termios::tcflush(fd, FlushArg::TCIOFLUSH).map_err(to_io_error)?;

        Ok(Self { fd })
    }

    /// Discards data received by the tty but not yet read.
    pub fn flush_input(&self) -> io::Result<()> {
        termios::tcflush(self.fd, FlushArg::TCIFLUSH).map_err(to_io_error)
    }
}

impl AsRawFd for SerialPort {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl io::Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        nix::unistd::read(self.fd, buf).map_err(to_io_error)
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        let _ = nix::unistd::close(self.fd);
    }
}

fn to_io_error(e: Errno) -> io::Error {
    e.into()
}

pub fn baud_rate(baud: u32) -> io::Result<BaudRate> {
    match baud {
        9_600 => Ok(BaudRate::B9600),
        19_200 => Ok(BaudRate::B19200),
        38_400 => Ok(BaudRate::B38400),
        57_600 => Ok(BaudRate::B57600),
        115_200 => Ok(BaudRate::B115200),
        230_400 => Ok(BaudRate::B230400),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "unsupported baud rate",
        )),
    }
}

/// Command transport backed by a host tty.
pub struct StdSerial {
    port: FromFutures<Async<SerialPort>>,
}

impl StdSerial {
    pub fn open(path: &str, baud: u32) -> io::Result<Self> {
        let port = SerialPort::open(path, baud_rate(baud)?)?;
        Ok(Self {
            port: FromFutures::new(Async::new(port)?),
        })
    }
}

impl ErrorType for StdSerial {
    type Error = io::Error;
}

impl Read for StdSerial {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.port.read(buf).await
    }
}

impl SerialTransport for StdSerial {
    fn discard_pending(&mut self) -> Result<(), Self::Error> {
        self.port.inner().get_ref().flush_input()
    }
}
