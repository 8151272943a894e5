use nix::time::{ClockId, clock_gettime};
use std::io;
use std::os::unix::net::UnixDatagram;


const NOTIFY_SOCKET_ENV: &str = "NOTIFY_SOCKET";

pub fn notify_ready() -> io::Result<()> {
    notify("READY=1")
}

/// Announces a reload, stamped with the monotonic clock in microseconds.
pub fn notify_reloading() -> io::Result<()> {
    let now = clock_gettime(ClockId::CLOCK_MONOTONIC)?;
    let micros = now.tv_sec() as u64 * 1_000_000 + now.tv_nsec() as u64 / 1_000;
    notify(&format!("RELOADING=1\nRELOAD_TIMESTAMP={micros}"))
}

/// Sends `message` to the service manager. Does nothing when
/// `NOTIFY_SOCKET` is unset.
pub fn notify(message: &str) -> io::Result<()> {
    match std::env::var_os(NOTIFY_SOCKET_ENV) {
        Some(socket) => send_to(&socket.to_string_lossy(), message),
        None => Ok(()),
    }
}

/// `socket` is either a filesystem path or `@name` for the abstract namespace.
pub(crate) fn send_to(socket: &str, message: &str) -> io::Result<()> {
    if message.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "notify message is empty",
        ));
    }

    let sock = UnixDatagram::unbound()?;
    match socket.strip_prefix('@') {
        Some(name) => send_abstract(&sock, name, message)?,
        None if socket.starts_with('/') => {
            sock.send_to(message.as_bytes(), socket)?;
        }
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported notify socket '{socket}'"),
            ));
        }
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn send_abstract(sock: &UnixDatagram, name: &str, message: &str) -> io::Result<()> {
    use std::os::linux::net::SocketAddrExt;
    use std::os::unix::net::SocketAddr;

    let addr = SocketAddr::from_abstract_name(name.as_bytes())?;
    sock.send_to_addr(message.as_bytes(), &addr)?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn send_abstract(_sock: &UnixDatagram, name: &str, _message: &str) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("abstract notify socket '@{name}' needs Linux"),
    ))
}
