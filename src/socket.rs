//! AF_SMC stream sockets.
//!
//! Opens kernel SMC sockets and hands them back as ordinary `std::net`
//! types: the SMC socket family speaks the TCP API, so `TcpStream` and
//! `TcpListener` can wrap the raw fds directly. Address parsing accepts
//! `host:port` with IPv4 and bracketed IPv6 literals, hostnames, IPv6
//! zones, and empty host/port defaulting to `0.0.0.0:0`.

use std::ffi::CString;
use std::io;
use std::mem;
use std::net::{IpAddr, SocketAddr, SocketAddrV6, TcpListener, TcpStream, ToSocketAddrs};
use std::os::unix::io::FromRawFd;

use thiserror::Error;
use tracing::debug;

/// SMC address family; not exposed by libc yet.
pub const AF_SMC: libc::c_int = 43;

/// SMC socket protocol for IPv4 peers.
const SMCPROTO_SMC: libc::c_int = 0;
/// SMC socket protocol for IPv6 peers.
const SMCPROTO_SMC6: libc::c_int = 1;

/// Errors from address parsing and SMC socket setup.
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("invalid address {0:?}: missing ':' between host and port")]
    MissingPort(String),

    #[error("invalid address {0:?}: too many colons (bracket IPv6 hosts)")]
    TooManyColons(String),

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("cannot resolve host {0:?}")]
    Resolve(String),

    #[error("unknown interface {0:?} in IPv6 zone")]
    UnknownZone(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Split an address into host and port parts. Bracketed IPv6 hosts keep
/// their colons; bare hosts may contain at most one.
fn split_host_port(address: &str) -> Result<(&str, &str), SocketError> {
    if let Some(rest) = address.strip_prefix('[') {
        let (host, rest) = rest
            .split_once(']')
            .ok_or_else(|| SocketError::MissingPort(address.to_string()))?;
        let port = rest
            .strip_prefix(':')
            .ok_or_else(|| SocketError::MissingPort(address.to_string()))?;
        return Ok((host, port));
    }

    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| SocketError::MissingPort(address.to_string()))?;
    if host.contains(':') {
        return Err(SocketError::TooManyColons(address.to_string()));
    }
    Ok((host, port))
}

/// Interface name to index for IPv6 zone ids.
fn if_index(name: &str) -> Option<u32> {
    let cname = CString::new(name).ok()?;
    let index = unsafe { libc::if_nametoindex(cname.as_ptr()) };
    if index == 0 {
        None
    } else {
        Some(index)
    }
}

/// Parse a `host:port` address. An empty host defaults to `0.0.0.0`, an
/// empty port to `0`; hostnames resolve to their first address.
pub fn parse_address(address: &str) -> Result<SocketAddr, SocketError> {
    let (host, port) = split_host_port(address)?;
    let host = if host.is_empty() { "0.0.0.0" } else { host };
    let port: u16 = if port.is_empty() {
        0
    } else {
        port.parse()
            .map_err(|_| SocketError::InvalidPort(port.to_string()))?
    };

    // IPv6 zone: numeric scope id or interface name
    if let Some((ip, zone)) = host.split_once('%') {
        let ip = ip
            .parse()
            .map_err(|_| SocketError::Resolve(host.to_string()))?;
        let scope = zone
            .parse::<u32>()
            .ok()
            .or_else(|| if_index(zone))
            .ok_or_else(|| SocketError::UnknownZone(zone.to_string()))?;
        return Ok(SocketAddr::V6(SocketAddrV6::new(ip, port, 0, scope)));
    }

    // literal address first, resolver for everything else
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    (host, port)
        .to_socket_addrs()
        .map_err(|_| SocketError::Resolve(host.to_string()))?
        .next()
        .ok_or_else(|| SocketError::Resolve(host.to_string()))
}

/// Open an AF_SMC stream socket matching the address family of addr.
fn smc_socket(addr: &SocketAddr) -> io::Result<libc::c_int> {
    let proto = match addr {
        SocketAddr::V4(_) => SMCPROTO_SMC,
        SocketAddr::V6(_) => SMCPROTO_SMC6,
    };
    let fd = unsafe { libc::socket(AF_SMC, libc::SOCK_STREAM, proto) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(fd)
}

/// Build the C sockaddr for addr. The sockaddr family stays AF_INET /
/// AF_INET6; only the socket itself is AF_SMC.
fn to_sockaddr(addr: &SocketAddr) -> (libc::sockaddr_storage, libc::socklen_t) {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let len = match addr {
        SocketAddr::V4(v4) => {
            let sin = libc::sockaddr_in {
                sin_family: libc::AF_INET as libc::sa_family_t,
                sin_port: v4.port().to_be(),
                sin_addr: libc::in_addr {
                    s_addr: u32::from_ne_bytes(v4.ip().octets()),
                },
                sin_zero: [0; 8],
            };
            unsafe {
                *(&mut storage as *mut libc::sockaddr_storage as *mut libc::sockaddr_in) = sin;
            }
            mem::size_of::<libc::sockaddr_in>()
        }
        SocketAddr::V6(v6) => {
            let sin6 = libc::sockaddr_in6 {
                sin6_family: libc::AF_INET6 as libc::sa_family_t,
                sin6_port: v6.port().to_be(),
                sin6_flowinfo: v6.flowinfo(),
                sin6_addr: libc::in6_addr {
                    s6_addr: v6.ip().octets(),
                },
                sin6_scope_id: v6.scope_id(),
            };
            unsafe {
                *(&mut storage as *mut libc::sockaddr_storage as *mut libc::sockaddr_in6) = sin6;
            }
            mem::size_of::<libc::sockaddr_in6>()
        }
    };
    (storage, len as libc::socklen_t)
}

/// Create a SMC connection to address.
pub fn dial(address: &str) -> Result<TcpStream, SocketError> {
    let addr = parse_address(address)?;
    let fd = smc_socket(&addr)?;
    let (storage, len) = to_sockaddr(&addr);

    let rc = unsafe {
        libc::connect(
            fd,
            &storage as *const libc::sockaddr_storage as *const libc::sockaddr,
            len,
        )
    };
    if rc != 0 {
        let err = io::Error::last_os_error();
        unsafe { libc::close(fd) };
        return Err(err.into());
    }

    debug!(%addr, "connected SMC socket");
    Ok(unsafe { TcpStream::from_raw_fd(fd) })
}

/// Create a SMC listener bound to address.
pub fn listen(address: &str) -> Result<TcpListener, SocketError> {
    let addr = parse_address(address)?;
    let fd = smc_socket(&addr)?;
    let (storage, len) = to_sockaddr(&addr);

    let rc = unsafe {
        libc::bind(
            fd,
            &storage as *const libc::sockaddr_storage as *const libc::sockaddr,
            len,
        )
    };
    if rc != 0 {
        let err = io::Error::last_os_error();
        unsafe { libc::close(fd) };
        return Err(err.into());
    }

    let rc = unsafe { libc::listen(fd, 1) };
    if rc != 0 {
        let err = io::Error::last_os_error();
        unsafe { libc::close(fd) };
        return Err(err.into());
    }

    debug!(%addr, "listening on SMC socket");
    Ok(unsafe { TcpListener::from_raw_fd(fd) })
}
