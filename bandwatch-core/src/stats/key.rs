use crate::config::ConfigError;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Identifies one aggregate row: a virtual server and a client network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatKey {
    pub server: String,
    pub prefix: IpNet,
}

impl StatKey {
    pub fn new(server: impl Into<String>, prefix: IpNet) -> Self {
        Self {
            server: server.into(),
            prefix,
        }
    }

    pub fn with_prefix(&self, prefix: IpNet) -> Self {
        Self {
            server: self.server.clone(),
            prefix,
        }
    }
}

impl Display for StatKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.server.is_empty() {
            write!(f, "{}", self.prefix)
        } else {
            write!(f, "{}@{}", self.prefix, self.server)
        }
    }
}

/// Mask lengths applied to client addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixLengths {
    v4: u8,
    v6: u8,
}

impl PrefixLengths {
    pub fn new(v4: u8, v6: u8) -> Result<Self, ConfigError> {
        if v4 > 32 {
            return Err(ConfigError::PrefixV4(v4));
        }
        if v6 > 128 {
            return Err(ConfigError::PrefixV6(v6));
        }
        Ok(Self { v4, v6 })
    }

    pub fn v4(&self) -> u8 {
        self.v4
    }

    pub fn v6(&self) -> u8 {
        self.v6
    }

    /// The network containing `addr` at the configured length.
    ///
    /// IPv4-mapped IPv6 addresses are treated as IPv4.
    pub fn mask(&self, addr: IpAddr) -> IpNet {
        match addr.to_canonical() {
            IpAddr::V4(v4) => IpNet::V4(
                Ipv4Net::new(v4, self.v4)
                    .expect("prefix length validated at construction")
                    .trunc(),
            ),
            IpAddr::V6(v6) => IpNet::V6(
                Ipv6Net::new(v6, self.v6)
                    .expect("prefix length validated at construction")
                    .trunc(),
            ),
        }
    }
}

/// The other half of `net`'s parent network.
///
/// Returns `None` for `/0`, which has no parent.
pub fn sibling(net: IpNet) -> Option<IpNet> {
    let len = net.prefix_len();
    if len == 0 {
        return None;
    }

    match net {
        IpNet::V4(v4) => {
            let flipped = u32::from(v4.network()) ^ (1u32 << (32 - len));
            Ipv4Net::new(Ipv4Addr::from(flipped), len).ok().map(IpNet::V4)
        }
        IpNet::V6(v6) => {
            let flipped = u128::from(v6.network()) ^ (1u128 << (128 - len));
            Ipv6Net::new(Ipv6Addr::from(flipped), len).ok().map(IpNet::V6)
        }
    }
}

/// The network one bit shorter than `net` that contains it.
pub fn parent(net: IpNet) -> Option<IpNet> {
    net.supernet().map(|p| p.trunc())
}
