use std::collections::HashSet;
use std::net::IpAddr;

/// Host addresses refused at accept time. In-memory only; no persistence
/// concern is in scope (the original `live_server.py` keeps the same set
/// as a plain attribute with no backing store).
#[derive(Debug, Default, Clone)]
pub struct BanList {
    hosts: HashSet<IpAddr>,
}

impl BanList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ban(&mut self, host: IpAddr) {
        self.hosts.insert(host);
    }

    pub fn is_banned(&self, host: &IpAddr) -> bool {
        self.hosts.contains(host)
    }

    pub fn unban_host(&mut self, host: &IpAddr) -> bool {
        self.hosts.remove(host)
    }

    /// Returns banned hosts sorted for stable display.
    pub fn get_banned_hosts(&self) -> Vec<IpAddr> {
        let mut hosts: Vec<_> = self.hosts.iter().copied().collect();
        hosts.sort();
        hosts
    }

    pub fn clear_banned_hosts(&mut self) -> usize {
        let count = self.hosts.len();
        self.hosts.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_unban_and_clear() {
        let mut bans = BanList::new();
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();
        bans.ban(a);
        bans.ban(b);

        assert_eq!(bans.get_banned_hosts(), vec![a, b]);
        assert!(bans.unban_host(&b));
        assert_eq!(bans.get_banned_hosts(), vec![a]);
        assert!(!bans.unban_host(&"10.0.0.99".parse().unwrap()));
        assert_eq!(bans.clear_banned_hosts(), 1);
        assert!(bans.get_banned_hosts().is_empty());
    }

    #[test]
    fn banned_host_is_reported() {
        let mut bans = BanList::new();
        let host: IpAddr = "127.0.0.1".parse().unwrap();
        assert!(!bans.is_banned(&host));
        bans.ban(host);
        assert!(bans.is_banned(&host));
    }
}
