//! Line editing for the system hosts file
//!
//! Used by the privileged `airlocal hosts` helper. Comments, blank lines and
//! entries for other addresses are kept byte for byte.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

use crate::error::Result;

/// Location of the hosts file on this platform
pub fn system_hosts_path() -> Utf8PathBuf {
    if cfg!(windows) {
        Utf8PathBuf::from(r"C:\Windows\System32\drivers\etc\hosts")
    } else {
        Utf8PathBuf::from("/etc/hosts")
    }
}

/// Parsed hosts file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsFile {
    lines: Vec<String>,
}

/// Address and hostnames of an entry line, None for comments and blanks
fn parse_entry(line: &str) -> Option<(&str, Vec<&str>)> {
    let content = line.split('#').next().unwrap_or_default();
    let mut fields = content.split_whitespace();
    let ip = fields.next()?;
    let hosts: Vec<&str> = fields.collect();
    (!hosts.is_empty()).then_some((ip, hosts))
}

impl HostsFile {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
        }
    }

    pub fn load(path: &Utf8Path) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        fs::write(path, self.render())?;
        debug!("Wrote {} lines to {}", self.lines.len(), path);
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// True if `host` already resolves to `ip`
    pub fn contains(&self, ip: &str, host: &str) -> bool {
        self.lines.iter().any(|line| {
            parse_entry(line)
                .map(|(addr, hosts)| addr == ip && hosts.contains(&host))
                .unwrap_or(false)
        })
    }

    /// Append an `<ip> <host>` line for every host not already mapped
    ///
    /// Returns the hosts that were added.
    pub fn add(&mut self, ip: &str, hosts: &[String]) -> Vec<String> {
        let mut added = Vec::new();
        for host in hosts {
            if host.trim().is_empty() || self.contains(ip, host) {
                continue;
            }
            self.lines.push(format!("{} {}", ip, host));
            added.push(host.clone());
        }
        added
    }

    /// Drop `hosts` from every line for `ip`, deleting lines left empty
    ///
    /// Returns the number of host tokens removed.
    pub fn remove(&mut self, ip: &str, hosts: &[String]) -> usize {
        let mut removed = 0;
        let mut kept = Vec::with_capacity(self.lines.len());

        for line in self.lines.drain(..) {
            let Some((addr, names)) = parse_entry(&line) else {
                kept.push(line);
                continue;
            };
            if addr != ip || !names.iter().any(|n| hosts.iter().any(|h| h == n)) {
                kept.push(line);
                continue;
            }

            let remaining: Vec<&str> = names
                .iter()
                .copied()
                .filter(|n| !hosts.iter().any(|h| h == n))
                .collect();
            removed += names.len() - remaining.len();

            if !remaining.is_empty() {
                kept.push(format!("{} {}", addr, remaining.join(" ")));
            }
        }

        self.lines = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# local\n127.0.0.1 localhost\n::1 localhost\n\n192.168.1.5 nas.lan\n";

    fn hosts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_add_appends_loopback_lines() {
        let mut file = HostsFile::parse(SAMPLE);
        let added = file.add("127.0.0.1", &hosts(&["docker.test", "a.test"]));
        assert_eq!(added, hosts(&["docker.test", "a.test"]));
        assert!(file.render().ends_with("127.0.0.1 docker.test\n127.0.0.1 a.test\n"));
        assert!(file.render().starts_with("# local\n127.0.0.1 localhost\n"));
    }

    #[test]
    fn test_add_skips_existing_mapping() {
        let mut file = HostsFile::parse("127.0.0.1 localhost docker.test\n");
        assert!(file.add("127.0.0.1", &hosts(&["docker.test"])).is_empty());
        assert_eq!(file.render(), "127.0.0.1 localhost docker.test\n");
    }

    #[test]
    fn test_remove_strips_tokens_and_empty_lines() {
        let mut file = HostsFile::parse(
            "127.0.0.1 localhost docker.test\n127.0.0.1 a.test\n10.0.0.1 a.test\n# 127.0.0.1 a.test\n",
        );
        let removed = file.remove("127.0.0.1", &hosts(&["docker.test", "a.test"]));
        assert_eq!(removed, 2);
        assert_eq!(
            file.render(),
            "127.0.0.1 localhost\n10.0.0.1 a.test\n# 127.0.0.1 a.test\n"
        );
    }

    #[test]
    fn test_contains_ignores_comments() {
        let file = HostsFile::parse("#127.0.0.1 docker.test\n127.0.0.1 real.test # trailing\n");
        assert!(!file.contains("127.0.0.1", "docker.test"));
        assert!(file.contains("127.0.0.1", "real.test"));
    }
}
