//! network interface scan (linux)
//! reads /sys/class/net for names and hardware addresses,
//! ipv4 binding comes from `ip addr show` output

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::common::error::{TerminalClientError, ClientErrorCode};

pub const ZERO_MAC: &str = "00:00:00:00:00:00";

/// one entry per interface, only the fields identity resolution needs
#[derive(Debug, Clone)]
pub struct NetInterfaceDto {
    pub name: String,
    // loopback or other non-routable interface
    pub internal: bool,
    pub ipv4: Option<String>,
    pub mac: Option<String>,
}

impl NetInterfaceDto {
    /// usable as an identity source: routable, ipv4 bound, real hardware address
    pub fn has_usable_mac(&self) -> bool {
        !self.internal
            && self.ipv4.is_some()
            && self.mac.as_deref().map(|m| m != ZERO_MAC && !m.is_empty()).unwrap_or(false)
    }
}

/// collaborator seam so the resolver can be tested against fixed interface lists
pub trait InterfaceProvider {
    fn list(&self) -> Result<Vec<NetInterfaceDto>, TerminalClientError>;
}

pub struct SysfsInterfaceProvider;

impl InterfaceProvider for SysfsInterfaceProvider {
    fn list(&self) -> Result<Vec<NetInterfaceDto>, TerminalClientError> {
        let entries = fs::read_dir("/sys/class/net").map_err(|e| TerminalClientError {
            code: ClientErrorCode::NetScanError,
            msg: format!("cannot read /sys/class/net: {}", e),
        })?;

        let mut interfaces = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            interfaces.push(probe_interface(&name, entry.path()));
        }
        Ok(interfaces)
    }
}

fn probe_interface(name: &str, sysfs_path: PathBuf) -> NetInterfaceDto {
    let mac = read_sysfs_string(&sysfs_path.join("address"));
    NetInterfaceDto {
        name: name.to_string(),
        internal: name == "lo",
        ipv4: first_ipv4_address(name),
        mac,
    }
}

fn read_sysfs_string(path: &PathBuf) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// first ipv4 address bound to the interface, None when unbound
fn first_ipv4_address(name: &str) -> Option<String> {
    let output = Command::new("ip")
        .args(["addr", "show", name])
        .output()
        .ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        let line = line.trim();
        if line.starts_with("inet ") {
            if let Some(addr) = line.split_whitespace().nth(1) {
                // strip the prefix length
                return Some(addr.split('/').next().unwrap_or(addr).to_string());
            }
        }
    }
    None
}
