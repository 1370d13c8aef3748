//! terminal identity resolution
//! priority chain: configured id -> wired interface mac -> cached token -> minted token
//! resolve always returns an identity, startup never blocks on this step

use rand::Rng;

use crate::common::error::TerminalClientError;
use crate::{info, warn, error};
use super::id_cache::IdCache;
use super::net_scan::{InterfaceProvider, NetInterfaceDto};

const LOG_TAG: &str = "identity_resolver";

pub const TOKEN_PREFIX: &str = "TERM-";
pub const TOKEN_SUFFIX_LEN: usize = 6;
// emitted when even the local cache is unreadable
pub const FALLBACK_SENTINEL: &str = "TERM-ERR";

const TOKEN_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const WIRED_NAME_HINTS: [&str; 3] = ["eth", "en", "ethernet"];

pub struct IdentityResolver<P: InterfaceProvider> {
    static_id: Option<String>,
    provider: P,
    cache: IdCache,
}

impl<P: InterfaceProvider> IdentityResolver<P> {
    pub fn new(static_id: Option<String>, provider: P, cache: IdCache) -> Self {
        IdentityResolver {
            static_id,
            provider,
            cache,
        }
    }

    /// run the chain once, the result is the identity for the whole session
    pub fn resolve(&self) -> String {
        // 1 preconfigured id is ground truth, nothing else is consulted
        if let Some(id) = &self.static_id {
            info!(LOG_TAG, "using configured terminal id: {}", id);
            return id.clone();
        }

        // 2 hardware address of the primary interface
        match self.scan_hardware_id() {
            Ok(Some(mac)) => {
                info!(LOG_TAG, "using detected hardware address: {}", mac);
                return mac;
            }
            Ok(None) => {
                warn!(LOG_TAG, "no usable network interface, falling back to local token");
            }
            Err(e) => {
                warn!(LOG_TAG, "interface scan failed, falling back to local token: {}", e);
            }
        }

        // 3 cached or freshly minted token, this step cannot fail
        self.fallback_identity()
    }

    fn scan_hardware_id(&self) -> Result<Option<String>, TerminalClientError> {
        let mut interfaces = self.provider.list()?;
        interfaces.retain(NetInterfaceDto::has_usable_mac);
        // wired adapters first, stable sort keeps the system order otherwise
        interfaces.sort_by_key(|item| !has_wired_name(&item.name));
        Ok(interfaces
            .first()
            .and_then(|item| item.mac.clone())
            .map(|mac| mac.to_uppercase()))
    }

    fn fallback_identity(&self) -> String {
        match self.cache.load() {
            Ok(Some(token)) => {
                info!(LOG_TAG, "using cached terminal token: {}", token);
                token
            }
            Ok(None) => {
                let token = mint_token();
                info!(LOG_TAG, "minted new terminal token: {}", token);
                // a failed write only costs persistence across restarts
                if let Err(e) = self.cache.store(&token) {
                    warn!(LOG_TAG, "cannot persist terminal token: {}", e);
                }
                token
            }
            Err(e) => {
                error!(LOG_TAG, "identity cache unreadable, using sentinel id: {}", e);
                FALLBACK_SENTINEL.to_string()
            }
        }
    }
}

fn has_wired_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    WIRED_NAME_HINTS.iter().any(|hint| lower.contains(hint))
}

/// TERM- plus 6 random uppercase base36 chars
pub fn mint_token() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TOKEN_SUFFIX_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect();
    format!("{}{}", TOKEN_PREFIX, suffix)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::error::ClientErrorCode;
    use std::cell::Cell;

    struct FixedProvider {
        interfaces: Vec<NetInterfaceDto>,
        calls: Cell<u32>,
    }

    impl FixedProvider {
        fn new(interfaces: Vec<NetInterfaceDto>) -> Self {
            FixedProvider {
                interfaces,
                calls: Cell::new(0),
            }
        }
    }

    impl InterfaceProvider for FixedProvider {
        fn list(&self) -> Result<Vec<NetInterfaceDto>, TerminalClientError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.interfaces.clone())
        }
    }

    struct FailingProvider;

    impl InterfaceProvider for FailingProvider {
        fn list(&self) -> Result<Vec<NetInterfaceDto>, TerminalClientError> {
            Err(TerminalClientError {
                code: ClientErrorCode::NetScanError,
                msg: String::from("scan failed"),
            })
        }
    }

    fn iface(name: &str, ipv4: Option<&str>, mac: Option<&str>) -> NetInterfaceDto {
        NetInterfaceDto {
            name: name.to_string(),
            internal: false,
            ipv4: ipv4.map(|s| s.to_string()),
            mac: mac.map(|s| s.to_string()),
        }
    }

    fn temp_cache(dir: &tempfile::TempDir) -> IdCache {
        IdCache::new(dir.path().join("terminal_id").to_str().unwrap())
    }

    #[test]
    fn test_configured_id_skips_collaborators() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FixedProvider::new(vec![iface("eth0", Some("10.0.0.2"), Some("aa:bb:cc:00:11:22"))]);
        let resolver = IdentityResolver::new(
            Some(String::from("KIOSK-42")),
            provider,
            temp_cache(&dir),
        );
        assert_eq!(resolver.resolve(), "KIOSK-42");
        assert_eq!(resolver.provider.calls.get(), 0);
        // cache untouched, nothing minted
        assert!(resolver.cache.load().unwrap().is_none());
    }

    #[test]
    fn test_wired_interface_wins_over_wireless() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FixedProvider::new(vec![
            iface("wlan0", Some("10.0.0.3"), Some("11:11:11:11:11:11")),
            iface("eth0", Some("10.0.0.2"), Some("aa:bb:cc:00:11:22")),
        ]);
        let resolver = IdentityResolver::new(None, provider, temp_cache(&dir));
        assert_eq!(resolver.resolve(), "AA:BB:CC:00:11:22");
    }

    #[test]
    fn test_stable_order_kept_among_equals() {
        let dir = tempfile::tempdir().unwrap();
        // neither name looks wired, the first enumerated entry wins
        let provider = FixedProvider::new(vec![
            iface("wlp3s0", Some("10.0.0.3"), Some("11:11:11:11:11:11")),
            iface("wlan1", Some("10.0.0.4"), Some("22:22:22:22:22:22")),
        ]);
        let resolver = IdentityResolver::new(None, provider, temp_cache(&dir));
        assert_eq!(resolver.resolve(), "11:11:11:11:11:11");
    }

    #[test]
    fn test_unusable_interfaces_fall_through_to_minted_token() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FixedProvider::new(vec![
            iface("tun0", Some("10.8.0.2"), Some(crate::identity::net_scan::ZERO_MAC)),
            iface("eth9", None, Some("aa:aa:aa:aa:aa:aa")),
        ]);
        let resolver = IdentityResolver::new(None, provider, temp_cache(&dir));
        let id = resolver.resolve();
        assert!(id.starts_with(TOKEN_PREFIX));
        assert_eq!(id.len(), TOKEN_PREFIX.len() + TOKEN_SUFFIX_LEN);
        // minted token persisted for the next run
        assert_eq!(resolver.cache.load().unwrap().as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_scan_failure_uses_cached_token() {
        let dir = tempfile::tempdir().unwrap();
        let cache = temp_cache(&dir);
        cache.store("TERM-CACHED").unwrap();
        let resolver = IdentityResolver::new(None, FailingProvider, cache);
        assert_eq!(resolver.resolve(), "TERM-CACHED");
    }

    #[test]
    fn test_second_resolution_reuses_minted_token() {
        let dir = tempfile::tempdir().unwrap();
        let first = IdentityResolver::new(None, FailingProvider, temp_cache(&dir)).resolve();
        let second = IdentityResolver::new(None, FailingProvider, temp_cache(&dir)).resolve();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mint_token_format() {
        for _ in 0..50 {
            let token = mint_token();
            assert!(token.starts_with(TOKEN_PREFIX));
            let suffix = &token[TOKEN_PREFIX.len()..];
            assert_eq!(suffix.len(), TOKEN_SUFFIX_LEN);
            assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }
}
