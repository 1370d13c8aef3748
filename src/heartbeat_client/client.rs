//! heartbeat exchange with the room management server
//! one round trip per cycle, outcome is either a decoded response or one
//! uniform transient failure, the caller decides the retry cadence

use async_trait::async_trait;

use crate::common::error::TerminalClientError;
use crate::common::http;
use crate::entity::dto::heartbeat_dto::{HeartbeatRequestDto, HeartbeatResponseDto, WhoamiDto};
use crate::{debug, warn};

const LOG_TAG: &str = "heartbeat_client";

const HEARTBEAT_URL: &str = "api/device/heartbeat";
const WHOAMI_URL: &str = "api/whoami";

// reported when neither config nor the whoami endpoint yields an address
pub const UNKNOWN_IP: &str = "Unknown";

/// wire seam, tests substitute a scripted transport
#[async_trait]
pub trait HeartbeatTransport: Send + Sync {
    async fn post_heartbeat(&self, req: &HeartbeatRequestDto) -> Result<HeartbeatResponseDto, TerminalClientError>;
    async fn fetch_ip(&self) -> Result<WhoamiDto, TerminalClientError>;
}

/// real transport over the configured base address
pub struct HttpTransport;

#[async_trait]
impl HeartbeatTransport for HttpTransport {
    async fn post_heartbeat(&self, req: &HeartbeatRequestDto) -> Result<HeartbeatResponseDto, TerminalClientError> {
        http::api_post(HEARTBEAT_URL, req).await
    }

    async fn fetch_ip(&self) -> Result<WhoamiDto, TerminalClientError> {
        http::api_get(WHOAMI_URL).await
    }
}

/// decoded response plus the ip that was reported with it
#[derive(Debug, Clone)]
pub struct HeartbeatExchange {
    pub ip: String,
    pub response: HeartbeatResponseDto,
}

pub struct HeartbeatClient<T: HeartbeatTransport> {
    transport: T,
    // configured ip snapshot taken at construction, skips whoami when present
    static_ip: Option<String>,
}

impl<T: HeartbeatTransport> HeartbeatClient<T> {
    pub fn new(transport: T, static_ip: Option<String>) -> Self {
        HeartbeatClient {
            transport,
            static_ip,
        }
    }

    /// single heartbeat round trip for the given identity
    pub async fn send_heartbeat(&self, identity: &str) -> Result<HeartbeatExchange, TerminalClientError> {
        let ip = self.detect_ip().await;
        let req = HeartbeatRequestDto {
            mac_address: identity.to_string(),
            ip_address: ip.clone(),
        };
        debug!(LOG_TAG, "sending heartbeat, id: {} ip: {}", identity, ip);
        let response = self.transport.post_heartbeat(&req).await?;
        Ok(HeartbeatExchange { ip, response })
    }

    /// whoami failure never aborts the heartbeat, the ip degrades to Unknown
    async fn detect_ip(&self) -> String {
        if let Some(ip) = &self.static_ip {
            return ip.clone();
        }
        match self.transport.fetch_ip().await {
            Ok(whoami) => whoami.ip,
            Err(e) => {
                warn!(LOG_TAG, "whoami lookup failed, reporting unknown ip: {}", e);
                UNKNOWN_IP.to_string()
            }
        }
    }
}
