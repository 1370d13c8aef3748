//! status synchronizer
//! owns the display state machine, the committed snapshot and the heartbeat
//! cadence, one strictly sequential loop: fetch -> classify -> transition ->
//! schedule next

use std::time::Duration;

use crate::common::setting::Settings;
use crate::entity::dto::heartbeat_dto::{
    HeartbeatResponseDto, COMMAND_REFRESH, RAW_STATUS_ACTIVE, RAW_STATUS_DISABLED, RAW_STATUS_PENDING,
};
use crate::entity::dto::snapshot_dto::{DeviceInfoDto, DisplayStatusEnum, SnapshotCell, SyncSnapshot};
use crate::heartbeat_client::client::{HeartbeatClient, HeartbeatTransport};
use crate::sync_controller::boot_log::{BootLogBuffer, LogSeverityEnum, MilestoneEnum};
use crate::util::time;
use crate::{error, info, warn};

const LOG_TAG: &str = "status_synchronizer";

// failed cycles retry on this fixed cadence, configured interval does not apply
pub const RETRY_INTERVAL: Duration = Duration::from_secs(10);
// grace before the reload triggered by a raw status change
pub const RELOAD_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestartReason {
    // server sent command REFRESH
    RemoteCommand,
    // raw status flipped between successful cycles
    StatusChanged,
}

/// full-restart port, the binary exits for its supervisor, tests capture calls
pub trait RestartHandle: Send + Sync {
    fn request_restart(&self, reason: RestartReason);
}

/// cadence snapshot taken at startup, immutable for the loop lifetime
#[derive(Debug, Clone, Copy)]
pub struct SyncScheduleConfig {
    pub poll_interval: Duration,
    pub retry_interval: Duration,
    pub reload_delay: Duration,
}

impl SyncScheduleConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        SyncScheduleConfig {
            poll_interval: Duration::from_millis(settings.api.poll_interval_ms),
            retry_interval: RETRY_INTERVAL,
            reload_delay: RELOAD_DELAY,
        }
    }
}

/// what a decoded response asks the loop to do
#[derive(Debug, Clone, Copy, PartialEq)]
enum CycleAction {
    Applied,
    // unrecognized raw status, state and snapshot retained
    Ignored,
    RestartNow(RestartReason),
    RestartAfterDelay(RestartReason),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    Synced,
    Failed,
    RestartRequested,
}

pub struct StatusSynchronizer<T: HeartbeatTransport> {
    client: HeartbeatClient<T>,
    identity: String,
    config: SyncScheduleConfig,
    state: DisplayStatusEnum,
    // raw server value of the previous successful cycle, change detection input
    last_raw_status: Option<String>,
    snapshot: SnapshotCell,
    boot_log: BootLogBuffer,
    restart: Box<dyn RestartHandle>,
}

impl<T: HeartbeatTransport> StatusSynchronizer<T> {
    pub fn new(
        client: HeartbeatClient<T>,
        identity: String,
        config: SyncScheduleConfig,
        snapshot: SnapshotCell,
        restart: Box<dyn RestartHandle>,
    ) -> Self {
        StatusSynchronizer {
            client,
            identity,
            config,
            state: DisplayStatusEnum::BOOTING,
            last_raw_status: None,
            snapshot,
            boot_log: BootLogBuffer::new(),
            restart,
        }
    }

    pub fn state(&self) -> DisplayStatusEnum {
        self.state
    }

    pub fn boot_log(&self) -> &BootLogBuffer {
        &self.boot_log
    }

    fn is_booting(&self) -> bool {
        self.state == DisplayStatusEnum::BOOTING
    }

    /// perpetual loop, returns only after a restart request
    pub async fn run(mut self) {
        self.boot_log
            .append_once(MilestoneEnum::SystemStart, "System starting...", LogSeverityEnum::Info);
        let id_line = format!("Device ID: {}", self.identity);
        self.boot_log
            .append_once(MilestoneEnum::IdentityDetected, &id_line, LogSeverityEnum::Info);

        loop {
            let outcome = self.run_cycle().await;
            match self.next_delay(outcome) {
                Some(delay) => tokio::time::sleep(delay).await,
                None => {
                    info!(LOG_TAG, "restart requested, loop stopped");
                    return;
                }
            }
        }
    }

    /// delay until the next attempt, measured from completion of this one
    fn next_delay(&self, outcome: CycleOutcome) -> Option<Duration> {
        match outcome {
            CycleOutcome::Synced => Some(self.config.poll_interval),
            CycleOutcome::Failed => Some(self.config.retry_interval),
            CycleOutcome::RestartRequested => None,
        }
    }

    /// one heartbeat attempt, never panics, failures only decide the cadence
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        if self.is_booting() {
            self.boot_log
                .append_once(MilestoneEnum::IpDetecting, "Detecting IP address...", LogSeverityEnum::Info);
            self.boot_log
                .append_once(MilestoneEnum::Connecting, "Connecting to server...", LogSeverityEnum::Info);
        }

        match self.client.send_heartbeat(&self.identity).await {
            Ok(exchange) => {
                if self.is_booting() {
                    let ip_line = format!("IP Detected: {}", exchange.ip);
                    self.boot_log
                        .append_once(MilestoneEnum::IpDetected, &ip_line, LogSeverityEnum::Info);
                    self.boot_log
                        .append_once(MilestoneEnum::ResponseReceived, "Response received...", LogSeverityEnum::Info);
                }
                match self.apply_response(exchange.response, time::now_secs()) {
                    CycleAction::Applied => CycleOutcome::Synced,
                    CycleAction::Ignored => CycleOutcome::Synced,
                    CycleAction::RestartNow(reason) => {
                        self.restart.request_restart(reason);
                        CycleOutcome::RestartRequested
                    }
                    CycleAction::RestartAfterDelay(reason) => {
                        tokio::time::sleep(self.config.reload_delay).await;
                        self.restart.request_restart(reason);
                        CycleOutcome::RestartRequested
                    }
                }
            }
            Err(e) => {
                if self.is_booting() {
                    self.boot_log.append(&format!("Error: {}", e.msg), LogSeverityEnum::Error);
                    self.boot_log.append("Retrying in 10s...", LogSeverityEnum::Error);
                }
                error!(LOG_TAG, "heartbeat failed, state frozen until retry: {}", e);
                CycleOutcome::Failed
            }
        }
    }

    /// transition rules for one successful response
    fn apply_response(&mut self, resp: HeartbeatResponseDto, now_secs: u64) -> CycleAction {
        // remote command supersedes everything else in the cycle
        if resp.command.as_deref() == Some(COMMAND_REFRESH) {
            info!(LOG_TAG, "remote command REFRESH received");
            if self.is_booting() {
                self.boot_log
                    .append("Command: REFRESH executing...", LogSeverityEnum::Info);
            }
            return CycleAction::RestartNow(RestartReason::RemoteCommand);
        }

        let raw = resp.device_status.clone();

        // a flip after the first observed value reloads the whole client,
        // the differing cycle applies nothing and the remembered value stays
        if let Some(prev) = &self.last_raw_status {
            if *prev != raw {
                info!(LOG_TAG, "device status changed {} -> {}, reloading", prev, raw);
                return CycleAction::RestartAfterDelay(RestartReason::StatusChanged);
            }
        }
        self.last_raw_status = Some(raw.clone());

        let next_state = match raw.as_str() {
            RAW_STATUS_PENDING => DisplayStatusEnum::PENDING,
            RAW_STATUS_DISABLED => DisplayStatusEnum::DISABLED,
            RAW_STATUS_ACTIVE => {
                if resp.activity.is_some() {
                    DisplayStatusEnum::OCCUPIED
                } else {
                    DisplayStatusEnum::AVAILABLE
                }
            }
            // server contract is not exhaustively enumerated, unknown values
            // keep the previous state and snapshot
            _ => {
                warn!(LOG_TAG, "unrecognized device status: {}", raw);
                return CycleAction::Ignored;
            }
        };

        if self.is_booting() {
            let status_line = match next_state {
                DisplayStatusEnum::PENDING => "Status: Device not registered",
                DisplayStatusEnum::DISABLED => "Status: Device Disabled",
                _ => "Status: Active. Loading interface...",
            };
            self.boot_log
                .append_once(MilestoneEnum::StatusReported, status_line, LogSeverityEnum::Info);
        }

        self.state = next_state;

        // terminal-until-external-change states suppress all content
        let (activity, ad) = match next_state {
            DisplayStatusEnum::PENDING | DisplayStatusEnum::DISABLED => (None, None),
            _ => (resp.activity, resp.ad),
        };
        self.snapshot.commit(SyncSnapshot {
            status: next_state,
            activity,
            ad,
            device: DeviceInfoDto {
                name: resp.device_name,
                room: resp.room_number,
            },
            last_sync: now_secs,
        });
        CycleAction::Applied
    }
}
