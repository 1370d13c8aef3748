mod common;
mod entity;
mod identity;
mod heartbeat_client;
mod sync_controller;
mod util;

use std::error::Error;

use dotenv::dotenv;
use log;

use common::logger::init_logger;
use common::setting::Settings;
use entity::dto::snapshot_dto::SnapshotCell;
use heartbeat_client::client::{HeartbeatClient, HttpTransport};
use identity::id_cache::IdCache;
use identity::net_scan::SysfsInterfaceProvider;
use identity::resolver::IdentityResolver;
use sync_controller::clock::WallClock;
use sync_controller::synchronizer::{
    RestartHandle, RestartReason, StatusSynchronizer, SyncScheduleConfig,
};

/// the process exits and the supervisor (systemd / pm2) relaunches it,
/// that is the full-client-restart the server contract expects
struct SupervisorRestartHandle;

impl RestartHandle for SupervisorRestartHandle {
    fn request_restart(&self, reason: RestartReason) {
        log::warn!("full restart requested ({:?}), exiting for supervisor relaunch", reason);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // load .env first, settings read the environment
    dotenv().ok();

    let settings = Settings::get();

    init_logger()?;
    log::info!("settings loaded, env: {}, api base: {}", settings.env.env, settings.base_url());

    // identity resolution runs once, the result holds for the whole session
    let resolver = IdentityResolver::new(
        settings.device.terminal_id.clone(),
        SysfsInterfaceProvider,
        IdCache::new(settings.device.id_cache_file.as_str()),
    );
    let identity = resolver.resolve();
    log::info!("terminal identity: {}", identity);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        // render surface reads this cell and the clock, never writes
        let snapshot = SnapshotCell::new();
        let clock = WallClock::new();
        let clock_task = clock.start();

        let client = HeartbeatClient::new(HttpTransport, settings.device.ip.clone());
        let synchronizer = StatusSynchronizer::new(
            client,
            identity,
            SyncScheduleConfig::from_settings(settings),
            snapshot.clone(),
            Box::new(SupervisorRestartHandle),
        );

        // dropping the loop future on ctrl-c cancels any pending timer
        tokio::select! {
            _ = synchronizer.run() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("interrupt received, shutting down");
            }
        }
        clock_task.abort();
    });

    Ok(())
}
