//! synchronized display state consumed by the render surface

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::heartbeat_dto::{ActivityDto, AdDto};

/// five display states plus the initial boot state
/// BOOTING exits permanently on the first recognized heartbeat, no path back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DisplayStatusEnum {
    BOOTING,
    AVAILABLE,
    // reserved, not reachable from the current server contract
    UPCOMING,
    OCCUPIED,
    PENDING,
    DISABLED,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfoDto {
    pub name: Option<String>,
    pub room: Option<String>,
}

/// full synchronized state, replaced as a whole on every applied heartbeat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub status: DisplayStatusEnum,
    pub activity: Option<ActivityDto>,
    pub ad: Option<AdDto>,
    pub device: DeviceInfoDto,
    pub last_sync: u64,
}

/// shared cell between the synchronizer (writer) and the render surface (reader)
/// the render side only ever sees complete snapshots
#[derive(Clone)]
pub struct SnapshotCell {
    cache: Arc<Mutex<Option<SyncSnapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        SnapshotCell {
            cache: Arc::new(Mutex::new(None)),
        }
    }

    pub fn commit(&self, snapshot: SyncSnapshot) {
        let mut guard = self.cache.lock().unwrap();
        *guard = Some(snapshot);
    }

    pub fn latest(&self) -> Option<SyncSnapshot> {
        let guard = self.cache.lock().unwrap();
        guard.clone()
    }
}
