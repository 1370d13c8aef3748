//! visible wall clock
//! one second tick on its own timer, fully decoupled from the heartbeat loop

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::util::time;

/// shared clock value for the render surface
#[derive(Clone)]
pub struct WallClock {
    now_secs: Arc<Mutex<u64>>,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock {
            now_secs: Arc::new(Mutex::new(time::now_secs())),
        }
    }

    /// spawn the tick task, abort the handle on teardown
    pub fn start(&self) -> JoinHandle<()> {
        let now_secs = self.now_secs.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let mut guard = now_secs.lock().unwrap();
                *guard = time::now_secs();
            }
        })
    }

    pub fn current_secs(&self) -> u64 {
        *self.now_secs.lock().unwrap()
    }

    /// HH:MM for the header clock
    pub fn current_hhmm(&self) -> String {
        time::format_hhmm(self.current_secs())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clock_starts_at_now() {
        let clock = WallClock::new();
        assert!(clock.current_secs() > 0);
        assert_eq!(clock.current_hhmm().len(), 5);
    }

    #[test]
    fn test_tick_advances_value() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let clock = WallClock::new();
            let handle = clock.start();
            let before = clock.current_secs();
            tokio::time::sleep(Duration::from_millis(1100)).await;
            assert!(clock.current_secs() >= before);
            handle.abort();
        });
    }
}
