pub mod boot_log;
pub mod clock;
pub mod synchronizer;
