pub mod heartbeat_dto;
pub mod snapshot_dto;
