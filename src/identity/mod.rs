pub mod net_scan;
pub mod id_cache;
pub mod resolver;
