pub mod qibla_get;
pub mod request_common;
pub mod timings_get;
