pub mod qibla;
pub mod response_common;
pub mod timings;
