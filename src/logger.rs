//! Colored, timestamped log macros. Every line goes to stderr so that stdout
//! only carries the JSON view snapshots.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        eprintln!("\x1b[32m[INFO] [{}]\x1b[0m {}", chrono::Local::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        eprintln!("\x1b[33m[LOG]  [{}]\x1b[0m {}", chrono::Local::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!("\x1b[35m[WARN] [{}]\x1b[0m {}", chrono::Local::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!("\x1b[31m[ERROR][{}]\x1b[0m {}", chrono::Local::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        panic!("\x1b[1;31m[FATAL][{}]\x1b[0m {}", chrono::Local::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

/// Schedule related messages (next prayer changes, refresh triggers).
#[macro_export]
macro_rules! prayer {
    ($($arg:tt)*) => {
        eprintln!("\x1b[1;34m[SALAT][{}]\x1b[0m {}", chrono::Local::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

/// High frequency messages (every sensor sample, every tick). Only printed if
/// `LOG_MIQAT_EVENTS` is set.
#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if std::env::var("LOG_MIQAT_EVENTS").is_ok() {
            eprintln!("\x1b[36m[EVENT][{}]\x1b[0m {}", chrono::Local::now().format("%H:%M:%S"), format!($($arg)*))
        }
    };
}
