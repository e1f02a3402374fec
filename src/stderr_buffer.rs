use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start holding back warnings while `results` or `global` prints its report, so a
/// malformed saved grid is reported after the table instead of in the middle of it.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Stop buffering and return the storage warnings collected since `activate`.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// Report a warning, typically a saved grid or coefficient override that could not be
/// read and was replaced by defaults. Held while a report is printing, printed to stderr
/// otherwise.
pub fn warn(msg: String) {
    let mut guard = lock();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// `eprintln!`-style warning routed through the buffer. Used by `storage::load_json`.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_until_drained() {
        activate();
        warn("first".to_string());
        crate::buffered_eprintln!("second {}", 2);

        let messages = drain();
        assert!(messages.contains(&"first".to_string()));
        assert!(messages.contains(&"second 2".to_string()));
    }
}
