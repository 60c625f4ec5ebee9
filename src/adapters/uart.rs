//! UART command link adapter.
//!
//! - **`target_os = "espidf"`**: the IDF UART driver installed by
//!   `hw_init`.  `uart_write_bytes` holds the driver's TX lock for the
//!   whole call, so one reply line is never split by a writer in another
//!   task.
//! - **`not(target_os = "espidf")`**: stdout/stdin for host simulation.
//!
//! The handle is `Copy`; every context that replies (receive task, timer
//! callbacks, control loop) holds its own.

use crate::app::ports::SerialChannel;

#[derive(Debug, Clone, Copy)]
pub struct UartSerial {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    port: i32,
}

impl UartSerial {
    pub fn new(port: i32) -> Self {
        Self { port }
    }

    /// Wait up to `timeout_ms` for one received byte.
    #[cfg(target_os = "espidf")]
    pub fn read_byte(&self, timeout_ms: u32) -> Option<u8> {
        let mut byte = 0u8;
        let ticks = timeout_ms.div_ceil(1_000 / esp_idf_svc::sys::configTICK_RATE_HZ);
        // SAFETY: one-byte buffer; the driver was installed in hw_init.
        let n = unsafe {
            esp_idf_svc::sys::uart_read_bytes(self.port, (&raw mut byte).cast(), 1, ticks)
        };
        (n == 1).then_some(byte)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_byte(&self, timeout_ms: u32) -> Option<u8> {
        use std::io::Read;
        let mut byte = [0u8; 1];
        match std::io::stdin().read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => {
                std::thread::sleep(std::time::Duration::from_millis(u64::from(timeout_ms)));
                None
            }
        }
    }
}

impl SerialChannel for UartSerial {
    #[cfg(target_os = "espidf")]
    fn write_bytes(&mut self, bytes: &[u8]) {
        // SAFETY: bytes is valid for its length; the driver copies it into
        // the TX ring buffer before returning.
        let n = unsafe {
            esp_idf_svc::sys::uart_write_bytes(self.port, bytes.as_ptr().cast(), bytes.len())
        };
        if n < 0 {
            log::warn!("uart{}: write failed (rc={})", self.port, n);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_bytes(&mut self, bytes: &[u8]) {
        use std::io::Write;
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(bytes).and_then(|()| stdout.flush()) {
            log::warn!("uart(sim): write failed: {}", e);
        }
    }
}
