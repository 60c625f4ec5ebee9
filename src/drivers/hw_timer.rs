//! Periodic sampling timers on ESP-IDF's esp_timer API.
//!
//! Each [`HwTimer`] owns one esp_timer whose callback runs a sampling
//! pipeline.  Callbacks execute in the esp_timer task context (not ISR),
//! one at a time, so a pipeline may block briefly on its ADC conversion.
//!
//! esp_timer counts in microseconds; the reload is kept in milliseconds
//! and scaled on start.  `esp_timer_start_periodic` always starts from a
//! zero count, which is what [`PeriodicTimer::reset_count`] asks for.
//!
//! Timers live for the whole process; nothing deletes them.

use crate::app::ports::PeriodicTimer;
use crate::error::Result;

#[cfg(target_os = "espidf")]
use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct HwTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    name: &'static core::ffi::CStr,
    reload_ms: u32,
    running: bool,
}

// SAFETY: the handle is only used through esp_timer_* calls, which are
// thread-safe; the control loop is the single owner.
#[cfg(target_os = "espidf")]
unsafe impl Send for HwTimer {}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn fire_trampoline<F: FnMut()>(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the leaked Box<F> from `HwTimer::new`; the esp_timer
    // task dispatches callbacks serially, so this is the only live borrow.
    let on_fire = unsafe { &mut *arg.cast::<F>() };
    on_fire();
}

impl HwTimer {
    /// Create a stopped timer that calls `on_fire` on every expiry.
    #[cfg(target_os = "espidf")]
    pub fn new<F>(name: &'static core::ffi::CStr, on_fire: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let arg = Box::into_raw(Box::new(on_fire));
        let args = esp_timer_create_args_t {
            callback: Some(fire_trampoline::<F>),
            arg: arg.cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: name.as_ptr(),
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: args outlives the call; the callback argument is leaked
        // for the life of the timer.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK {
            // SAFETY: creation failed, so nothing else holds `arg`.
            drop(unsafe { Box::from_raw(arg) });
            return Err(HwInitError::TimerCreateFailed(ret).into());
        }
        Ok(Self {
            handle,
            name,
            reload_ms: 0,
            running: false,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new<F>(name: &'static core::ffi::CStr, _on_fire: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        log::info!("hw_timer(sim): {:?} created without a clock", name);
        Ok(Self {
            name,
            reload_ms: 0,
            running: false,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl PeriodicTimer for HwTimer {
    fn reload(&self) -> u32 {
        self.reload_ms
    }

    fn stop(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if self.running {
                // SAFETY: handle is valid for the life of self.
                let ret = unsafe { esp_timer_stop(self.handle) };
                if ret != ESP_OK {
                    log::warn!("hw_timer: {:?} stop failed (rc={})", self.name, ret);
                }
            }
        }
        self.running = false;
    }

    fn set_reload(&mut self, reload: u32) {
        self.reload_ms = reload.max(1);
    }

    fn reset_count(&mut self) {}

    fn start(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            let period_us = u64::from(self.reload_ms) * 1_000;
            // SAFETY: handle is valid and the timer is stopped.
            let ret = unsafe { esp_timer_start_periodic(self.handle, period_us) };
            if ret != ESP_OK {
                log::error!("hw_timer: {:?} start failed (rc={})", self.name, ret);
                return;
            }
        }
        log::debug!("hw_timer: {:?} every {} ms", self.name, self.reload_ms);
        self.running = true;
    }
}
