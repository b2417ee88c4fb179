//! One-shot hardware peripheral initialization.
//!
//! Configures the two monitored inputs (any-edge interrupts) and the
//! relay/indicator outputs using raw ESP-IDF sys calls.  Called once
//! from `main()` before the tick timer starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::debounce::InputId;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

#[cfg(any(target_os = "espidf", test))]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrHandlerFailed(i32),
    TimerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
            Self::TimerFailed(rc) => write!(f, "tick timer setup failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the tick timer starts.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

/// Both inputs are contacts to GND; the pull-up holds them high
/// while open.
#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: (1u64 << pins::SWIN_GPIO) | (1u64 << pins::SENSE_GPIO),
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: GPIO inputs configured (switch={}, sense={})", pins::SWIN_GPIO, pins::SENSE_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Open contact on the simulated board: the pull-up reads high.
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for pin in [pins::RELAY_GPIO, pins::LED_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (relay={}, led={})", pins::RELAY_GPIO, pins::LED_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_gpio_outputs().
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── embedded-hal pin wrappers ─────────────────────────────────

/// Output pin by GPIO number, written through [`gpio_write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioOut(pub i32);

impl ErrorType for GpioOut {
    type Error = Infallible;
}

impl OutputPin for GpioOut {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.0, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.0, true);
        Ok(())
    }
}

/// Input pin by GPIO number, sampled through [`gpio_read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioIn(pub i32);

impl ErrorType for GpioIn {
    type Error = Infallible;
}

impl InputPin for GpioIn {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio_read(self.0))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!gpio_read(self.0))
    }
}

// ── GPIO ISR Service ──────────────────────────────────────────

/// Shared handler for both inputs; `arg` carries the GPIO number.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn input_edge_isr(arg: *mut core::ffi::c_void) {
    crate::events::latch_edge(arg as usize as i32);
}

/// Install per-pin GPIO ISR service and register the edge handlers.
/// Call after init_peripherals() and before the tick timer starts.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The handler only touches the
    // lock-free edge latch.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for pin in InputId::ALL.map(InputId::gpio) {
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_ANYEDGE);
            let ret = gpio_isr_handler_add(pin, Some(input_edge_isr), pin as usize as *mut _);
            if ret != ESP_OK {
                return Err(HwInitError::IsrHandlerFailed(ret));
            }
            gpio_intr_enable(pin);
        }

        info!("hw_init: ISR service installed (switch, sense)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
