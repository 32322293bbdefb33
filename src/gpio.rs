//! Memory-mapped access to the BCM GPIO peripheral.
//!
//! The GPIO block of the BCM SoCs is a small window of physical address space;
//! its base address depends on the board generation and its registers sit at
//! fixed byte offsets within the window. This module resolves the base address
//! for a [`BoardGeneration`], maps the window read-write through `/dev/mem`,
//! and exposes pin-level reads behind the [`LevelSource`] trait so the sampling
//! loop can also run against mock hardware.
//!
//! # Register Layout
//! ```text
//! [0xB4-byte GPIO window at the per-generation base address]
//!
//!   GPLEV0 (0x34): levels of pins 0-31, one bit per pin, read-only
//!   GPLEV1 (0x38): levels of pins 32+, currently unused
//! ```
//!
//! Only GPLEV0 is read today; pins ≥ 32 would need GPLEV1 and are rejected at
//! validation. A transient misread of the level register is indistinguishable
//! from a real level change and is recorded as-is.

use std::fs::OpenOptions;

use memmap2::{MmapMut, MmapOptions};
use tracing::debug;

use crate::error::{SampleResult, SamplerError};

/// Raw physical-memory device backing the peripheral mapping.
const MEM_DEVICE: &str = "/dev/mem";

/// Size of the mapped GPIO register window in bytes.
pub const GPIO_WINDOW_LEN: usize = 0xB4;

/// Byte offset of pin level register 0 (pins 0-31) within the window.
pub const GPLEV0: usize = 0x34;

/// Byte offset of pin level register 1 (pins 32+). Unused; kept for the
/// register map.
#[allow(dead_code)]
const GPLEV1: usize = 0x38;

/// Board generation, which selects the physical base address of the GPIO
/// peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardGeneration {
    /// Raspberry Pi 3 (BCM2837).
    Pi3,
    /// Raspberry Pi 4 (BCM2711).
    Pi4,
    /// Raspberry Pi 5.
    Pi5,
}

impl BoardGeneration {
    /// Physical base address of the GPIO register window.
    pub fn gpio_base(self) -> u64 {
        match self {
            BoardGeneration::Pi3 => 0x3F20_0000,
            BoardGeneration::Pi4 => 0xFE20_0000,
            // Same as Pi 4 in every configuration observed so far; kept as a
            // separate entry so it can diverge without touching callers.
            BoardGeneration::Pi5 => 0xFE20_0000,
        }
    }
}

impl TryFrom<u8> for BoardGeneration {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(BoardGeneration::Pi3),
            4 => Ok(BoardGeneration::Pi4),
            5 => Ok(BoardGeneration::Pi5),
            other => Err(format!("unknown board generation '{other}' (expected 3, 4, or 5)")),
        }
    }
}

impl std::fmt::Display for BoardGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let gen = match self {
            BoardGeneration::Pi3 => 3,
            BoardGeneration::Pi4 => 4,
            BoardGeneration::Pi5 => 5,
        };
        write!(f, "Pi {gen}")
    }
}

/// Source of GPIO pin levels.
///
/// Implemented by [`GpioMapping`] for real hardware and by [`StaticLevels`]
/// for tests and dry runs. The sampling loop only ever sees this trait.
pub trait LevelSource {
    /// Raw contents of pin level register 0.
    fn level_word(&self) -> u32;

    /// Current level of `pin` (0-31), extracted from the level word.
    fn read_level(&self, pin: u32) -> bool {
        debug_assert!(pin < 32, "pins >= 32 live in level register 1");
        (self.level_word() >> pin) & 1 == 1
    }
}

/// Exclusive owner of the memory-mapped GPIO register window.
///
/// Acquiring a `GpioMapping` checks privilege, opens the physical-memory
/// device, and maps exactly [`GPIO_WINDOW_LEN`] bytes at the generation's base
/// address. The file descriptor is released as soon as the mapping is
/// established; the mapping itself stays valid until the handle is dropped,
/// which unmaps the window. The handle is not `Clone`: one sampler owns the
/// window for the duration of one run.
pub struct GpioMapping {
    registers: MmapMut,
}

impl GpioMapping {
    /// Map the GPIO register window for `generation`.
    ///
    /// Fails with [`SamplerError::Permission`] when the process is not running
    /// as root, before any OS resource is acquired, and with
    /// [`SamplerError::Mapping`] when the open or map step fails. A failed
    /// mapping almost always means wrong privilege or wrong board generation,
    /// so there is no retry.
    pub fn acquire(generation: BoardGeneration) -> SampleResult<Self> {
        ensure_privileged()?;

        let base = generation.gpio_base();
        debug!(%generation, base = %format_args!("{base:#x}"), "mapping GPIO window");

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(MEM_DEVICE)
            .map_err(SamplerError::Mapping)?;

        // SAFETY: the GPIO window is device memory with no aliasing Rust
        // references; all register access goes through volatile reads.
        let registers = unsafe {
            MmapOptions::new()
                .offset(base)
                .len(GPIO_WINDOW_LEN)
                .map_mut(&file)
                .map_err(SamplerError::Mapping)?
        };

        // `file` drops here; the mapping outlives the descriptor.
        Ok(Self { registers })
    }
}

impl LevelSource for GpioMapping {
    fn level_word(&self) -> u32 {
        // SAFETY: GPLEV0 + 4 bytes lies within the GPIO_WINDOW_LEN-byte
        // mapping owned by self. Volatile keeps the hardware register read
        // from being elided or reordered.
        unsafe {
            (self.registers.as_ptr().add(GPLEV0) as *const u32).read_volatile()
        }
    }
}

/// Check for root privilege before touching `/dev/mem`.
fn ensure_privileged() -> SampleResult<()> {
    // SAFETY: geteuid takes no arguments and cannot fail.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        return Err(SamplerError::Permission);
    }
    Ok(())
}

/// A level source with a fixed register word, for tests and runs without GPIO
/// hardware.
pub struct StaticLevels(pub u32);

impl LevelSource for StaticLevels {
    fn level_word(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_address_per_generation() {
        assert_eq!(BoardGeneration::Pi3.gpio_base(), 0x3F20_0000);
        assert_eq!(BoardGeneration::Pi4.gpio_base(), 0xFE20_0000);
        assert_eq!(BoardGeneration::Pi5.gpio_base(), 0xFE20_0000);
    }

    #[test]
    fn generation_parses_from_integer() {
        assert_eq!(BoardGeneration::try_from(3), Ok(BoardGeneration::Pi3));
        assert_eq!(BoardGeneration::try_from(4), Ok(BoardGeneration::Pi4));
        assert_eq!(BoardGeneration::try_from(5), Ok(BoardGeneration::Pi5));
        assert!(BoardGeneration::try_from(2).is_err());
    }

    #[test]
    fn level_extraction_selects_the_pin_bit() {
        let source = StaticLevels(0b100);
        assert!(source.read_level(2));
        assert!(!source.read_level(0));
    }

    #[test]
    fn level_extraction_handles_high_pins() {
        let source = StaticLevels(1 << 31);
        assert!(source.read_level(31));
        assert!(!source.read_level(30));
    }

    #[test]
    fn acquire_without_privilege_is_rejected() {
        // Only meaningful when the test runner is unprivileged.
        // SAFETY: geteuid takes no arguments and cannot fail.
        let euid = unsafe { libc::geteuid() };
        if euid == 0 {
            return;
        }
        match GpioMapping::acquire(BoardGeneration::Pi4) {
            Err(SamplerError::Permission) => {}
            other => panic!("expected Permission, got {:?}", other.map(|_| ())),
        }
    }
}
