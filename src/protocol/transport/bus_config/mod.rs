//! Listen-only controller configuration handed to a [`BusDriver`] at install
//! time: bit timing and acceptance filter. The observer itself never touches
//! the controller; this is the description the startup glue passes along.
//!
//! Register layouts follow the TWAI (SJA1000-style) controller: a bit set in
//! the acceptance mask means "don't care".
//!
//! [`BusDriver`]: crate::protocol::transport::traits::bus_driver::BusDriver

/// Controller source clock used by the timing presets (Hz).
pub const APB_CLOCK_HZ: u32 = 80_000_000;

//==================================================================================BIT_TIMING
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Bit timing parameters, in time quanta.
pub struct BitTiming {
    /// Baud rate prescaler applied to [`APB_CLOCK_HZ`].
    pub brp: u32,
    pub tseg_1: u8,
    pub tseg_2: u8,
    /// Synchronization jump width.
    pub sjw: u8,
    pub triple_sampling: bool,
}

impl BitTiming {
    const fn preset(brp: u32, tseg_1: u8, tseg_2: u8) -> Self {
        Self {
            brp,
            tseg_1,
            tseg_2,
            sjw: 3,
            triple_sampling: false,
        }
    }

    pub const fn kbits_25() -> Self {
        Self::preset(128, 16, 8)
    }
    pub const fn kbits_50() -> Self {
        Self::preset(80, 15, 4)
    }
    pub const fn kbits_100() -> Self {
        Self::preset(40, 15, 4)
    }
    pub const fn kbits_125() -> Self {
        Self::preset(32, 15, 4)
    }
    pub const fn kbits_250() -> Self {
        Self::preset(16, 15, 4)
    }
    pub const fn kbits_500() -> Self {
        Self::preset(8, 15, 4)
    }
    pub const fn kbits_800() -> Self {
        Self::preset(4, 16, 8)
    }
    pub const fn mbits_1() -> Self {
        Self::preset(4, 15, 4)
    }

    /// Quanta per bit: sync segment plus both timing segments.
    pub fn quanta_per_bit(&self) -> u32 {
        1 + self.tseg_1 as u32 + self.tseg_2 as u32
    }

    /// Nominal bit rate obtained from `clock_hz`, or `None` for a zero prescaler.
    pub fn bitrate(&self, clock_hz: u32) -> Option<u32> {
        let divisor = self.brp.checked_mul(self.quanta_per_bit())?;
        clock_hz.checked_div(divisor)
    }
}

impl Default for BitTiming {
    fn default() -> Self {
        Self::kbits_125()
    }
}

//==================================================================================ACCEPTANCE_FILTER
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Hardware acceptance filter deciding which identifiers reach software.
pub struct AcceptanceFilter {
    pub code: u32,
    /// Bits set to `1` are ignored during comparison.
    pub mask: u32,
    /// Single 32-bit filter (`true`) or two 16-bit filters (`false`).
    pub single: bool,
}

impl AcceptanceFilter {
    /// Let every frame through.
    pub const fn accept_all() -> Self {
        Self {
            code: 0,
            mask: 0xFFFF_FFFF,
            single: true,
        }
    }

    /// Single filter matching exactly one standard identifier.
    pub const fn exact_standard(id: u16) -> Self {
        Self {
            code: ((id as u32) & 0x7FF) << 21,
            mask: 0x001F_FFFF,
            single: true,
        }
    }

    /// Whether a frame with this identifier would be delivered.
    /// Only identifier bits are compared; data-byte filtering is not modelled.
    pub fn accepts(&self, id: u32, extended: bool) -> bool {
        let care = !self.mask;
        if self.single {
            let (aligned, relevant) = if extended {
                ((id & 0x1FFF_FFFF) << 3, 0xFFFF_FFF8)
            } else {
                ((id & 0x7FF) << 21, 0xFFE0_0000)
            };
            return (aligned ^ self.code) & care & relevant == 0;
        }

        let (first, second, relevant_first, relevant_second) = if extended {
            let top = (id >> 13) & 0xFFFF;
            (top << 16, top, 0xFFFF_0000, 0x0000_FFFF)
        } else {
            let id = id & 0x7FF;
            (id << 21, id << 5, 0xFFE0_0000, 0x0000_FFE0)
        };
        (first ^ self.code) & care & relevant_first == 0
            || (second ^ self.code) & care & relevant_second == 0
    }
}

impl Default for AcceptanceFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

//==================================================================================BUS_CONFIG
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Everything a driver needs to bring a controller up in listen-only mode:
/// no acknowledgements, no error frames, no transmissions.
pub struct BusConfig {
    pub timing: BitTiming,
    pub filter: AcceptanceFilter,
}

impl BusConfig {
    pub fn with_timing(mut self, timing: BitTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_filter(mut self, filter: AcceptanceFilter) -> Self {
        self.filter = filter;
        self
    }
}
