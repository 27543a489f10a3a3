//! Raw CAN identifiers (11-bit standard or 29-bit extended) and their
//! conversion to and from `embedded-can` identifiers.
use embedded_can::{ExtendedId, Id, StandardId};

//==================================================================================CAN_ID
/// Largest identifier representable in a standard (11-bit) frame.
pub const STANDARD_ID_MAX: u32 = 0x7FF;
/// Largest identifier representable in an extended (29-bit) frame.
pub const EXTENDED_ID_MAX: u32 = 0x1FFF_FFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Numeric identifier of a frame, independent of its format.
///
/// Classification only looks at this value: a standard `0x0A2` and an
/// extended `0x0A2` carry the same identifier.
pub struct CanId(pub u32);

impl CanId {
    /// Raw identifier value.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// `true` when the value fits an 11-bit standard identifier.
    pub fn fits_standard(&self) -> bool {
        self.0 <= STANDARD_ID_MAX
    }

    /// `true` when the value fits a 29-bit extended identifier.
    pub fn fits_extended(&self) -> bool {
        self.0 <= EXTENDED_ID_MAX
    }

    /// Build the `embedded-can` identifier for the requested format.
    /// Returns `None` when the value is too wide for that format.
    pub fn to_id(&self, extended: bool) -> Option<Id> {
        if extended {
            ExtendedId::new(self.0).map(Id::Extended)
        } else {
            u16::try_from(self.0)
                .ok()
                .and_then(StandardId::new)
                .map(Id::Standard)
        }
    }
}

impl From<Id> for CanId {
    fn from(id: Id) -> Self {
        match id {
            Id::Standard(id) => CanId(id.as_raw() as u32),
            Id::Extended(id) => CanId(id.as_raw()),
        }
    }
}

impl From<StandardId> for CanId {
    fn from(id: StandardId) -> Self {
        CanId(id.as_raw() as u32)
    }
}

impl From<ExtendedId> for CanId {
    fn from(id: ExtendedId) -> Self {
        CanId(id.as_raw())
    }
}

impl core::fmt::Display for CanId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#05X}", self.0)
    }
}
