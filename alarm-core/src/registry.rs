//! # Alarm registry
//! The closed list of alarms the controller knows about, with their texts, thresholds and
//! levels. Slot order is also the round-robin order of display multiplexing.

use crate::alarm::{Alarm, AlarmLevel};
use crate::display::DisplayKey;
use crate::error::Error;

/// Identity of one alarm slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmId {
    /// Peak pressure above the limit
    HighPressure,
    /// Pressure too low, likely a disconnected circuit
    LowPressure,
    /// Plateau pressure too high, high airway resistance
    BadPlateau,
    /// Tidal volume not reached
    UnmetVolume,
    /// No pressure built during inspiration
    NoTidalPressure,
    /// Motor current above the limit
    OverCurrent,
    /// Mechanical fault of the bag compressor
    MechanicalFailure,
    /// Volume changed but not confirmed
    NotConfirmedVolume,
    /// Breath rate changed but not confirmed
    NotConfirmedRate,
    /// I:E ratio changed but not confirmed
    NotConfirmedIeRatio,
    /// Assist-control trigger changed but not confirmed
    NotConfirmedTrigger,
    /// The controller is shutting down
    TurningOff,
}

/// Construction parameters of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmProfile {
    /// Default display text
    pub text: &'static str,
    /// Consecutive bad cycles to latch on
    pub min_bad_to_trigger: u32,
    /// Consecutive good cycles to latch off
    pub min_good_to_clear: u32,
    /// Severity
    pub level: AlarmLevel,
}

impl AlarmProfile {
    /// Shorthand for the table below
    const fn new(
        text: &'static str,
        min_bad_to_trigger: u32,
        min_good_to_clear: u32,
        level: AlarmLevel,
    ) -> Self {
        Self {
            text,
            min_bad_to_trigger,
            min_good_to_clear,
            level,
        }
    }
}

impl AlarmId {
    /// Number of slots
    pub const COUNT: usize = 12;

    /// Every slot, in registry order
    pub const ALL: [Self; Self::COUNT] = [
        Self::HighPressure,
        Self::LowPressure,
        Self::BadPlateau,
        Self::UnmetVolume,
        Self::NoTidalPressure,
        Self::OverCurrent,
        Self::MechanicalFailure,
        Self::NotConfirmedVolume,
        Self::NotConfirmedRate,
        Self::NotConfirmedIeRatio,
        Self::NotConfirmedTrigger,
        Self::TurningOff,
    ];

    /// Position in the registry
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Text, thresholds and level of this slot
    pub const fn profile(self) -> AlarmProfile {
        use AlarmLevel::{Emergency, Notify, OffLevel};
        match self {
            Self::HighPressure => AlarmProfile::new("HIGH PRESSURE", 1, 2, Emergency),
            Self::LowPressure => AlarmProfile::new("LOW PRES DISCONNECT?", 1, 1, Emergency),
            Self::BadPlateau => AlarmProfile::new("HIGH RESIST PRES", 1, 1, Notify),
            Self::UnmetVolume => AlarmProfile::new("UNMET TIDAL VOLUME", 1, 1, Emergency),
            Self::NoTidalPressure => AlarmProfile::new("NO TIDAL PRESSURE", 2, 1, Emergency),
            Self::OverCurrent => AlarmProfile::new("OVER CURRENT FAULT", 1, 2, Emergency),
            Self::MechanicalFailure => AlarmProfile::new("MECHANICAL FAILURE", 1, 1, Emergency),
            Self::NotConfirmedVolume
            | Self::NotConfirmedRate
            | Self::NotConfirmedIeRatio
            | Self::NotConfirmedTrigger => AlarmProfile::new("CONFIRM?", 1, 1, Notify),
            Self::TurningOff => AlarmProfile::new("TURNING OFF", 1, 1, OffLevel),
        }
    }

    /// Whether this slot belongs to the "setting not confirmed" family shown in the header
    pub const fn is_confirm(self) -> bool {
        matches!(
            self,
            Self::NotConfirmedVolume
                | Self::NotConfirmedRate
                | Self::NotConfirmedIeRatio
                | Self::NotConfirmedTrigger
        )
    }

    /// A fresh alarm for this slot
    pub fn build(self) -> Alarm {
        let profile = self.profile();
        Alarm::new(
            profile.text,
            profile.min_bad_to_trigger,
            profile.min_good_to_clear,
            profile.level,
        )
    }
}

/// A setting the operator must confirm after changing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfirmSetting {
    /// Tidal volume
    Volume,
    /// Breaths per minute
    Rate,
    /// Inspiration to expiration ratio
    IeRatio,
    /// Assist-control trigger threshold
    AcTrigger,
}

impl ConfirmSetting {
    /// Every confirmable setting
    pub const ALL: [Self; 4] = [Self::Volume, Self::Rate, Self::IeRatio, Self::AcTrigger];

    /// The alarm slot raised while this setting is unconfirmed
    pub const fn alarm_id(self) -> AlarmId {
        match self {
            Self::Volume => AlarmId::NotConfirmedVolume,
            Self::Rate => AlarmId::NotConfirmedRate,
            Self::IeRatio => AlarmId::NotConfirmedIeRatio,
            Self::AcTrigger => AlarmId::NotConfirmedTrigger,
        }
    }
}

impl TryFrom<DisplayKey> for ConfirmSetting {
    type Error = Error;

    fn try_from(key: DisplayKey) -> Result<Self, Self::Error> {
        match key {
            DisplayKey::Volume => Ok(Self::Volume),
            DisplayKey::Bpm => Ok(Self::Rate),
            DisplayKey::IeRatio => Ok(Self::IeRatio),
            DisplayKey::AcTrigger => Ok(Self::AcTrigger),
            other => Err(Error::UnmappedKey(other)),
        }
    }
}
