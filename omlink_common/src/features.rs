//! Firmware feature flags.
//!
//! Reported by the firmware collaborator; they decide which legacy verbs
//! the file-manager channel may use.

use bitflags::bitflags;

bitflags! {
    /// Features (or missing features) of the remote firmware.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FirmwareFeatures: u8 {
        /// G-code files live in `0:/` instead of `0:/gcodes`.
        const NO_GCODES_FOLDER  = 0x01;
        /// No separate active and standby tool temperatures.
        const NO_STANDBY_TEMPS  = 0x02;
        /// G10 cannot set temperatures.
        const NO_G10_TEMPS      = 0x04;
        /// Drive numbers at the start of file paths are not understood.
        const NO_DRIVE_NUMBER   = 0x08;
        /// No `M20 S2` / `M36`; use `M408 S20` / `M408 S36` instead.
        const NO_M20_M36        = 0x10;
        /// File names must always be quoted.
        const QUOTE_FILENAMES   = 0x20;
        /// M568 sets tool temperatures and spindle RPM.
        const M568_TEMP_AND_RPM = 0x40;
    }
}

impl FirmwareFeatures {
    /// Verb (with trailing parameter letter) that lists a directory.
    pub const fn file_list_command(self) -> &'static str {
        if self.contains(Self::NO_M20_M36) {
            "M408 S20 P"
        } else {
            "M20 S2 P"
        }
    }

    /// Verb that asks for the information block of one file.
    pub const fn file_info_command(self) -> &'static str {
        if self.contains(Self::NO_M20_M36) {
            "M408 S36 P"
        } else {
            "M36 "
        }
    }

    /// True when file-name arguments must be quoted.
    #[inline]
    pub const fn quotes_filenames(self) -> bool {
        self.contains(Self::QUOTE_FILENAMES)
    }
}
