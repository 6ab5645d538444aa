//! Device registry - the routable target devices.
//!
//! Loaded once at startup from [`config::DEVICES`](crate::config::DEVICES).
//! The device count is fixed afterwards; the remembered bank is the only
//! field that changes at runtime.

use crate::config::{DeviceConfig, MAX_DEVICES};
use crate::error::ConfigError;
use heapless::Vec;

/// One routable device.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceEntry {
    /// Display name.
    pub name: &'static str,
    /// MIDI channel in musician numbering (1..=16).
    pub midi_channel: u8,
    /// Number of banks.
    pub max_bank: usize,
    selected_bank: usize,
}

impl DeviceEntry {
    /// Zero-based channel as carried on the wire.
    pub fn channel_index(&self) -> u8 {
        self.midi_channel - 1
    }

    /// Bank remembered for this device.
    pub fn selected_bank(&self) -> usize {
        self.selected_bank
    }
}

/// Fixed table of devices.
#[derive(Clone, Debug)]
pub struct Registry {
    devices: Vec<DeviceEntry, MAX_DEVICES>,
}

impl Registry {
    /// Validate a device table and build the registry from it.
    pub fn from_config(table: &[DeviceConfig]) -> Result<Self, ConfigError> {
        if table.is_empty() {
            return Err(ConfigError::Empty);
        }
        if table.len() > MAX_DEVICES {
            return Err(ConfigError::TooManyDevices { count: table.len() });
        }

        let mut devices = Vec::new();
        for (device, cfg) in table.iter().enumerate() {
            if !(1..=16).contains(&cfg.midi_channel) {
                return Err(ConfigError::InvalidChannel {
                    device,
                    channel: cfg.midi_channel,
                });
            }
            if cfg.max_bank == 0 {
                return Err(ConfigError::NoBanks { device });
            }
            if cfg.selected_bank >= cfg.max_bank {
                return Err(ConfigError::BankOutOfRange {
                    device,
                    bank: cfg.selected_bank,
                });
            }

            // Capacity was checked above.
            let _ = devices.push(DeviceEntry {
                name: cfg.name,
                midi_channel: cfg.midi_channel,
                max_bank: cfg.max_bank as usize,
                selected_bank: cfg.selected_bank as usize,
            });
        }

        Ok(Self { devices })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, device: usize) -> Option<&DeviceEntry> {
        self.devices.get(device)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceEntry> {
        self.devices.iter()
    }

    /// Bank count of `device`, or 0 for an unknown index.
    pub fn bank_count(&self, device: usize) -> usize {
        self.get(device).map_or(0, |d| d.max_bank)
    }

    /// Remembered bank of `device`, or 0 for an unknown index.
    pub fn selected_bank(&self, device: usize) -> usize {
        self.get(device).map_or(0, |d| d.selected_bank)
    }

    /// Remember `bank` for `device`.
    ///
    /// Returns `false` (and changes nothing) when either index is out of range.
    pub fn select_bank(&mut self, device: usize, bank: usize) -> bool {
        match self.devices.get_mut(device) {
            Some(entry) if bank < entry.max_bank => {
                entry.selected_bank = bank;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEVICES;

    #[test]
    fn reference_table_is_valid() {
        let registry = Registry::from_config(&DEVICES).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get(0).unwrap().name, "Roland TD-3");
        assert_eq!(registry.get(0).unwrap().channel_index(), 9);
        assert_eq!(registry.selected_bank(2), 3);
        assert_eq!(registry.bank_count(2), 7);
    }

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(Registry::from_config(&[]).unwrap_err(), ConfigError::Empty);
    }

    #[test]
    fn oversized_table_is_rejected() {
        let table = [DeviceConfig::new("X", 1, 1, 0); MAX_DEVICES + 1];
        assert_eq!(
            Registry::from_config(&table).unwrap_err(),
            ConfigError::TooManyDevices {
                count: MAX_DEVICES + 1
            }
        );
    }

    #[test]
    fn channel_must_be_in_range() {
        let zero = [DeviceConfig::new("X", 0, 1, 0)];
        let seventeen = [DeviceConfig::new("Ok", 1, 1, 0), DeviceConfig::new("X", 17, 1, 0)];
        assert_eq!(
            Registry::from_config(&zero).unwrap_err(),
            ConfigError::InvalidChannel {
                device: 0,
                channel: 0
            }
        );
        assert_eq!(
            Registry::from_config(&seventeen).unwrap_err(),
            ConfigError::InvalidChannel {
                device: 1,
                channel: 17
            }
        );
    }

    #[test]
    fn bank_table_must_be_consistent() {
        let no_banks = [DeviceConfig::new("X", 1, 0, 0)];
        let bad_bank = [DeviceConfig::new("X", 1, 2, 2)];
        assert_eq!(
            Registry::from_config(&no_banks).unwrap_err(),
            ConfigError::NoBanks { device: 0 }
        );
        assert_eq!(
            Registry::from_config(&bad_bank).unwrap_err(),
            ConfigError::BankOutOfRange { device: 0, bank: 2 }
        );
    }

    #[test]
    fn select_bank_is_bounded() {
        let mut registry = Registry::from_config(&DEVICES).unwrap();
        assert!(registry.select_bank(2, 6));
        assert_eq!(registry.selected_bank(2), 6);
        assert!(!registry.select_bank(2, 7));
        assert!(!registry.select_bank(9, 0));
        assert_eq!(registry.selected_bank(2), 6);
    }
}
