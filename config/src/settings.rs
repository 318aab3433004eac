//! Typed representation of the settings file.
//!
//! The file only describes the hardware attached to this particular
//! installation; entity order in the file is the order the entities get
//! their dashboard indices in.

use serde::Deserialize;

/// Top level settings document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Hardware attached over GPIO and MODBUS.
    #[serde(default)]
    pub gpio: GpioSection,
}

/// The `[gpio]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpioSection {
    /// Relay declarations, in dashboard order.
    #[serde(default)]
    pub relays: Vec<RelayEntry>,
    /// Temperature sensor declarations, in dashboard order.
    #[serde(default)]
    pub therma: Vec<ThermaEntry>,
}

/// One relay declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayEntry {
    /// Human readable relay name shown on the dashboard.
    pub name: String,
    /// GPIO pin number the relay coil is wired to.
    pub gpio: u32,
}

/// One temperature sensor declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThermaEntry {
    /// Sensor hardware id.
    pub id: String,
    /// Human readable sensor name shown on the dashboard.
    pub name: String,
    /// MODBUS unit identifier the sensor answers on.
    pub modbus: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_decode_order() {
        let text = r#"
            [[gpio.relays]]
            name = "Pumpe"
            gpio = 17

            [[gpio.relays]]
            name = "Licht"
            gpio = 27

            [[gpio.therma]]
            id = "28-0000066ff1b1"
            name = "Keller"
            modbus = 2
        "#;

        let settings: Settings = toml::from_str(text).unwrap();
        assert_eq!(settings.gpio.relays.len(), 2);
        assert_eq!(settings.gpio.relays[0].name, "Pumpe");
        assert_eq!(settings.gpio.relays[1].gpio, 27);
        assert_eq!(settings.gpio.therma.len(), 1);
        assert_eq!(settings.gpio.therma[0].modbus, 2);
    }

    #[test]
    fn test_settings_missing_gpio_section() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.gpio.relays.is_empty());
        assert!(settings.gpio.therma.is_empty());
    }

    #[test]
    fn test_settings_unknown_field_rejected() {
        let result: Result<Settings, _> = toml::from_str("barometer = 1");
        assert!(result.is_err());
    }
}
