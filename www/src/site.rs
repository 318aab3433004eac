//! Dashboard content provider.

use gpio::{RelayState, RelayStation};
use std::sync::Arc;
use std::time::Instant;
use therma::ThermaService;

/// View row for one relay.
pub struct RelayRow {
    pub index: usize,
    pub name: String,
    pub off: bool,
}

/// View row for one sensor, values preformatted for the page.
pub struct ThermaRow {
    pub name: String,
    pub lowest: String,
    pub delta_down: String,
    pub current: String,
    pub delta_up: String,
    pub highest: String,
}

/// Reads current state from the entity collections and produces view rows.
pub struct Site {
    relay_station: Arc<RelayStation>,
    therma: Arc<ThermaService>,
    version: String,
    started: Instant,
}

impl Site {
    pub fn new(relay_station: Arc<RelayStation>, therma: Arc<ThermaService>) -> Self {
        Self {
            relay_station,
            therma,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started: Instant::now(),
        }
    }

    /// Apply a dashboard action: switch the relay at `index` to the state
    /// named by `token` (`Up`/`Down`).
    pub fn switch_relay(&self, index: usize, token: &str) -> gpio::Result<()> {
        let state: RelayState = token.parse()?;
        self.relay_station.get(index)?.switch(state);
        Ok(())
    }

    pub fn relay_rows(&self) -> Vec<RelayRow> {
        self.relay_station
            .snapshot()
            .iter()
            .enumerate()
            .map(|(index, relay)| RelayRow {
                index,
                name: relay.name.clone(),
                off: relay.is_off(),
            })
            .collect()
    }

    pub fn therma_rows(&self) -> Vec<ThermaRow> {
        self.therma
            .snapshot()
            .iter()
            .map(|sensor| match sensor.temperature() {
                Some(temperature) => ThermaRow {
                    name: sensor.name.clone(),
                    lowest: format!("{:4.2} ℃", temperature.lowest),
                    delta_down: format!(
                        "[-{:4.2} ℃]",
                        temperature.current - temperature.lowest
                    ),
                    current: format!("{:4.2} ℃", temperature.current),
                    delta_up: format!(
                        "[+{:4.2} ℃]",
                        temperature.highest - temperature.current
                    ),
                    highest: format!("{:4.2} ℃", temperature.highest),
                },
                None => ThermaRow {
                    name: sensor.name.clone(),
                    lowest: "—".to_string(),
                    delta_down: String::new(),
                    current: "—".to_string(),
                    delta_up: String::new(),
                    highest: "—".to_string(),
                },
            })
            .collect()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Uptime as `Hh Mm Ss`.
    pub fn uptime(&self) -> String {
        let seconds = self.started.elapsed().as_secs();
        format!(
            "{}h {}m {}s",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpio::Relay;
    use therma::Sensor;

    fn site_with(relays: &[(u32, &str)], sensors: &[(&str, u8)]) -> Site {
        let station = Arc::new(RelayStation::new());
        for (pin, name) in relays {
            station.push(Relay::new(*pin, *name));
        }
        let therma = Arc::new(ThermaService::new());
        for (name, unit) in sensors {
            therma.push(Sensor::new(format!("id-{}", unit), *name, *unit));
        }
        Site::new(station, therma)
    }

    #[test]
    fn test_switch_relay_roundtrip() {
        let site = site_with(&[(17, "Pumpe"), (27, "Licht")], &[]);

        site.switch_relay(0, "Up").unwrap();

        let rows = site.relay_rows();
        assert!(!rows[0].off);
        assert!(rows[1].off);

        site.switch_relay(0, "Down").unwrap();
        assert!(site.relay_rows()[0].off);
    }

    #[test]
    fn test_switch_relay_bad_index() {
        let site = site_with(&[(17, "Pumpe")], &[]);
        assert!(site.switch_relay(5, "Up").is_err());
    }

    #[test]
    fn test_switch_relay_bad_token() {
        let site = site_with(&[(17, "Pumpe")], &[]);
        assert!(site.switch_relay(0, "Sideways").is_err());
        // A rejected token leaves the relay untouched.
        assert!(site.relay_rows()[0].off);
    }

    #[test]
    fn test_therma_rows_without_reading() {
        let site = site_with(&[], &[("Keller", 2)]);
        let rows = site.therma_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].current, "—");
    }

    #[test]
    fn test_therma_rows_formatting() {
        let site = site_with(&[], &[("Keller", 2)]);
        let sensor = site.therma.get(0).unwrap();
        sensor.record(17.0);
        sensor.record(21.25);
        sensor.record(19.0);

        let row = &site.therma_rows()[0];
        assert_eq!(row.lowest, "17.00 ℃");
        assert_eq!(row.current, "19.00 ℃");
        assert_eq!(row.highest, "21.25 ℃");
        assert_eq!(row.delta_down, "[-2.00 ℃]");
        assert_eq!(row.delta_up, "[+2.25 ℃]");
    }
}
