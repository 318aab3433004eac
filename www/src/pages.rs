//! Page templates.

use crate::site::{RelayRow, ThermaRow};
use askama::Template;

/// The 'Relais' tab.
#[derive(Template)]
#[template(path = "relay.html")]
pub struct RelayPage {
    pub rows: Vec<RelayRow>,
}

/// The 'Therma' tab.
#[derive(Template)]
#[template(path = "therma.html")]
pub struct ThermaPage {
    pub rows: Vec<ThermaRow>,
}

/// The 'System' tab.
#[derive(Template)]
#[template(path = "system.html")]
pub struct SystemPage {
    pub version: String,
    pub uptime: String,
    pub buffers: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_page_renders_action_links() {
        let page = RelayPage {
            rows: vec![
                RelayRow {
                    index: 0,
                    name: "Pumpe".to_string(),
                    off: true,
                },
                RelayRow {
                    index: 1,
                    name: "Licht".to_string(),
                    off: false,
                },
            ],
        };

        let html = page.render().unwrap();
        assert!(html.contains("Relaisstation"));
        assert!(html.contains("?SwitchRelay=0&amp;RelayState=Down"));
        assert!(html.contains("?SwitchRelay=1&amp;RelayState=Up"));
        assert!(html.contains("Aus"));
        assert!(html.contains("Ein"));
    }

    #[test]
    fn test_therma_page_refreshes() {
        let page = ThermaPage { rows: Vec::new() };
        let html = page.render().unwrap();
        assert!(html.contains(r#"http-equiv="refresh" content="10""#));
        assert!(html.contains("Therma"));
    }

    #[test]
    fn test_system_page_renders_version() {
        let page = SystemPage {
            version: "0.1.0".to_string(),
            uptime: "0h 0m 1s".to_string(),
            buffers: "1000 frei".to_string(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("0.1.0"));
        assert!(html.contains("Software version:"));
    }
}
