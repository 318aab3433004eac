//! Temperature probe seam.
//!
//! The polling service only needs "give me the temperature of unit N";
//! everything about the wire lives behind [`TemperatureProbe`].

use crate::error::{Result, ThermaError};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Reads the temperature of one MODBUS unit.
#[async_trait]
pub trait TemperatureProbe: Send + Sync {
    async fn read_celsius(&self, unit_id: u8) -> Result<f64>;
}

/// MODBUS/TCP probe.
///
/// Sensors expose their reading as one input register holding centidegrees.
pub struct ModbusProbe {
    host: String,
    port: u16,
}

/// Read input registers.
const FUNCTION_READ_INPUT: u8 = 0x04;

/// Register the temperature lives in.
const TEMPERATURE_REGISTER: u16 = 0x0000;

impl ModbusProbe {
    /// Probe talking to the local MODBUS gateway.
    pub fn new(port: u16) -> Self {
        Self::with_host("127.0.0.1", port)
    }

    pub fn with_host(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn request(transaction: u16, unit_id: u8) -> [u8; 12] {
        let mut frame = [0u8; 12];
        frame[0..2].copy_from_slice(&transaction.to_be_bytes());
        // Protocol id 0, payload length 6.
        frame[4..6].copy_from_slice(&6u16.to_be_bytes());
        frame[6] = unit_id;
        frame[7] = FUNCTION_READ_INPUT;
        frame[8..10].copy_from_slice(&TEMPERATURE_REGISTER.to_be_bytes());
        frame[10..12].copy_from_slice(&1u16.to_be_bytes());
        frame
    }
}

#[async_trait]
impl TemperatureProbe for ModbusProbe {
    async fn read_celsius(&self, unit_id: u8) -> Result<f64> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|error| ThermaError::Probe(error.to_string()))?;

        stream.write_all(&Self::request(1, unit_id)).await?;

        let mut response = [0u8; 11];
        stream.read_exact(&mut response).await?;

        if response[6] != unit_id {
            return Err(ThermaError::MalformedResponse(format!(
                "unit id {} in response to unit {}",
                response[6], unit_id
            )));
        }
        if response[7] != FUNCTION_READ_INPUT {
            return Err(ThermaError::MalformedResponse(format!(
                "function 0x{:02x}",
                response[7]
            )));
        }

        let raw = i16::from_be_bytes([response[9], response[10]]);
        let celsius = f64::from(raw) / 100.0;

        debug!(unit = unit_id, celsius, "Temperature read");

        Ok(celsius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_frame_layout() {
        let frame = ModbusProbe::request(7, 2);
        assert_eq!(&frame[0..2], &[0, 7]);
        assert_eq!(&frame[4..6], &[0, 6]);
        assert_eq!(frame[6], 2);
        assert_eq!(frame[7], FUNCTION_READ_INPUT);
        assert_eq!(&frame[10..12], &[0, 1]);
    }

    #[tokio::test]
    async fn test_read_against_stub_gateway() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 12];
            socket.read_exact(&mut request).await.unwrap();

            // Echo transaction id, answer 21.25 C for the requested unit.
            let mut response = [0u8; 11];
            response[0..2].copy_from_slice(&request[0..2]);
            response[4..6].copy_from_slice(&5u16.to_be_bytes());
            response[6] = request[6];
            response[7] = FUNCTION_READ_INPUT;
            response[8] = 2;
            response[9..11].copy_from_slice(&2125i16.to_be_bytes());
            socket.write_all(&response).await.unwrap();
        });

        let probe = ModbusProbe::new(port);
        let celsius = probe.read_celsius(2).await.unwrap();
        assert!((celsius - 21.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_read_connection_refused() {
        let probe = ModbusProbe::new(1);
        assert!(probe.read_celsius(2).await.is_err());
    }
}
