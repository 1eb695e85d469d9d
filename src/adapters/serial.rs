use crate::domain::model::LinkSettings;
use crate::domain::ports::{LinkOpener, SerialLink};
use crate::utils::error::Result;
use serialport::{DataBits, FlowControl, Parity, StopBits};

/// Opens real hardware ports through `serialport`, 8N1 without flow control.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialPortOpener;

impl SerialPortOpener {
    pub fn new() -> Self {
        Self
    }
}

impl LinkOpener for SerialPortOpener {
    fn open(&self, settings: &LinkSettings) -> Result<Box<dyn SerialLink>> {
        let port = serialport::new(&settings.port, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(settings.timeout)
            .open()?;

        Ok(Box::new(port))
    }
}
