//! AT command surface
//!
//! The fixed set of commands the driver issues. The surface is not
//! configurable: receive-only SMS text mode with UCS2 payloads.

/// Commands issued to the modem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtCommand {
    /// Responsiveness check (`AT`)
    Ping,

    /// Disable command echo (`ATE0`)
    EchoOff,

    /// Verbose error reporting (`AT+CMEE=2`)
    VerboseErrors,

    /// SMS text mode (`AT+CMGF=1`)
    TextMode,

    /// UCS2 character set (`AT+CSCS="UCS2"`)
    Ucs2Charset,

    /// New-message indication routing (`AT+CNMI=2,1,0,0,0`)
    NewMessageIndication,

    /// Query the device IMEI (`AT+CGSN`)
    QueryImei,

    /// List all stored messages (`AT+CMGL="ALL"`)
    ListAll,

    /// Delete the message at the given storage index, flag 4 = permanent
    Delete(u32),
}

impl AtCommand {
    /// The wire command line, without the trailing terminator
    pub fn line(&self) -> String {
        match self {
            AtCommand::Ping => "AT".to_string(),
            AtCommand::EchoOff => "ATE0".to_string(),
            AtCommand::VerboseErrors => "AT+CMEE=2".to_string(),
            AtCommand::TextMode => "AT+CMGF=1".to_string(),
            AtCommand::Ucs2Charset => "AT+CSCS=\"UCS2\"".to_string(),
            AtCommand::NewMessageIndication => "AT+CNMI=2,1,0,0,0".to_string(),
            AtCommand::QueryImei => "AT+CGSN".to_string(),
            AtCommand::ListAll => "AT+CMGL=\"ALL\"".to_string(),
            AtCommand::Delete(index) => format!("AT+CMGD={},4", index),
        }
    }

    /// Human-readable step description, used in log lines and
    /// initialization failures
    pub fn description(&self) -> &'static str {
        match self {
            AtCommand::Ping => "check modem responsive",
            AtCommand::EchoOff => "disable echo",
            AtCommand::VerboseErrors => "verbose errors",
            AtCommand::TextMode => "text mode",
            AtCommand::Ucs2Charset => "UCS2 charset",
            AtCommand::NewMessageIndication => "new message indication",
            AtCommand::QueryImei => "query IMEI",
            AtCommand::ListAll => "list messages",
            AtCommand::Delete(_) => "delete message",
        }
    }
}

/// Setup sequence run by session initialization, in order. All-or-nothing:
/// the first step without a success token aborts the whole sequence.
pub const INIT_SEQUENCE: [AtCommand; 6] = [
    AtCommand::Ping,
    AtCommand::EchoOff,
    AtCommand::VerboseErrors,
    AtCommand::TextMode,
    AtCommand::Ucs2Charset,
    AtCommand::NewMessageIndication,
];
