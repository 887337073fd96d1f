//! Command codes and the static command table
//!
//! Every exchange with the module follows one of eight shapes. The table
//! below records what each command sends and what its reply looks like.
//! The request builder takes payload widths from it and the scanner sizes
//! replies from it.

/// Command codes understood by the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Read target speed and direction
    GetTarget = 0xC1,
    /// I/Q ADC report, pushed by the module in I/Q mode
    IqAdc = 0xC2,
    /// Write the speed window
    SetSpeedScope = 0xC3,
    /// Read the speed window
    GetSpeedScope = 0xC4,
    /// Write the operating mode
    SetMode = 0xC5,
    /// Read the operating mode
    GetMode = 0xC6,
    /// Write the detection threshold
    SetThreshold = 0xC7,
    /// Read the detection threshold
    GetThreshold = 0xC8,
}

impl Command {
    /// Wire code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a command by its wire code
    pub fn from_code(code: u8) -> Option<Self> {
        COMMAND_TABLE
            .iter()
            .find(|d| d.command.code() == code)
            .map(|d| d.command)
    }

    /// Table entry for this command
    pub fn descriptor(self) -> &'static CommandDescriptor {
        // Table is ordered by code, starting at 0xC1
        &COMMAND_TABLE[usize::from(self.code() - Command::GetTarget.code())]
    }

    /// Shape of the module's reply
    pub fn response_shape(self) -> ResponseShape {
        self.descriptor().response
    }
}

/// What the host sends for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestTemplate {
    /// Never sent; the module pushes this frame on its own
    None,
    /// Empty payload
    Query,
    /// Fixed-width parameter payload
    Payload(usize),
}

/// How the scanner sizes a reply after the three-byte prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseShape {
    /// Payload width is implied by the command; LENGTH is read but not trusted
    Fixed(usize),
    /// Payload width comes from the LENGTH field
    LengthPrefixed,
}

/// One row of the command table
#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor {
    /// Command code
    pub command: Command,
    /// Human-readable name for logs
    pub name: &'static str,
    /// Request side
    pub request: RequestTemplate,
    /// Reply side
    pub response: ResponseShape,
}

/// All commands, ordered by code
pub static COMMAND_TABLE: [CommandDescriptor; 8] = [
    CommandDescriptor {
        command: Command::GetTarget,
        name: "get-target",
        request: RequestTemplate::Query,
        response: ResponseShape::Fixed(3),
    },
    CommandDescriptor {
        command: Command::IqAdc,
        name: "iq-adc",
        request: RequestTemplate::None,
        response: ResponseShape::LengthPrefixed,
    },
    CommandDescriptor {
        command: Command::SetSpeedScope,
        name: "set-speed-scope",
        request: RequestTemplate::Payload(4),
        response: ResponseShape::Fixed(4),
    },
    CommandDescriptor {
        command: Command::GetSpeedScope,
        name: "get-speed-scope",
        request: RequestTemplate::Query,
        response: ResponseShape::Fixed(4),
    },
    CommandDescriptor {
        command: Command::SetMode,
        name: "set-mode",
        request: RequestTemplate::Payload(1),
        response: ResponseShape::Fixed(1),
    },
    CommandDescriptor {
        command: Command::GetMode,
        name: "get-mode",
        request: RequestTemplate::Query,
        response: ResponseShape::Fixed(1),
    },
    CommandDescriptor {
        command: Command::SetThreshold,
        name: "set-threshold",
        request: RequestTemplate::Payload(4),
        response: ResponseShape::Fixed(4),
    },
    CommandDescriptor {
        command: Command::GetThreshold,
        name: "get-threshold",
        request: RequestTemplate::Query,
        response: ResponseShape::Fixed(4),
    },
];
