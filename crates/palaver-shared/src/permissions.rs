//! Permission bitmask tables and bit helpers.
//!
//! A permission value is a `u64` whose set bits each denote one named
//! capability.  The tables below fix the name-to-bit mapping; decoding a
//! value yields flags in **table order**, not numeric bit order.

/// One named capability and the bit that encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitwise {
    pub name: &'static str,
    pub bit: u64,
}

/// Capabilities that apply to a single channel.
pub mod channel {
    use super::Bitwise;

    pub const PRIVATE_CHANNEL: Bitwise = Bitwise {
        name: "Private Channel",
        bit: 1,
    };
    pub const SEND_MESSAGE: Bitwise = Bitwise {
        name: "Send Message",
        bit: 2,
    };
    pub const JOIN_VOICE: Bitwise = Bitwise {
        name: "Join Voice",
        bit: 4,
    };

    /// All channel capabilities, in display order.
    pub const ALL: [Bitwise; 3] = [PRIVATE_CHANNEL, SEND_MESSAGE, JOIN_VOICE];
}

/// Capabilities granted by server roles.
pub mod role {
    use super::Bitwise;

    pub const ADMIN: Bitwise = Bitwise {
        name: "Admin",
        bit: 1,
    };
    pub const SEND_MESSAGE: Bitwise = Bitwise {
        name: "Send Message",
        bit: 2,
    };
    pub const MANAGE_ROLES: Bitwise = Bitwise {
        name: "Manage Roles",
        bit: 4,
    };
    pub const MANAGE_CHANNELS: Bitwise = Bitwise {
        name: "Manage Channels",
        bit: 8,
    };
    pub const KICK: Bitwise = Bitwise {
        name: "Kick",
        bit: 16,
    };
    pub const BAN: Bitwise = Bitwise {
        name: "Ban",
        bit: 32,
    };

    /// All role capabilities, in display order.
    pub const ALL: [Bitwise; 6] = [
        ADMIN,
        SEND_MESSAGE,
        MANAGE_ROLES,
        MANAGE_CHANNELS,
        KICK,
        BAN,
    ];
}

/// Test a single capability bit without decoding the full list.
pub fn has_bit(value: u64, bit: u64) -> bool {
    value & bit == bit
}

/// Set a capability bit.
pub fn add_bit(value: u64, bit: u64) -> u64 {
    value | bit
}

/// Clear a capability bit.
pub fn remove_bit(value: u64, bit: u64) -> u64 {
    value & !bit
}

/// Decode `value` against `table`, returning the enabled flags in table
/// order.
pub fn all_permissions<'a>(table: &'a [Bitwise], value: u64) -> Vec<&'a Bitwise> {
    table.iter().filter(|p| has_bit(value, p.bit)).collect()
}
