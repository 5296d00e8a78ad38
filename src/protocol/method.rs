//! Typed command definitions organized by feature area.
//!
//! The wire protocol dispatches on a string method name with positional
//! JSON arguments. This module gives the rest of the crate a closed,
//! compile-checked vocabulary over that stringly surface: each variant
//! knows its wire method name and how its fields flatten into the
//! positional argument list.
//!
//! # Feature Areas
//!
//! | Feature | Commands |
//! |---------|----------|
//! | `strings` | `getPluralString`, `getString` |
//! | `sync` | `getSyncCode`, `getDeviceList`, `setSyncEnabled`, `deleteDevice` |
//! | `rewards` | `getRewardsParameters`, `getRewardsEnabled`, `fetchBalance` |
//! | `vpn` | `getConnectionState`, `getPurchasedState`, `createSupportTicket` |

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};

// ============================================================================
// Command Wrapper
// ============================================================================

/// All typed commands organized by feature area.
///
/// This enum wraps feature-specific command enums so the facade exposes
/// one `call` entry point over the whole vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Localized string lookups.
    Strings(StringsCommand),
    /// Sync setup and device management.
    Sync(SyncCommand),
    /// Rewards state queries.
    Rewards(RewardsCommand),
    /// VPN panel queries and actions.
    Vpn(VpnCommand),
}

impl Command {
    /// Returns the wire method name for this command.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::Strings(cmd) => cmd.method(),
            Self::Sync(cmd) => cmd.method(),
            Self::Rewards(cmd) => cmd.method(),
            Self::Vpn(cmd) => cmd.method(),
        }
    }

    /// Flattens the command fields into positional wire arguments.
    #[must_use]
    pub fn into_args(self) -> Vec<Value> {
        match self {
            Self::Strings(cmd) => cmd.into_args(),
            Self::Sync(cmd) => cmd.into_args(),
            Self::Rewards(cmd) => cmd.into_args(),
            Self::Vpn(cmd) => cmd.into_args(),
        }
    }
}

impl From<StringsCommand> for Command {
    fn from(cmd: StringsCommand) -> Self {
        Self::Strings(cmd)
    }
}

impl From<SyncCommand> for Command {
    fn from(cmd: SyncCommand) -> Self {
        Self::Sync(cmd)
    }
}

impl From<RewardsCommand> for Command {
    fn from(cmd: RewardsCommand) -> Self {
        Self::Rewards(cmd)
    }
}

impl From<VpnCommand> for Command {
    fn from(cmd: VpnCommand) -> Self {
        Self::Vpn(cmd)
    }
}

// ============================================================================
// Strings Commands
// ============================================================================

/// Localized string lookups backed by the native resource bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum StringsCommand {
    /// Resolve a plural string for a count.
    GetPluralString {
        /// Resource key.
        key: String,
        /// Item count the plural form depends on.
        count: u64,
    },

    /// Resolve a plain localized string.
    GetString {
        /// Resource key.
        key: String,
    },
}

impl StringsCommand {
    /// Returns the wire method name.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetPluralString { .. } => "getPluralString",
            Self::GetString { .. } => "getString",
        }
    }

    /// Flattens into positional wire arguments.
    #[must_use]
    pub fn into_args(self) -> Vec<Value> {
        match self {
            Self::GetPluralString { key, count } => vec![json!(key), json!(count)],
            Self::GetString { key } => vec![json!(key)],
        }
    }
}

// ============================================================================
// Sync Commands
// ============================================================================

/// Sync setup and device chain management.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncCommand {
    /// Fetch the sync chain passphrase words.
    GetSyncCode,

    /// Fetch the devices on the current chain.
    GetDeviceList,

    /// Enable or disable sync.
    SetSyncEnabled {
        /// Desired sync state.
        enabled: bool,
    },

    /// Remove a device from the chain.
    DeleteDevice {
        /// Device to remove.
        device_id: String,
    },
}

impl SyncCommand {
    /// Returns the wire method name.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetSyncCode => "getSyncCode",
            Self::GetDeviceList => "getDeviceList",
            Self::SetSyncEnabled { .. } => "setSyncEnabled",
            Self::DeleteDevice { .. } => "deleteDevice",
        }
    }

    /// Flattens into positional wire arguments.
    #[must_use]
    pub fn into_args(self) -> Vec<Value> {
        match self {
            Self::GetSyncCode | Self::GetDeviceList => Vec::new(),
            Self::SetSyncEnabled { enabled } => vec![json!(enabled)],
            Self::DeleteDevice { device_id } => vec![json!(device_id)],
        }
    }
}

// ============================================================================
// Rewards Commands
// ============================================================================

/// Rewards state queries.
#[derive(Debug, Clone, PartialEq)]
pub enum RewardsCommand {
    /// Fetch the current rewards parameters blob.
    GetRewardsParameters,

    /// Query whether rewards is enabled for the profile.
    GetRewardsEnabled,

    /// Fetch the wallet balance.
    FetchBalance,
}

impl RewardsCommand {
    /// Returns the wire method name.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetRewardsParameters => "getRewardsParameters",
            Self::GetRewardsEnabled => "getRewardsEnabled",
            Self::FetchBalance => "fetchBalance",
        }
    }

    /// Flattens into positional wire arguments.
    #[must_use]
    pub fn into_args(self) -> Vec<Value> {
        Vec::new()
    }
}

// ============================================================================
// VPN Commands
// ============================================================================

/// VPN panel queries and actions.
#[derive(Debug, Clone, PartialEq)]
pub enum VpnCommand {
    /// Query the tunnel connection state.
    GetConnectionState,

    /// Query the purchase/credential state.
    GetPurchasedState,

    /// File a support ticket.
    CreateSupportTicket {
        /// Ticket subject line.
        subject: String,
        /// Ticket body.
        body: String,
    },
}

impl VpnCommand {
    /// Returns the wire method name.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetConnectionState => "getConnectionState",
            Self::GetPurchasedState => "getPurchasedState",
            Self::CreateSupportTicket { .. } => "createSupportTicket",
        }
    }

    /// Flattens into positional wire arguments.
    #[must_use]
    pub fn into_args(self) -> Vec<Value> {
        match self {
            Self::GetConnectionState | Self::GetPurchasedState => Vec::new(),
            Self::CreateSupportTicket { subject, body } => {
                vec![json!(subject), json!(body)]
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_string_args() {
        let cmd = Command::from(StringsCommand::GetPluralString {
            key: "itemsKey".to_string(),
            count: 5,
        });

        assert_eq!(cmd.method(), "getPluralString");
        assert_eq!(cmd.into_args(), vec![json!("itemsKey"), json!(5)]);
    }

    #[test]
    fn test_niladic_commands_have_empty_args() {
        assert!(Command::from(SyncCommand::GetSyncCode).into_args().is_empty());
        assert!(
            Command::from(RewardsCommand::FetchBalance)
                .into_args()
                .is_empty()
        );
        assert!(
            Command::from(VpnCommand::GetConnectionState)
                .into_args()
                .is_empty()
        );
    }

    #[test]
    fn test_sync_method_names() {
        assert_eq!(SyncCommand::GetDeviceList.method(), "getDeviceList");
        assert_eq!(
            SyncCommand::SetSyncEnabled { enabled: true }.method(),
            "setSyncEnabled"
        );
        assert_eq!(
            SyncCommand::DeleteDevice {
                device_id: "d1".to_string()
            }
            .method(),
            "deleteDevice"
        );
    }

    #[test]
    fn test_delete_device_args() {
        let args = SyncCommand::DeleteDevice {
            device_id: "device-7".to_string(),
        }
        .into_args();

        assert_eq!(args, vec![json!("device-7")]);
    }

    #[test]
    fn test_support_ticket_args_positional() {
        let args = VpnCommand::CreateSupportTicket {
            subject: "no tunnel".to_string(),
            body: "connect hangs".to_string(),
        }
        .into_args();

        assert_eq!(args, vec![json!("no tunnel"), json!("connect hangs")]);
    }
}
