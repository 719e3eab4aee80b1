use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect(Address),
    Disconnect,
    Refresh,
    Reload, // re-resolve the contract handles
    Show,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        if parts.next().is_some() {
            return Err(Error::msg(format!("Too many arguments: {}", s.trim())));
        }

        match (name.as_str(), arg) {
            ("connect", Some(address)) => Ok(Command::Connect(Address::from_str(address)?)),
            ("connect", None) => Err(Error::msg("Usage: connect <address>")),
            ("disconnect", None) => Ok(Command::Disconnect),
            ("refresh", None) => Ok(Command::Refresh),
            ("reload", None) => Ok(Command::Reload),
            ("show", None) => Ok(Command::Show),
            ("quit" | "exit", None) => Ok(Command::Quit),
            _ => Err(Error::msg(format!(
                "Unknown command: {}. Expected one of: connect <address>, disconnect, {}",
                s.trim(),
                "refresh, reload, show, quit"
            ))),
        }
    }
}
