//! Caller identity for mutating ledger calls
//!
//! Every `send` call is identity-attributed, so the session is passed
//! explicitly rather than held as ambient global state. A session is created
//! on wallet connect and discarded on disconnect or account change; it is
//! never implicitly reused across connections.

use crate::types::Hotel;

/// An established ledger session for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account: String,
}

impl Session {
    /// Establish a session for the connected account
    pub fn connect(account: impl Into<String>) -> Session {
        Session { account: account.into() }
    }

    /// The account identifier this session signs sends with
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Whether this session's account manages the given hotel.
    /// Account identifiers compare case-insensitively.
    pub fn manages(&self, hotel: &Hotel) -> bool {
        hotel.manager.eq_ignore_ascii_case(&self.account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_comparison_ignores_case() {
        let session = Session::connect("0xAbC123");
        let hotel = Hotel {
            id: 1,
            name: "Harbor Inn".into(),
            manager: "0xabc123".into(),
            content_ref: "ref".into(),
            is_active: true,
        };
        assert!(session.manages(&hotel));

        let other = Hotel { manager: "0xdef456".into(), ..hotel };
        assert!(!session.manages(&other));
    }
}
