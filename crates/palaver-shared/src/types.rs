use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Server-issued channel identifier.
    ChannelId
);
string_id!(
    /// Server-issued user identifier.
    UserId
);
string_id!(
    /// Server-issued server (guild) identifier.
    ServerId
);
string_id!(
    /// Server-issued support-ticket identifier.
    TicketId
);

/// Relationship state of a friend record, as reported by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendStatus {
    /// We sent a request that the other user has not answered yet.
    Sent,
    /// The other user sent us a request.
    Pending,
    /// Both sides accepted.
    Friends,
    /// We blocked this user.
    Blocked,
}

/// Category of a support ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategory {
    Question,
    Account,
    Abuse,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_from() {
        let id = ChannelId::from("abc123");
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id, ChannelId("abc123".to_string()));
    }
}
