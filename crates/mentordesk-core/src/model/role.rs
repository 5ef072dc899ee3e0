use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The closed set of console roles.
///
/// Wire names are snake_case (`super_admin`, `admin`, `mentor`). Parsing is
/// exact: any other string, including different casing, is not a role.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Mentor,
}

impl Role {
    /// Human label for notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Admin => "Admin",
            Self::Mentor => "Mentor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_wire_names() {
        assert_eq!("super_admin".parse::<Role>().ok(), Some(Role::SuperAdmin));
        assert_eq!("mentor".parse::<Role>().ok(), Some(Role::Mentor));
    }

    #[test]
    fn rejects_unknown_and_miscased_roles() {
        assert!("editor".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for role in Role::iter() {
            assert_eq!(role.to_string().parse::<Role>().ok(), Some(role));
        }
    }
}
