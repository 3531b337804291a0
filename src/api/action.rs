// Builder action routing table
// Closed set of actions the editor may request; every variant must be
// handled by the exhaustive match in `handlers::dispatch_action`.

use std::fmt;
use std::str::FromStr;

use super::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Save,
    SaveAjax,
    NewPage,
    Delete,
    Rename,
    SaveReusable,
    OEmbedProxy,
    Test,
}

impl Action {
    /// Lookup table, in the order the editor documents them
    pub const ALL: [Self; 8] = [
        Self::Save,
        Self::SaveAjax,
        Self::NewPage,
        Self::Delete,
        Self::Rename,
        Self::SaveReusable,
        Self::OEmbedProxy,
        Self::Test,
    ];

    /// Wire name used in the `action` field
    pub const fn name(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::SaveAjax => "saveAjax",
            Self::NewPage => "newPage",
            Self::Delete => "delete",
            Self::Rename => "rename",
            Self::SaveReusable => "saveReusable",
            Self::OEmbedProxy => "oembedProxy",
            Self::Test => "test",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ApiError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_table() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!("saveAjax".parse::<Action>().unwrap(), Action::SaveAjax);
        assert!("SAVE".parse::<Action>().is_err());
        assert!("oEmbedProxy".parse::<Action>().is_err());
    }

    #[test]
    fn test_unknown_action_echoes_name() {
        let err = "publish".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid action: publish");
    }
}
