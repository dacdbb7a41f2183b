use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Post visibility as the backend spells it on the wire.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
pub enum Visibility {
    #[serde(alias = "public")]
    Public,
    #[serde(alias = "private")]
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Private => "Private",
        }
    }
}
