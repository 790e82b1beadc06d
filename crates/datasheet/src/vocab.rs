//! Controlled vocabularies of the datasheet frontmatter.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// License identifiers accepted in the `license` frontmatter field.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Hash,
    Clone,
    Copy,
)]
pub(crate) enum License {
    #[serde(rename = "cc0-1.0")]
    Cc0,
    #[serde(rename = "cc-by-sa-4.0")]
    CcBySa4,
    #[serde(rename = "apache-2.0")]
    Apache2,
    /// Licenses outside the canonical set; these require a
    /// `license_name` and a `## License Information` section.
    #[default]
    #[serde(rename = "other")]
    Other,
}

impl License {
    /// The canonical human-readable name, if the license has one.
    pub(crate) fn display_name(self) -> Option<&'static str> {
        match self {
            Self::Cc0 => Some("CC0"),
            Self::CcBySa4 => Some("CC BY-SA 4.0"),
            Self::Apache2 => Some("Apache 2.0"),
            Self::Other => None,
        }
    }
}

impl Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cc0 => write!(f, "cc0-1.0"),
            Self::CcBySa4 => write!(f, "cc-by-sa-4.0"),
            Self::Apache2 => write!(f, "apache-2.0"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl FromStr for License {
    type Err = DatasheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cc0-1.0" => Ok(Self::Cc0),
            "cc-by-sa-4.0" => Ok(Self::CcBySa4),
            "apache-2.0" => Ok(Self::Apache2),
            "other" => Ok(Self::Other),
            _ => bail!("invalid license '{s}'"),
        }
    }
}

/// Language codes accepted in the `language` frontmatter field.
#[derive(
    Debug, PartialEq, Eq, Serialize, Deserialize, Hash, Clone, Copy,
)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Language {
    Da,
    En,
    Se,
    Nb,
    Nn,
    De,
    Fr,
    Nl,
    It,
}

impl Language {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Da => "Danish",
            Self::En => "English",
            Self::Se => "Swedish",
            Self::Nb => "Norwegian Bokmål",
            Self::Nn => "Norwegian Nynorsk",
            Self::De => "German",
            Self::Fr => "French",
            Self::Nl => "Dutch",
            Self::It => "Italian",
        }
    }

    pub(crate) fn code(self) -> &'static str {
        match self {
            Self::Da => "da",
            Self::En => "en",
            Self::Se => "se",
            Self::Nb => "nb",
            Self::Nn => "nn",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Nl => "nl",
            Self::It => "it",
        }
    }

    pub(crate) fn all() -> &'static [Language] {
        &[
            Self::Da,
            Self::En,
            Self::Se,
            Self::Nb,
            Self::Nn,
            Self::De,
            Self::Fr,
            Self::Nl,
            Self::It,
        ]
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = DatasheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "da" => Ok(Self::Da),
            "en" => Ok(Self::En),
            "se" => Ok(Self::Se),
            "nb" => Ok(Self::Nb),
            "nn" => Ok(Self::Nn),
            "de" => Ok(Self::De),
            "fr" => Ok(Self::Fr),
            "nl" => Ok(Self::Nl),
            "it" => Ok(Self::It),
            _ => bail!("invalid language code '{s}'"),
        }
    }
}

/// Content domains accepted in the `domains` frontmatter field.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Hash,
    Clone,
    Copy,
)]
pub(crate) enum Domain {
    Books,
    Conversation,
    Dialect,
    Encyclopedic,
    Governmental,
    Legal,
    News,
    #[default]
    Other,
    Readaloud,
    #[serde(rename = "Social Media")]
    SocialMedia,
    Speeches,
    Spoken,
    Subtitles,
    Web,
}

impl Domain {
    pub(crate) fn all() -> &'static [Domain] {
        &[
            Self::Books,
            Self::Conversation,
            Self::Dialect,
            Self::Encyclopedic,
            Self::Governmental,
            Self::Legal,
            Self::News,
            Self::Other,
            Self::Readaloud,
            Self::SocialMedia,
            Self::Speeches,
            Self::Spoken,
            Self::Subtitles,
            Self::Web,
        ]
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Books => write!(f, "Books"),
            Self::Conversation => write!(f, "Conversation"),
            Self::Dialect => write!(f, "Dialect"),
            Self::Encyclopedic => write!(f, "Encyclopedic"),
            Self::Governmental => write!(f, "Governmental"),
            Self::Legal => write!(f, "Legal"),
            Self::News => write!(f, "News"),
            Self::Other => write!(f, "Other"),
            Self::Readaloud => write!(f, "Readaloud"),
            Self::SocialMedia => write!(f, "Social Media"),
            Self::Speeches => write!(f, "Speeches"),
            Self::Spoken => write!(f, "Spoken"),
            Self::Subtitles => write!(f, "Subtitles"),
            Self::Web => write!(f, "Web"),
        }
    }
}

impl FromStr for Domain {
    type Err = DatasheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Books" => Ok(Self::Books),
            "Conversation" => Ok(Self::Conversation),
            "Dialect" => Ok(Self::Dialect),
            "Encyclopedic" => Ok(Self::Encyclopedic),
            "Governmental" => Ok(Self::Governmental),
            "Legal" => Ok(Self::Legal),
            "News" => Ok(Self::News),
            "Other" => Ok(Self::Other),
            "Readaloud" => Ok(Self::Readaloud),
            "Social Media" => Ok(Self::SocialMedia),
            "Speeches" => Ok(Self::Speeches),
            "Spoken" => Ok(Self::Spoken),
            "Subtitles" => Ok(Self::Subtitles),
            "Web" => Ok(Self::Web),
            _ => bail!("invalid domain '{s}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_from_str() {
        use License::*;

        assert_eq!(License::from_str("cc0-1.0").unwrap(), Cc0);
        assert_eq!(
            License::from_str("cc-by-sa-4.0").unwrap(),
            CcBySa4
        );
        assert_eq!(License::from_str("apache-2.0").unwrap(), Apache2);
        assert_eq!(License::from_str("other").unwrap(), Other);

        assert!(License::from_str("gpl-3.0").is_err());
    }

    #[test]
    fn license_display_name() {
        assert_eq!(License::Cc0.display_name(), Some("CC0"));
        assert_eq!(License::Other.display_name(), None);
    }

    #[test]
    fn language_roundtrip() {
        for lang in Language::all() {
            assert_eq!(
                &Language::from_str(lang.code()).unwrap(),
                lang
            );
        }

        assert!(Language::from_str("xx").is_err());
    }

    #[test]
    fn domain_from_str() {
        use Domain::*;

        assert_eq!(
            Domain::from_str("Social Media").unwrap(),
            SocialMedia
        );
        assert_eq!(Domain::from_str("Web").unwrap(), Web);
        assert!(Domain::from_str("web").is_err());
    }

    #[test]
    fn domain_to_string() {
        assert_eq!(Domain::SocialMedia.to_string(), "Social Media");
        assert_eq!(Domain::Books.to_string(), "Books");
    }
}
