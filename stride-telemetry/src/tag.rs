use core::fmt;
use core::str::FromStr;

/// One of the fixed telemetry categories a device reports.
///
/// The set is closed: the codec writes and reads exactly these six keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// Heart rate, beats per minute.
    Heartrate,
    /// Pace, time per distance.
    Pace,
    /// Speed over ground.
    Speed,
    /// Vertical climb.
    Climb,
    /// Step count.
    Steps,
    /// Battery charge.
    Battery,
}

impl Tag {
    /// Number of tags.
    pub const COUNT: usize = 6;

    /// All tags, in wire order.
    pub const ALL: [Tag; Self::COUNT] = [
        Tag::Heartrate,
        Tag::Pace,
        Tag::Speed,
        Tag::Climb,
        Tag::Steps,
        Tag::Battery,
    ];

    /// Returns the key used for this tag in serialized documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Tag::Heartrate => "heartrate",
            Tag::Pace => "pace",
            Tag::Speed => "speed",
            Tag::Climb => "climb",
            Tag::Steps => "steps",
            Tag::Battery => "battery",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that does not name any [`Tag`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown telemetry tag {0:?}")]
pub struct UnknownTag(pub String);

impl FromStr for Tag {
    type Err = UnknownTag;

    /// Keys are case sensitive, matching the serialized form exactly.
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == string)
            .ok_or_else(|| UnknownTag(string.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Tag::Heartrate, "heartrate")]
    #[test_case(Tag::Pace, "pace")]
    #[test_case(Tag::Speed, "speed")]
    #[test_case(Tag::Climb, "climb")]
    #[test_case(Tag::Steps, "steps")]
    #[test_case(Tag::Battery, "battery")]
    fn wire_names(tag: Tag, name: &str) {
        assert_eq!(tag.as_str(), name);
        assert_eq!(tag.to_string(), name);
        assert_eq!(name.parse::<Tag>(), Ok(tag));
    }

    #[test_case("HeartRate" ; "wrong case")]
    #[test_case("" ; "empty")]
    #[test_case("temperature" ; "not a tag")]
    fn unknown_names_are_rejected(name: &str) {
        assert_eq!(name.parse::<Tag>(), Err(UnknownTag(name.to_owned())));
    }

    #[test]
    fn all_is_distinct() {
        let mut tags = Tag::ALL.to_vec();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), Tag::COUNT);
    }
}
