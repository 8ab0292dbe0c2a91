use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A closed set of options that the form offers in a select control.
///
/// Every variant has exactly one display string; that string is both what the
/// UI shows and what travels over the wire.
pub trait Vocabulary: Sized + Copy + 'static {
    /// All options, in the order the form lists them
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.iter().copied().find(|option| option.as_str() == value)
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::as_str).collect()
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Vocabulary for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$name as Vocabulary>::parse(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "unknown {}: {}",
                        stringify!($name),
                        raw
                    ))
                })
            }
        }
    };
}

vocabulary! {
    /// IPL franchises
    pub enum Team {
        MumbaiIndians => "Mumbai Indians",
        ChennaiSuperKings => "Chennai Super Kings",
        RoyalChallengersBangalore => "Royal Challengers Bangalore",
        DelhiCapitals => "Delhi Capitals",
        KolkataKnightRiders => "Kolkata Knight Riders",
        PunjabKings => "Punjab Kings",
        RajasthanRoyals => "Rajasthan Royals",
        SunrisersHyderabad => "Sunrisers Hyderabad",
        GujaratTitans => "Gujarat Titans",
        LucknowSuperGiants => "Lucknow Super Giants",
    }
}

vocabulary! {
    /// IPL home grounds
    pub enum Venue {
        WankhedeStadium => "Wankhede Stadium",
        ChidambaramStadium => "M. A. Chidambaram Stadium",
        ChinnaswamyStadium => "M. Chinnaswamy Stadium",
        ArunJaitleyStadium => "Arun Jaitley Stadium",
        EdenGardens => "Eden Gardens",
        PcaStadium => "PCA Stadium",
        SawaiMansinghStadium => "Sawai Mansingh Stadium",
        RajivGandhiStadium => "Rajiv Gandhi International Stadium",
        NarendraModiStadium => "Narendra Modi Stadium",
        EkanaStadium => "Ekana Cricket Stadium",
    }
}

vocabulary! {
    pub enum Weather {
        Clear => "Clear",
        Overcast => "Overcast",
        Humid => "Humid",
        Windy => "Windy",
    }
}

vocabulary! {
    pub enum DayNight {
        Day => "Day",
        DayNight => "Day-Night",
        Night => "Night",
    }
}

vocabulary! {
    pub enum MatchType {
        League => "League",
        Qualifier => "Qualifier",
        Eliminator => "Eliminator",
        Final => "Final",
    }
}

vocabulary! {
    pub enum TossDecision {
        Bat => "Bat",
        Bowl => "Bowl",
    }
}

/// Every vocabulary the form renders, keyed by the field that uses it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionCatalog {
    pub teams: Vec<&'static str>,
    pub venues: Vec<&'static str>,
    pub weather: Vec<&'static str>,
    pub day_night: Vec<&'static str>,
    pub match_types: Vec<&'static str>,
    pub toss_decisions: Vec<&'static str>,
    pub innings: Vec<u8>,
}

pub fn option_catalog() -> OptionCatalog {
    OptionCatalog {
        teams: Team::names(),
        venues: Venue::names(),
        weather: Weather::names(),
        day_night: DayNight::names(),
        match_types: MatchType::names(),
        toss_decisions: TossDecision::names(),
        innings: vec![1, 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(Team::ALL.len(), 10);
        assert_eq!(Venue::ALL.len(), 10);
        assert_eq!(Weather::ALL.len(), 4);
        assert_eq!(DayNight::ALL.len(), 3);
        assert_eq!(MatchType::ALL.len(), 4);
        assert_eq!(TossDecision::ALL.len(), 2);
    }

    #[test]
    fn test_parse_is_exact_after_trim() {
        assert_eq!(Team::parse(" Punjab Kings "), Some(Team::PunjabKings));
        assert_eq!(Team::parse("punjab kings"), None);
        assert_eq!(DayNight::parse("Day-Night"), Some(DayNight::DayNight));
        assert_eq!(Venue::parse("Lord's"), None);
    }

    #[test]
    fn test_serde_uses_display_strings() {
        let json = serde_json::to_string(&Venue::ChidambaramStadium).unwrap();
        assert_eq!(json, "\"M. A. Chidambaram Stadium\"");

        let team: Team = serde_json::from_str("\"Gujarat Titans\"").unwrap();
        assert_eq!(team, Team::GujaratTitans);

        assert!(serde_json::from_str::<Weather>("\"Snow\"").is_err());
    }

    #[test]
    fn test_option_catalog_order() {
        let catalog = option_catalog();
        assert_eq!(catalog.teams.first(), Some(&"Mumbai Indians"));
        assert_eq!(catalog.teams.last(), Some(&"Lucknow Super Giants"));
        assert_eq!(catalog.day_night, vec!["Day", "Day-Night", "Night"]);
    }
}
