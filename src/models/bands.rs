use serde::{Deserialize, Serialize};
use std::fmt;

/// Beaufort-derived wind band, ordered from calm to strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindBand {
    NoWind,
    Light,
    Gentle,
    Moderate,
    Strong,
}

impl WindBand {
    pub const ALL: [WindBand; 5] = [
        WindBand::NoWind,
        WindBand::Light,
        WindBand::Gentle,
        WindBand::Moderate,
        WindBand::Strong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindBand::NoWind => "no-wind",
            WindBand::Light => "light",
            WindBand::Gentle => "gentle",
            WindBand::Moderate => "moderate",
            WindBand::Strong => "strong",
        }
    }
}

impl fmt::Display for WindBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temperature band label, ordered from coldest to hottest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TempBand {
    ExtremeCold,
    Cool,
    Comfortable,
    Hot,
    ExtremeHeat,
}

impl TempBand {
    pub const ALL: [TempBand; 5] = [
        TempBand::ExtremeCold,
        TempBand::Cool,
        TempBand::Comfortable,
        TempBand::Hot,
        TempBand::ExtremeHeat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TempBand::ExtremeCold => "extreme-cold",
            TempBand::Cool => "cool",
            TempBand::Comfortable => "comfortable",
            TempBand::Hot => "hot",
            TempBand::ExtremeHeat => "extreme-heat",
        }
    }
}

impl fmt::Display for TempBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_labels_serialize_kebab_case() {
        assert_eq!(serde_json::to_string(&WindBand::NoWind).unwrap(), "\"no-wind\"");
        assert_eq!(
            serde_json::to_string(&TempBand::ExtremeHeat).unwrap(),
            "\"extreme-heat\""
        );
        for band in WindBand::ALL {
            assert_eq!(
                serde_json::to_string(&band).unwrap(),
                format!("\"{}\"", band.as_str())
            );
        }
    }

    #[test]
    fn test_band_ordering() {
        assert!(WindBand::NoWind < WindBand::Strong);
        assert!(TempBand::ExtremeCold < TempBand::Comfortable);
    }
}
