//! Display language, currency formatting and trip labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    /// Language code sent to the maps services.
    pub fn code(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    pub fn default_currency(self) -> CurrencyFormat {
        match self {
            Self::Ar => CurrencyFormat {
                symbol: "ر.س".into(),
                position: SymbolPosition::Suffix,
                space_between: true,
            },
            Self::En => CurrencyFormat {
                symbol: "SAR".into(),
                position: SymbolPosition::Prefix,
                space_between: true,
            },
        }
    }

    fn km_unit(self) -> &'static str {
        match self {
            Self::Ar => "كم",
            Self::En => "km",
        }
    }

    fn minutes_unit(self) -> &'static str {
        match self {
            Self::Ar => "دقيقة",
            Self::En => "mins",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "arabic" => Ok(Self::Ar),
            "en" | "english" => Ok(Self::En),
            other => Err(format!("Unknown language '{}'. Use 'ar' or 'en'.", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    pub symbol: String,
    pub position: SymbolPosition,
    pub space_between: bool,
}

impl CurrencyFormat {
    /// Render an amount with the shortest decimal form (`12.5`, `10`, `16.34`).
    pub fn format(&self, amount: f64) -> String {
        let sep = if self.space_between { " " } else { "" };
        match self.position {
            SymbolPosition::Prefix => format!("{}{}{}", self.symbol, sep, amount),
            SymbolPosition::Suffix => format!("{}{}{}", amount, sep, self.symbol),
        }
    }
}

/// `"5.0 km"` / `"5.0 كم"`.
pub fn distance_label(distance_meters: f64, language: Language) -> String {
    format!("{:.1} {}", distance_meters / 1000.0, language.km_unit())
}

/// `"30 mins"` / `"30 دقيقة"`.
pub fn duration_label(minutes: u32, language: Language) -> String {
    format!("{} {}", minutes, language.minutes_unit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_suffix_with_space() {
        let fmt = CurrencyFormat {
            symbol: "ر.س".into(),
            position: SymbolPosition::Suffix,
            space_between: true,
        };
        assert_eq!(fmt.format(12.5), "12.5 ر.س");
        assert_eq!(Language::Ar.default_currency(), fmt);
    }

    #[test]
    fn test_english_prefix() {
        let fmt = Language::En.default_currency();
        assert_eq!(fmt.format(16.0), "SAR 16");
        assert_eq!(fmt.format(26.34), "SAR 26.34");
    }

    #[test]
    fn test_no_space() {
        let fmt = CurrencyFormat {
            symbol: "$".into(),
            position: SymbolPosition::Prefix,
            space_between: false,
        };
        assert_eq!(fmt.format(10.0), "$10");
    }

    #[test]
    fn test_currency_format_json_shape() {
        let fmt: CurrencyFormat =
            serde_json::from_str(r#"{"symbol":"ر.س","position":"suffix","spaceBetween":true}"#).unwrap();
        assert_eq!(fmt, Language::Ar.default_currency());
    }

    #[test]
    fn test_labels() {
        assert_eq!(distance_label(5000.0, Language::En), "5.0 km");
        assert_eq!(distance_label(12_345.0, Language::Ar), "12.3 كم");
        assert_eq!(duration_label(30, Language::En), "30 mins");
        assert_eq!(duration_label(15, Language::Ar), "15 دقيقة");
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("AR".parse::<Language>(), Ok(Language::Ar));
        assert_eq!("english".parse::<Language>(), Ok(Language::En));
        assert!("fr".parse::<Language>().is_err());
    }
}
