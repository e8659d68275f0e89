//! Built-in gazetteer of Saudi cities.
//!
//! Names are stored lowercase. Arabic spellings come first, then Latin
//! transliterations. Lookup is first-match containment in table order, so
//! entries whose names could appear inside a longer address are ordered
//! before the generic ones.

use super::types::{Coordinates, LocationSource, ResolvedLocation};
use serde::Serialize;

struct GazetteerCity {
    names: &'static [&'static str], // arabic first, then latin
    canonical: &'static str,
    lat: f64,
    lng: f64,
}

const GAZETTEER: &[GazetteerCity] = &[
    GazetteerCity {
        names: &["الرياض", "riyadh", "riyad", "ar riyad"],
        canonical: "riyadh",
        lat: 24.7136, lng: 46.6753,
    },
    GazetteerCity {
        names: &["جدة", "جده", "jeddah", "jiddah", "jedda"],
        canonical: "jeddah",
        lat: 21.4858, lng: 39.1925,
    },
    GazetteerCity {
        names: &["مكة", "مكه", "makkah", "mecca", "makka"],
        canonical: "makkah",
        lat: 21.4225, lng: 39.8262,
    },
    GazetteerCity {
        names: &["المدينة المنورة", "madinah", "medina", "al-madinah"],
        canonical: "madinah",
        lat: 24.4686, lng: 39.6142,
    },
    GazetteerCity {
        names: &["الدمام", "dammam"],
        canonical: "dammam",
        lat: 26.4207, lng: 50.0888,
    },
    GazetteerCity {
        names: &["الخبر", "khobar"],
        canonical: "khobar",
        lat: 26.2172, lng: 50.1971,
    },
    GazetteerCity {
        names: &["الظهران", "dhahran"],
        canonical: "dhahran",
        lat: 26.2361, lng: 50.0393,
    },
    GazetteerCity {
        names: &["الطائف", "taif", "ta'if"],
        canonical: "taif",
        lat: 21.2703, lng: 40.4158,
    },
    GazetteerCity {
        names: &["تبوك", "tabuk"],
        canonical: "tabuk",
        lat: 28.3838, lng: 36.5550,
    },
    GazetteerCity {
        names: &["بريدة", "buraidah", "buraydah"],
        canonical: "buraidah",
        lat: 26.3260, lng: 43.9750,
    },
    GazetteerCity {
        names: &["خميس مشيط", "khamis mushait", "khamis mushayt"],
        canonical: "khamis mushait",
        lat: 18.3000, lng: 42.7333,
    },
    GazetteerCity {
        names: &["أبها", "ابها", "abha"],
        canonical: "abha",
        lat: 18.2164, lng: 42.5053,
    },
    GazetteerCity {
        names: &["حائل", "hail", "ha'il"],
        canonical: "hail",
        lat: 27.5114, lng: 41.7208,
    },
    GazetteerCity {
        names: &["نجران", "najran"],
        canonical: "najran",
        lat: 17.4924, lng: 44.1277,
    },
    GazetteerCity {
        names: &["جازان", "جيزان", "jazan", "jizan", "gizan"],
        canonical: "jazan",
        lat: 16.8892, lng: 42.5511,
    },
    GazetteerCity {
        names: &["ينبع", "yanbu"],
        canonical: "yanbu",
        lat: 24.0895, lng: 38.0618,
    },
    GazetteerCity {
        names: &["الأحساء", "الاحساء", "الهفوف", "al ahsa", "al-ahsa", "hofuf"],
        canonical: "al ahsa",
        lat: 25.3833, lng: 49.5833,
    },
    GazetteerCity {
        names: &["الجبيل", "jubail"],
        canonical: "jubail",
        lat: 27.0046, lng: 49.6460,
    },
    GazetteerCity {
        names: &["القطيف", "qatif"],
        canonical: "qatif",
        lat: 26.5196, lng: 50.0115,
    },
    GazetteerCity {
        names: &["الخرج", "kharj"],
        canonical: "al kharj",
        lat: 24.1556, lng: 47.3120,
    },
    GazetteerCity {
        names: &["عرعر", "arar"],
        canonical: "arar",
        lat: 30.9753, lng: 41.0381,
    },
    GazetteerCity {
        names: &["سكاكا", "sakaka", "skaka"],
        canonical: "sakaka",
        lat: 29.9697, lng: 40.2064,
    },
    GazetteerCity {
        names: &["الباحة", "al baha", "al-baha"],
        canonical: "al baha",
        lat: 20.0129, lng: 41.4677,
    },
];

/// Normalize an address for matching: trimmed and lowercased.
pub fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Find the first gazetteer city whose name appears in `address`.
pub fn lookup(address: &str) -> Option<ResolvedLocation> {
    let q = normalize(address);
    if q.is_empty() {
        return None;
    }

    GAZETTEER
        .iter()
        .find(|city| city.names.iter().any(|name| q.contains(name)))
        .map(to_resolved)
}

fn to_resolved(city: &GazetteerCity) -> ResolvedLocation {
    ResolvedLocation {
        coordinates: Coordinates {
            lat: city.lat,
            lng: city.lng,
        },
        name: Some(city.canonical.to_string()),
        source: LocationSource::Gazetteer,
    }
}

/// A gazetteer entry for the public city list API.
#[derive(Debug, Clone, Serialize)]
pub struct CityInfo {
    pub name: String,
    pub name_ar: String,
    pub lat: f64,
    pub lng: f64,
}

/// Return the full gazetteer (for autocomplete / API).
pub fn city_list() -> Vec<CityInfo> {
    GAZETTEER
        .iter()
        .map(|c| CityInfo {
            name: c.canonical.to_string(),
            name_ar: c.names[0].to_string(),
            lat: c.lat,
            lng: c.lng,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_arabic_neighbourhood_address() {
        let loc = lookup("حي العليا، الرياض").unwrap();
        assert_eq!(loc.name.as_deref(), Some("riyadh"));
        assert_eq!(loc.source, LocationSource::Gazetteer);
        assert_abs_diff_eq!(loc.coordinates.lat, 24.7136, epsilon = 1e-9);
        assert_abs_diff_eq!(loc.coordinates.lng, 46.6753, epsilon = 1e-9);
    }

    #[test]
    fn test_latin_case_insensitive() {
        let loc = lookup("Jeddah downtown").unwrap();
        assert_eq!(loc.name.as_deref(), Some("jeddah"));

        let loc = lookup("  AL KHOBAR corniche ").unwrap();
        assert_eq!(loc.name.as_deref(), Some("khobar"));
    }

    #[test]
    fn test_alternate_spellings() {
        assert_eq!(lookup("mecca").unwrap().name.as_deref(), Some("makkah"));
        assert_eq!(lookup("حي الشاطئ، جده").unwrap().name.as_deref(), Some("jeddah"));
        assert_eq!(lookup("الهفوف").unwrap().name.as_deref(), Some("al ahsa"));
    }

    #[test]
    fn test_first_match_wins() {
        // Both cities appear; table order decides.
        let loc = lookup("from Dammam to Riyadh").unwrap();
        assert_eq!(loc.name.as_deref(), Some("riyadh"));
    }

    #[test]
    fn test_not_found() {
        assert!(lookup("12 Baker Street").is_none());
        assert!(lookup("   ").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_names_are_lowercase() {
        for city in GAZETTEER {
            for name in city.names {
                assert_eq!(*name, name.to_lowercase());
            }
            let coords = Coordinates::new(city.lat, city.lng).unwrap();
            assert!(coords.in_saudi_arabia(), "{} outside box", city.canonical);
        }
    }

    #[test]
    fn test_city_list() {
        let cities = city_list();
        assert!(cities.len() >= 20);
        assert_eq!(cities[0].name, "riyadh");
        assert_eq!(cities[0].name_ar, "الرياض");
    }
}
