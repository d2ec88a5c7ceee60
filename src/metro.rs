//! Metropolitan-area definitions for batch searches.

/// One metropolitan market and the ZIP codes that cover it
#[derive(Debug, Clone, Copy)]
pub struct MetroArea {
    pub code: &'static str,
    pub name: &'static str,
    pub state: &'static str,
    pub population: u32,
    // low, medium, high, very_high
    pub density_category: &'static str,
    pub zip_codes: &'static [&'static str],
    pub market_characteristics: &'static [&'static str],
}

pub const METRO_AREAS: &[MetroArea] = &[
    MetroArea {
        code: "nyc",
        name: "New York City",
        state: "NY",
        population: 8_336_000,
        density_category: "very_high",
        zip_codes: &[
            "10001", "10002", "10003", "10004", "10005", "10006", "10007", "10009", "10010",
            "10011", "10012", "10013", "10014", "10016", "10017", "10018", "10019", "10020",
            "10021", "10022", "10023", "10024", "10025", "10026", "10027", "10028", "10029",
            "10030", "10031", "10032", "10033", "10034", "10035", "10036", "10038", "10039",
            "10040", "10044", "10065", "10069", "10075", "10128", "10280", "10282",
        ],
        market_characteristics: &["boutique-heavy", "premium-pricing", "high-turnover"],
    },
    MetroArea {
        code: "la",
        name: "Los Angeles",
        state: "CA",
        population: 3_898_000,
        density_category: "high",
        zip_codes: &[
            "90001", "90004", "90012", "90015", "90024", "90026", "90028", "90036", "90046",
            "90048", "90064", "90066", "90210", "90230", "90245", "90291", "90401", "90405",
        ],
        market_characteristics: &["celebrity-trainers", "outdoor-fitness", "wellness-focused"],
    },
    MetroArea {
        code: "chicago",
        name: "Chicago",
        state: "IL",
        population: 2_746_000,
        density_category: "high",
        zip_codes: &[
            "60601", "60602", "60603", "60604", "60605", "60606", "60607", "60610", "60611",
            "60614", "60622", "60642", "60647", "60654", "60657", "60661",
        ],
        market_characteristics: &["value-pricing", "chain-dominated", "seasonal-demand"],
    },
];

/// Look up a metro area by its code, case-insensitively
pub fn metro_area(code: &str) -> Option<&'static MetroArea> {
    METRO_AREAS
        .iter()
        .find(|m| m.code.eq_ignore_ascii_case(code.trim()))
}

/// ZIP codes for a metro area, empty when the code is unknown
pub fn metro_zip_codes(code: &str) -> Vec<String> {
    metro_area(code)
        .map(|m| m.zip_codes.iter().map(|z| z.to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metro_area_lookup() {
        let nyc = metro_area("nyc").unwrap();
        assert_eq!(nyc.name, "New York City");
        assert!(nyc.zip_codes.len() > 40);

        assert!(metro_area("NYC").is_some(), "lookup is case-insensitive");
        assert!(metro_area("atlantis").is_none());
    }

    #[test]
    fn test_metro_zip_codes() {
        let zips = metro_zip_codes("chicago");
        assert!(zips.contains(&"60601".to_string()));
        assert!(metro_zip_codes("unknown").is_empty());
    }

    #[test]
    fn test_zip_codes_are_unique_per_metro() {
        for metro in METRO_AREAS {
            let mut zips: Vec<&str> = metro.zip_codes.to_vec();
            zips.sort_unstable();
            zips.dedup();
            assert_eq!(zips.len(), metro.zip_codes.len(), "{}", metro.code);
        }
    }
}
