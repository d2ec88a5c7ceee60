//! Canonicalization of names, addresses, phone numbers, and URLs before
//! comparison. Every function here is pure and total: malformed or
//! placeholder input (`"N/A"`, empty) yields an empty string, never an error.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Ordered replacement table for address canonicalization. Multi-word
/// specials come first so the generic street-type rules cannot shadow them.
const ADDRESS_REPLACEMENTS: &[(&str, &str)] = &[
    // Multi-word specials
    ("avenue of the americas", "6th ave"),
    ("park avenue", "park ave"),
    ("madison avenue", "madison ave"),
    ("wall street", "wall st"),
    // Street types
    (" street", " st"),
    (" st.", " st"),
    (" avenue", " ave"),
    (" ave.", " ave"),
    (" boulevard", " blvd"),
    (" blvd.", " blvd"),
    (" road", " rd"),
    (" rd.", " rd"),
    (" drive", " dr"),
    (" dr.", " dr"),
    (" lane", " ln"),
    (" ln.", " ln"),
    (" place", " pl"),
    (" pl.", " pl"),
    (" court", " ct"),
    (" ct.", " ct"),
    (" circle", " cir"),
    (" cir.", " cir"),
    (" parkway", " pkwy"),
    (" highway", " hwy"),
    (" freeway", " fwy"),
    // Building types
    (" suite", " ste"),
    (" ste.", " ste"),
    (" apartment", " apt"),
    (" apt.", " apt"),
    (" floor", " fl"),
    (" fl.", " fl"),
    (" building", " bldg"),
    (" bldg.", " bldg"),
    (" room", " rm"),
    (" rm.", " rm"),
    (" #", " unit "),
    // Ordinals
    ("first", "1st"),
    ("second", "2nd"),
    ("third", "3rd"),
    ("fourth", "4th"),
    ("fifth", "5th"),
    ("sixth", "6th"),
    ("seventh", "7th"),
    ("eighth", "8th"),
    ("ninth", "9th"),
    ("tenth", "10th"),
    ("eleventh", "11th"),
    ("twelfth", "12th"),
    // Directionals
    (" west ", " w "),
    (" east ", " e "),
    (" north ", " n "),
    (" south ", " s "),
    (" northwest ", " nw "),
    (" northeast ", " ne "),
    (" southwest ", " sw "),
    (" southeast ", " se "),
    // Region names collapse to the state code
    ("new york", "ny"),
    ("manhattan", "ny"),
    ("brooklyn", "ny"),
    ("queens", "ny"),
    ("bronx", "ny"),
    ("staten island", "ny"),
    // Common variations
    ("&", "and"),
];

/// Legal-entity designators stripped from the end of business names
const ENTITY_SUFFIXES: &[&str] = &[
    "llc",
    "inc",
    "corp",
    "ltd",
    "co",
    "company",
    "enterprises",
    "group",
];

/// Generic business-type words stripped from the end of gym names
const BUSINESS_TYPE_SUFFIXES: &[&str] = &[
    "gym", "fitness", "center", "club", "studio", "training", "academy",
];

/// Trailing location qualifiers stripped from business names
const LOCATION_SUFFIXES: &[&str] = &[
    "downtown",
    "uptown",
    "midtown",
    "east side",
    "west side",
    "nyc",
    "ny",
    "manhattan",
    "brooklyn",
    "queens",
    "bronx",
];

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    // " - Chelsea", " – Flatiron" style qualifiers at the end of a name
    static ref DASH_QUALIFIER: Regex = Regex::new(r"\s+[-–]\s+[a-z0-9' ]+$").unwrap();
}

/// Treat placeholder values the providers emit as absent
fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a")
}

/// Canonicalize a street address for comparison.
///
/// Lowercases, collapses whitespace, applies the abbreviation table, and
/// strips punctuation except periods/commas adjacent to a digit (so unit
/// numbers like "12.5" survive). Idempotent: running it twice is a no-op.
pub fn normalize_address(address: &str) -> String {
    if is_placeholder(address) {
        return String::new();
    }

    let mut normalized = WHITESPACE
        .replace_all(address.to_lowercase().trim(), " ")
        .to_string();

    for (from, to) in ADDRESS_REPLACEMENTS {
        if normalized.contains(from) {
            normalized = normalized.replace(from, to);
        }
    }

    // Drop separators unless a digit follows (keeps "12.5" intact)
    let chars: Vec<char> = normalized.chars().collect();
    let mut stripped = String::with_capacity(normalized.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == ',' || *c == '.' {
            let digit_follows = chars.get(i + 1).map(|n| n.is_ascii_digit()).unwrap_or(false);
            if !digit_follows {
                continue;
            }
        }
        stripped.push(*c);
    }

    WHITESPACE.replace_all(stripped.trim(), " ").to_string()
}

/// Reduce a phone number to bare digits.
///
/// US numbers with a leading country code lose the `1`; anything that is
/// not a 10-digit number after that is returned as raw digits rather than
/// rejected, so international formats still compare on equality.
pub fn normalize_phone(phone: &str) -> String {
    if is_placeholder(phone) {
        return String::new();
    }

    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// Fold a business name to lowercase alphanumeric tokens.
///
/// NFKD-normalizes, drops possessive apostrophes, and replaces remaining
/// punctuation with spaces — the shared first step for name comparison.
pub fn fold_name(name: &str) -> String {
    let without_apostrophes = name
        .replace("'s ", " ")
        .replace("'s", "")
        .replace("s' ", "s ")
        .replace('\'', "");

    without_apostrophes
        .nfkd()
        .collect::<String>()
        .to_lowercase()
        .trim()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean a gym name for matching: fold, then strip trailing location
/// qualifiers, legal-entity designators, and generic business-type words.
pub fn clean_name(name: &str) -> String {
    if is_placeholder(name) {
        return String::new();
    }

    // Qualifiers like " - Tribeca" are cut before folding erases the dash
    let lowered = name.to_lowercase();
    let without_qualifier = DASH_QUALIFIER.replace(&lowered, "");
    let mut cleaned = fold_name(&without_qualifier);

    // Strip suffix tokens repeatedly: "Gold's Gym LLC" loses "llc" then "gym"
    loop {
        let before = cleaned.len();
        for suffix in ENTITY_SUFFIXES
            .iter()
            .chain(BUSINESS_TYPE_SUFFIXES)
            .chain(LOCATION_SUFFIXES)
        {
            if let Some(prefix) = cleaned.strip_suffix(suffix) {
                if prefix.is_empty() || prefix.ends_with(' ') {
                    cleaned = prefix.trim_end().to_string();
                }
            }
        }
        if cleaned.len() == before {
            break;
        }
    }

    cleaned
}

/// Extract the registrable host from a URL, without a leading `www.`.
///
/// Scheme-less input is retried as `http://` input; anything unparseable
/// yields an empty string.
pub fn extract_domain(url: &str) -> String {
    if is_placeholder(url) {
        return String::new();
    }

    let candidate = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };

    match Url::parse(&candidate) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("").to_lowercase();
            host.strip_prefix("www.").unwrap_or(&host).to_string()
        }
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address_abbreviations() {
        assert_eq!(normalize_address("123 Main Street"), "123 main st");
        assert_eq!(normalize_address("456 Fifth Avenue"), "456 5th ave");
        assert_eq!(
            normalize_address("10 Hudson Boulevard, Suite 200"),
            "10 hudson blvd ste 200"
        );
        assert_eq!(
            normalize_address("350 First Avenue, New York, NY 10010"),
            "350 1st ave ny ny 10010"
        );
    }

    #[test]
    fn test_normalize_address_placeholders() {
        assert_eq!(normalize_address(""), "");
        assert_eq!(normalize_address("N/A"), "");
        assert_eq!(normalize_address("  n/a  "), "");
    }

    #[test]
    fn test_normalize_address_idempotent() {
        let inputs = [
            "123 Main Street",
            "22 West 19th Street, 3rd Floor",
            "1 Wall Street, Manhattan",
            "301 Avenue of the Americas",
        ];
        for input in inputs {
            let once = normalize_address(input);
            assert_eq!(normalize_address(&once), once, "not idempotent: {input}");
        }
    }

    #[test]
    fn test_normalize_phone_us_formats() {
        assert_eq!(normalize_phone("(555) 123-4567"), "5551234567");
        assert_eq!(normalize_phone("1-555-123-4567"), "5551234567");
        assert_eq!(normalize_phone("+1 555 123 4567"), "5551234567");
        assert_eq!(normalize_phone("555.123.4567"), "5551234567");
    }

    #[test]
    fn test_normalize_phone_unusual_formats_pass_through() {
        // Not forced to 10 digits: international and short numbers stay raw
        assert_eq!(normalize_phone("+44 20 7946 0958"), "442079460958");
        assert_eq!(normalize_phone("123-4567"), "1234567");
        assert_eq!(normalize_phone("N/A"), "");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_clean_name_strips_suffixes() {
        assert_eq!(clean_name("Planet Fitness"), "planet");
        assert_eq!(clean_name("Iron Temple Gym LLC"), "iron temple");
        assert_eq!(clean_name("CrossFit SoHo Training"), "crossfit soho");
        assert_eq!(clean_name("Tiger Schulmann's Martial Arts"), "tiger schulmann martial arts");
    }

    #[test]
    fn test_clean_name_strips_location_qualifiers() {
        assert_eq!(clean_name("Equinox - Tribeca"), "equinox");
        assert_eq!(clean_name("Crunch Fitness Midtown"), "crunch");
        assert_eq!(clean_name("Blink Fitness NYC"), "blink");
    }

    #[test]
    fn test_clean_name_never_errors_on_generic_input() {
        // A name that is nothing but suffix tokens cleans to empty
        assert_eq!(clean_name("Fitness Center"), "");
        assert_eq!(clean_name(""), "");
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://www.planetfitness.com/gyms/chelsea"),
            "planetfitness.com"
        );
        assert_eq!(extract_domain("equinox.com/clubs"), "equinox.com");
        assert_eq!(
            extract_domain("https://www.yelp.com/biz/some-gym"),
            "yelp.com"
        );
        assert_eq!(extract_domain("not a url at all"), "");
        assert_eq!(extract_domain("N/A"), "");
    }
}
