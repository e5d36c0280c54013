//! Static county and constituency reference tables.
//!
//! Coverage is deliberately partial: two counties are populated and any
//! other county yields an empty list, a visible gap rather than an error.
//! Lookups are synchronous; no network round-trip is involved.

/// Counties with populated constituency data.
pub const COUNTIES: [&str; 2] = ["Nairobi City County", "Kiambu County"];

/// Blood type names in canonical wire order.
pub const BLOOD_TYPE_NAMES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

const NAIROBI: [&str; 17] = [
    "Dagoretti North",
    "Dagoretti South",
    "Lang'ata",
    "Kibra",
    "Roysambu",
    "Kasarani",
    "Ruaraka",
    "Embakasi South",
    "Embakasi North",
    "Embakasi Central",
    "Embakasi East",
    "Embakasi West",
    "Makadara",
    "Kamukunji",
    "Starehe",
    "Mathare",
    "Westlands",
];

const KIAMBU: [&str; 12] = [
    "Kiambaa",
    "Kikuyu",
    "Limuru",
    "Gatundu North",
    "Gatundu South",
    "Juja",
    "Thika Town",
    "Ruiru",
    "Githunguri",
    "Kiambu",
    "Kabete",
    "Lari",
];

/// Ordered constituency list for a county; empty for unknown counties.
pub fn constituencies(county: &str) -> &'static [&'static str] {
    match county {
        "Nairobi City County" => &NAIROBI,
        "Kiambu County" => &KIAMBU,
        _ => &[],
    }
}
