//! Synthetic blood-stock generator.
//!
//! Same-shape stand-in for the live `/blood-stock` endpoint, used when no
//! backend is configured or the configured one is unreachable.

use chrono::Utc;
use rand::Rng;

use models::blood::{BloodStockEntry, BloodType, HospitalStock, LocationQuery};

struct Hospital {
    name: &'static str,
    phone: &'static str,
}

const NAIROBI_HOSPITALS: [Hospital; 3] = [
    Hospital { name: "Kenyatta National Hospital", phone: "+254 20 271 3344" },
    Hospital { name: "MP Shah Hospital", phone: "+254 20 429 4000" },
    Hospital { name: "Aga Khan University Hospital", phone: "+254 20 366 0000" },
];

const KIAMBU_HOSPITALS: [Hospital; 3] = [
    Hospital { name: "Thika Level 5 Hospital", phone: "+254 67 222 021" },
    Hospital { name: "Kiambu County Referral Hospital", phone: "+254 67 222 000" },
    Hospital { name: "Ruiru Sub-County Hospital", phone: "+254 67 222 111" },
];

// Unknown counties fall back to the Nairobi list so the results pane always
// has something to show.
fn hospitals_for(county: &str) -> &'static [Hospital] {
    match county {
        "Kiambu County" => &KIAMBU_HOSPITALS,
        _ => &NAIROBI_HOSPITALS,
    }
}

fn contact_email(name: &str) -> String {
    let local = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join(".");
    format!("{local}@health.go.ke")
}

/// Generate plausible stock for every hospital in the queried county: one
/// entry per blood type surviving the optional filter, with unit counts
/// uniform in `1..=20` and the status derived from the count.
pub fn generate_stock(query: &LocationQuery) -> Vec<HospitalStock> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    hospitals_for(&query.county)
        .iter()
        .map(|hospital| {
            let stock = BloodType::ALL
                .iter()
                .filter(|bt| query.blood_type.map_or(true, |want| want == **bt))
                .map(|bt| BloodStockEntry::new(*bt, rng.gen_range(1..=20), now))
                .collect();
            HospitalStock {
                name: hospital.name.to_string(),
                contact_phone: hospital.phone.to_string(),
                contact_email: contact_email(hospital.name),
                stock,
            }
        })
        .collect()
}
