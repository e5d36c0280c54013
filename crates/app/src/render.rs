//! Plain-text rendering of search results: one card per hospital, one line
//! per blood-type entry with its status label.

use models::blood::HospitalStock;

pub fn render_stock(hospitals: &[HospitalStock]) -> String {
    if hospitals.is_empty() {
        return "No blood stock found for the selected location.".to_string();
    }

    let mut out = String::new();
    for hospital in hospitals {
        out.push_str(&hospital.name);
        out.push('\n');
        out.push_str(&format!("  {} | {}\n", hospital.contact_phone, hospital.contact_email));
        for entry in &hospital.stock {
            out.push_str(&format!(
                "    {:<3} {:>2} units  [{}]\n",
                entry.blood_type.as_str(),
                entry.units_available,
                entry.status.label()
            ));
        }
        out.push('\n');
    }
    out
}
