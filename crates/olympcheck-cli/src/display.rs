//! Vertical card display for diploma results.

use std::fmt::Write;

use olympcheck_core::DiplomaResult;

// ── Public API ──

/// Render one diploma as a card: header, diploma fields, eligibility section.
pub fn render_card(d: &DiplomaResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ({}) ===", d.olympiad, d.year);
    let _ = writeln!(out, "{}", d.description);
    let _ = writeln!(out);

    let _ = writeln!(out, "Diploma");
    field(&mut out, "speciality", &d.speciality);
    field(&mut out, "level", &d.level.to_string());
    field(&mut out, "degree", &d.result.to_string());
    field(&mut out, "form", &d.form.to_string());
    field(&mut out, "link", &d.link);
    let eligible: Vec<&str> = d.eligible_at().collect();
    if !eligible.is_empty() {
        field(&mut out, "benefit at", &eligible.join(", "));
    }
    let _ = writeln!(out);

    if !d.eligibility.is_empty() {
        let _ = writeln!(out, "Eligibility");
        for (institution, ok) in &d.eligibility {
            field(&mut out, institution, if *ok { "yes" } else { "no" });
        }
        let _ = writeln!(out);
    }
    out
}

// ── Rendering helpers ──

fn field(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "  {:<26} {}", name, value);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn diploma() -> DiplomaResult {
        let mut eligibility = BTreeMap::new();
        eligibility.insert("МГУ".to_string(), true);
        eligibility.insert("МФТИ".to_string(), false);
        DiplomaResult {
            hashed: "echo".into(),
            description: r#"№5. "Турнир городов" ("математика"), 2 уровень. Диплом 1 степени."#
                .into(),
            olympiad: "Турнир городов".into(),
            speciality: "математика".into(),
            level: 2,
            result: 1,
            link: "https://example.test/white.pdf".into(),
            form: 11,
            year: 2024,
            eligibility,
        }
    }

    #[test]
    fn card_header_and_fields() {
        let card = render_card(&diploma());
        assert!(card.starts_with("=== Турнир городов (2024) ===\n"));
        assert!(card.contains(&format!("  {:<26} математика\n", "speciality")));
        assert!(card.contains(&format!("  {:<26} 2\n", "level")));
        assert!(card.contains(&format!("  {:<26} https://example.test/white.pdf\n", "link")));
    }

    #[test]
    fn eligibility_section() {
        let card = render_card(&diploma());
        assert!(card.contains("Eligibility\n"));
        assert!(card.contains(&format!("  {:<26} yes\n", "МГУ")));
        assert!(card.contains(&format!("  {:<26} no\n", "МФТИ")));
        assert!(card.contains(&format!("  {:<26} МГУ\n", "benefit at")));
    }

    #[test]
    fn no_eligibility_section_without_tables() {
        let mut d = diploma();
        d.eligibility.clear();
        assert!(!render_card(&d).contains("Eligibility"));
    }
}
