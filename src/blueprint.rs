//! Static exam-blueprint catalog.
//!
//! Maps blueprint system identifiers to the share of exam content they carry, plus
//! the legacy free-text names older records used for the same systems.

/// Catalog revision; bump when percentages or identifiers change.
pub const BLUEPRINT_VERSION: &str = "2024.1";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlueprintSystem {
    pub id: &'static str,
    pub name: &'static str,
    /// Midpoint of the published content range, in percent.
    pub percent: f64,
}

pub const SYSTEMS: &[BlueprintSystem] = &[
    BlueprintSystem { id: "general-principles", name: "General Principles", percent: 14.0 },
    BlueprintSystem { id: "behavioral-health", name: "Behavioral Health", percent: 8.0 },
    BlueprintSystem { id: "nervous-system", name: "Nervous System & Special Senses", percent: 10.0 },
    BlueprintSystem { id: "skin", name: "Skin & Subcutaneous Tissue", percent: 5.0 },
    BlueprintSystem { id: "musculoskeletal", name: "Musculoskeletal System", percent: 7.0 },
    BlueprintSystem { id: "cardiovascular", name: "Cardiovascular System", percent: 11.0 },
    BlueprintSystem { id: "respiratory", name: "Respiratory System", percent: 9.0 },
    BlueprintSystem { id: "renal", name: "Renal & Urinary System", percent: 8.0 },
    BlueprintSystem { id: "gastrointestinal", name: "Gastrointestinal System", percent: 8.0 },
    BlueprintSystem { id: "reproductive", name: "Reproductive System", percent: 6.0 },
    BlueprintSystem { id: "endocrine", name: "Endocrine System", percent: 7.0 },
    BlueprintSystem { id: "blood-immune", name: "Blood & Lymphoreticular/Immune", percent: 9.0 },
    BlueprintSystem { id: "multisystem", name: "Multisystem Processes & Disorders", percent: 7.0 },
    BlueprintSystem { id: "biostatistics", name: "Biostatistics & Epidemiology", percent: 6.0 },
    BlueprintSystem { id: "social-sciences", name: "Social Sciences", percent: 8.0 },
];

/// Legacy system labels, lowercased, to current identifiers.
const LEGACY_NAMES: &[(&str, &str)] = &[
    ("cardio", "cardiovascular"),
    ("cardiovascular", "cardiovascular"),
    ("cardiology", "cardiovascular"),
    ("renal", "renal"),
    ("nephrology", "renal"),
    ("pulm", "respiratory"),
    ("pulmonary", "respiratory"),
    ("respiratory", "respiratory"),
    ("gi", "gastrointestinal"),
    ("gastro", "gastrointestinal"),
    ("neuro", "nervous-system"),
    ("neurology", "nervous-system"),
    ("psych", "behavioral-health"),
    ("psychiatry", "behavioral-health"),
    ("heme", "blood-immune"),
    ("heme/onc", "blood-immune"),
    ("hematology", "blood-immune"),
    ("immunology", "blood-immune"),
    ("repro", "reproductive"),
    ("reproductive", "reproductive"),
    ("endo", "endocrine"),
    ("endocrine", "endocrine"),
    ("msk", "musculoskeletal"),
    ("derm", "skin"),
    ("dermatology", "skin"),
    ("biostats", "biostatistics"),
    ("epidemiology", "biostatistics"),
    ("ethics", "social-sciences"),
    ("biochem", "general-principles"),
    ("biochemistry", "general-principles"),
    ("pharm", "general-principles"),
    ("pharmacology", "general-principles"),
    ("micro", "general-principles"),
    ("microbiology", "general-principles"),
    ("genetics", "general-principles"),
    ("pathology", "general-principles"),
];

/// Resolves an id, display name, or legacy label to a catalog entry.
pub fn resolve_system(name: &str) -> Option<&'static BlueprintSystem> {
    let needle = name.trim();
    if let Some(system) = SYSTEMS.iter().find(|s| s.id == needle) {
        return Some(system);
    }

    let lowered = needle.to_ascii_lowercase();
    if let Some(system) = SYSTEMS
        .iter()
        .find(|s| s.name.to_ascii_lowercase() == lowered)
    {
        return Some(system);
    }

    LEGACY_NAMES
        .iter()
        .find(|(legacy, _)| *legacy == lowered)
        .and_then(|(_, id)| SYSTEMS.iter().find(|s| s.id == *id))
}

fn max_percent() -> f64 {
    SYSTEMS.iter().map(|s| s.percent).fold(0.0, f64::max)
}

impl BlueprintSystem {
    /// Weight relative to an even split across all systems (1.0 = average).
    pub fn multiplier(&self) -> f64 {
        let even_share = 100.0 / SYSTEMS.len() as f64;
        self.percent / even_share
    }

    /// Weight scaled so the heaviest system is 1.0.
    pub fn normalized(&self) -> f64 {
        let max = max_percent();
        if max <= 0.0 {
            return 0.0;
        }
        (self.percent / max).clamp(0.0, 1.0)
    }
}

/// Normalized exam weight for `system`, or `default` when it is not in the catalog.
pub fn exam_weight(system: &str, default: f64) -> f64 {
    resolve_system(system)
        .map(BlueprintSystem::normalized)
        .unwrap_or(default)
}
