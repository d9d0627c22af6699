/// Job name constants to ensure consistency across the codebase.
/// These constants define the names accepted by the CLI job filter and the
/// keys the transform registry is built from.

// Job names (used in CLI filters and the registry)
pub const INDUSTRY_JOB: &str = "industry";
pub const OCCUPATION_JOB: &str = "occupation";
pub const TARIFF_JOB: &str = "tariff";
pub const INDUSTRY_OCCUPATION_JOB: &str = "industry_occupation";
pub const VOCABULARY_JOB: &str = "vocabulary";

// Authority namespaces stamped onto emitted records
pub const INDUSTRY_NS: &str = "census.gov";
pub const OCCUPATION_NS: &str = "bls.gov";
pub const TARIFF_NS: &str = "usitc.gov";
pub const VOCABULARY_NS: &str = "schema.org";

// Relationship types
pub const CHILD_OF: &str = "child_of";
pub const EMPLOYED_IN: &str = "employed_in";

/// Get all supported job names, in the order the `--all` flag runs them
pub fn supported_jobs() -> Vec<&'static str> {
    vec![
        INDUSTRY_JOB,
        OCCUPATION_JOB,
        TARIFF_JOB,
        INDUSTRY_OCCUPATION_JOB,
        VOCABULARY_JOB,
    ]
}
