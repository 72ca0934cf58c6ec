/// The service package a visitor is asking about.
#[derive(Debug, Clone, PartialEq)]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
    NotSure,
    /// Anything outside the known codes, kept verbatim.
    Other(String),
}

impl Tier {
    pub fn parse(s: String) -> Tier {
        match s.as_str() {
            "tier1" => Tier::Tier1,
            "tier2" => Tier::Tier2,
            "tier3" => Tier::Tier3,
            "not-sure" => Tier::NotSure,
            _ => Tier::Other(s),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Tier::Tier1 => "tier1",
            Tier::Tier2 => "tier2",
            Tier::Tier3 => "tier3",
            Tier::NotSure => "not-sure",
            Tier::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Tier::Tier1 => "Tier 1: Traditional Visibility ($1,500)",
            Tier::Tier2 => "Tier 2: AI Recommendation ($3,000)",
            Tier::Tier3 => "Tier 3: Omnipresence ($5,000)",
            Tier::NotSure => "Not sure yet",
            Tier::Other(raw) => raw,
        }
    }
}
