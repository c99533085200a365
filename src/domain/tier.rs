//! Six-band positioning tier and its severity score.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    HighPositive,
    MediumPositive,
    LowPositive,
    LowNegative,
    MediumNegative,
    HighNegative,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::HighPositive,
        Tier::MediumPositive,
        Tier::LowPositive,
        Tier::LowNegative,
        Tier::MediumNegative,
        Tier::HighNegative,
    ];

    /// Signed severity, +3 (high positive) to -3 (high negative). Never 0.
    pub fn severity(&self) -> i32 {
        match self {
            Tier::HighPositive => 3,
            Tier::MediumPositive => 2,
            Tier::LowPositive => 1,
            Tier::LowNegative => -1,
            Tier::MediumNegative => -2,
            Tier::HighNegative => -3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::HighPositive => "HIGH_POSITIVE",
            Tier::MediumPositive => "MEDIUM_POSITIVE",
            Tier::LowPositive => "LOW_POSITIVE",
            Tier::LowNegative => "LOW_NEGATIVE",
            Tier::MediumNegative => "MEDIUM_NEGATIVE",
            Tier::HighNegative => "HIGH_NEGATIVE",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
