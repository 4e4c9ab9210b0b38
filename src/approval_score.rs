use std::fmt::Display;

/// An approval category together with the value given in it.
///
/// Gerrit only ever sends these as a pair, so they're stored as one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApprovalScore {
    /// The approval category, like `Code-Review` or `Verified`.
    pub category: String,
    /// The value, generally a number like `-1` or `+2`.
    pub value: String,
}

impl ApprovalScore {
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
        }
    }

    /// The value as a number, if it is one.
    pub fn numeric_value(&self) -> Option<i32> {
        self.value.trim().parse().ok()
    }

    pub fn is_positive(&self) -> bool {
        self.numeric_value().is_some_and(|value| value > 0)
    }

    pub fn is_negative(&self) -> bool {
        self.numeric_value().is_some_and(|value| value < 0)
    }
}

impl Display for ApprovalScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.category, self.value)
    }
}
