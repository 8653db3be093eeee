use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wrapper for values that must not appear in Debug output or log lines
/// (passport numbers, contact details). Serialization passes the value
/// through untouched so API responses and the stored slot keep the real
/// data; only the log macros see the mask.
#[derive(Clone, Deserialize)]
pub struct Sensitive<T>(pub T);

impl<T> Sensitive<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Sensitive<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Mask all but the last `keep` characters: `PA1234567` → `******567`.
/// Values no longer than `keep` are fully masked.
pub fn mask_tail(value: &str, keep: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= keep {
        return "*".repeat(chars.len());
    }
    let masked = "*".repeat(chars.len() - keep);
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{}{}", masked, tail)
}
