// Comic record type.
// Decoded from the per-comic metadata endpoint.

use serde::{Deserialize, Serialize};

/// One comic as served by the metadata endpoint.
///
/// `month` and `year` stay strings: upstream serves them unpadded and
/// unlocalized, and nothing here does date arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub num: u32,
    pub title: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub link: String,
    pub month: String,
    pub year: String,
}
