use serde::{Deserialize, Serialize};

use super::InstrumentId;

/// An entry in the static instrument catalog.
///
/// `category` is a free-form tag such as "String", "Keys", "Percussion" or
/// "Voice"; `default_clef` is the clef new staves start with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub name: String,
    pub category: String,
    pub default_clef: String,
}
