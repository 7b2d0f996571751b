use anyhow::{Context, Result};
use log::info;
use rusqlite::params;

use super::Database;

/// One row of the built-in instrument catalog.
struct SeedInstrument {
    /// Pinned rowid, or `None` to let SQLite assign one.
    id: Option<i64>,
    name: &'static str,
    category: &'static str,
    default_clef: &'static str,
}

/// Catalog inserted into an empty `instruments` table, in insertion order.
///
/// Electric Guitar is pinned to id 1 because default tracks reference it.
const SEED_INSTRUMENTS: &[SeedInstrument] = &[
    SeedInstrument {
        id: Some(1),
        name: "Electric Guitar",
        category: "String",
        default_clef: "treble",
    },
    SeedInstrument {
        id: None,
        name: "Bass",
        category: "String",
        default_clef: "bass",
    },
    SeedInstrument {
        id: None,
        name: "Piano",
        category: "Keys",
        default_clef: "treble",
    },
    SeedInstrument {
        id: None,
        name: "Drums",
        category: "Percussion",
        default_clef: "percussion",
    },
    SeedInstrument {
        id: None,
        name: "Vocals",
        category: "Voice",
        default_clef: "treble",
    },
];

impl Database {
    /// Seeds the instrument catalog if the table is empty.
    ///
    /// Any existing instrument row, whatever it is, counts as already seeded.
    /// The inserts share one transaction so a failure never leaves a partial
    /// catalog behind. Returns the number of rows inserted.
    pub fn seed_instruments(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM instruments", [], |row| row.get(0))
            .context("failed to count instruments")?;

        if count > 0 {
            return Ok(0);
        }

        info!("Seeding initial instruments...");

        let tx = self
            .conn
            .unchecked_transaction()
            .context("failed to begin seed transaction")?;

        for instrument in SEED_INSTRUMENTS {
            tx.execute(
                "INSERT INTO instruments (id, name, type, default_clef) VALUES (?1, ?2, ?3, ?4)",
                params![
                    instrument.id,
                    instrument.name,
                    instrument.category,
                    instrument.default_clef
                ],
            )
            .with_context(|| format!("failed to seed instrument '{}'", instrument.name))?;
        }

        tx.commit().context("failed to commit instrument seed")?;

        Ok(SEED_INSTRUMENTS.len())
    }
}
