//! Read-only storage port.
//!
//! Entities are kept as one JSON array per entity key, the layout the
//! browser front end writes to its key-value storage. Reporting only reads
//! from it, so the port exposes `get_all` and nothing else.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Activity, ChatMessage, Entity, Expense, Order, ProfitCalculation};

/// Key-value access to stored entity arrays.
pub trait Store {
    /// Raw JSON stored under `key`, or `None` if nothing was ever saved.
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Every stored entity of type `E`.
    ///
    /// A missing key reads as an empty list. So does a key holding JSON that
    /// does not decode, after a warning; I/O failures are returned.
    fn get_all<E: Entity>(&self) -> Result<Vec<E>>
    where
        Self: Sized,
    {
        let Some(raw) = self.get_raw(E::KEY)? else {
            debug!("no {} stored under '{}'", E::NAME, E::KEY);
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<E>>(&raw) {
            Ok(items) => {
                debug!("loaded {} {}", items.len(), E::NAME);
                Ok(items)
            }
            Err(e) => {
                warn!("Failed to load {}: {}", E::NAME, e);
                Ok(Vec::new())
            }
        }
    }
}

/// All entity lists read from a store at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub orders: Vec<Order>,
    pub activities: Vec<Activity>,
    pub expenses: Vec<Expense>,
    pub messages: Vec<ChatMessage>,
    pub profits: Vec<ProfitCalculation>,
}

impl Snapshot {
    /// Read every entity list from `store`.
    pub fn load<S: Store>(store: &S) -> Result<Self> {
        Ok(Self {
            orders: store.get_all()?,
            activities: store.get_all()?,
            expenses: store.get_all()?,
            messages: store.get_all()?,
            profits: store.get_all()?,
        })
    }
}
