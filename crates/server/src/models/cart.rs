//! Cart entry model and its JSON view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use basket_core::{CartEntryId, ProductName, SessionId};

/// One persisted product addition.
///
/// Entries are never updated in place: adding the same product twice stores
/// two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    /// Row identifier, assigned by the store.
    pub id: CartEntryId,
    /// Session the entry belongs to.
    pub session_id: SessionId,
    /// Product label as submitted.
    pub product_name: ProductName,
    /// Insertion time, used only for retention.
    pub last_activity: DateTime<Utc>,
}

/// JSON shape of a cart item returned by `GET /api/cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemView {
    pub product_name: String,
}

impl From<ProductName> for CartItemView {
    fn from(name: ProductName) -> Self {
        Self {
            product_name: name.into_inner(),
        }
    }
}
