//! Ordered list of barcode items and their print quantities
//!
//! Insertion order decides how groups appear on the sheets, so the list
//! is a plain vector with unique identifiers rather than a map.

use crate::types::{LayoutError, Result};
use log::warn;
use std::path::Path;

/// One barcode image and how many copies of it to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemList {
    items: Vec<Item>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item at the end, or update its quantity in place if the
    /// identifier is already present.
    pub fn set(&mut self, id: impl Into<String>, quantity: u32) {
        let id = id.into();
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(existing) => existing.quantity = quantity,
            None => self.items.push(Item { id, quantity }),
        }
    }

    pub fn get(&self, id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.quantity)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Remove an item, returning its quantity
    pub fn remove(&mut self, id: &str) -> Option<u32> {
        let index = self.position(id)?;
        Some(self.items.remove(index).quantity)
    }

    /// Move the item at `from` so that it ends up at index `to`.
    ///
    /// Out-of-range `to` values move the item to the end.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.items.len() {
            return Err(LayoutError::Config(format!(
                "No item at position {} (list has {})",
                from,
                self.items.len()
            )));
        }
        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Number of images the list asks for in total
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for ItemList {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        let mut list = ItemList::new();
        for (id, quantity) in iter {
            list.set(id, quantity);
        }
        list
    }
}

/// Parse a user-supplied quantity, rejecting anything that is not a
/// positive integer.
pub fn parse_quantity(id: &str, text: &str) -> Result<u32> {
    let text = text.trim();
    let value: i64 = text.parse().map_err(|_| LayoutError::UnparsableQuantity {
        id: id.to_string(),
        text: text.to_string(),
    })?;
    if value <= 0 {
        return Err(LayoutError::InvalidQuantity {
            id: id.to_string(),
            quantity: value,
        });
    }
    u32::try_from(value).map_err(|_| LayoutError::InvalidQuantity {
        id: id.to_string(),
        quantity: value,
    })
}

/// Load an item list from a CSV file with `identifier,quantity` rows.
///
/// A leading `identifier,quantity` header is skipped. Repeated identifiers
/// update the earlier entry in place.
pub async fn load_from_csv(path: impl AsRef<Path>) -> Result<ItemList> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    tokio::task::spawn_blocking(move || parse_csv(&contents)).await?
}

fn parse_csv(contents: &str) -> Result<ItemList> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(contents.as_bytes());

    let mut items = ItemList::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() < 2 {
            warn!("Skipping CSV row {}: expected identifier and quantity", row + 1);
            continue;
        }

        let id = &record[0];
        let quantity = &record[1];
        if row == 0 && quantity.eq_ignore_ascii_case("quantity") {
            continue;
        }

        items.set(id, parse_quantity(id, quantity)?);
    }

    Ok(items)
}
