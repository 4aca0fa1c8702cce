//! Editable size tally
//!
//! The sheet holds one row per (player, size) pair, grouped under the size
//! chart. Loading expands persisted [`SizeGroup`]s into rows; saving collapses
//! every row back into its own single-size group. The two are not inverses:
//! a player with several sizes comes back as several groups.

use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::WizardError;
use crate::core::sizes::{SizeGroup, SizeLabel, SizeQuantities};
use crate::store::OrderStore;

/// Default limit on player name length, in characters
pub const DEFAULT_PLAYER_NAME_MAX_LEN: usize = 14;

/// One editable row of the tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRow {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub size: SizeLabel,
    pub quantity: u32,
}

/// In-memory working copy of an order's size groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeTally {
    groups: IndexMap<SizeLabel, Vec<SizeRow>>,
    show_player_names: bool,
    #[serde(skip)]
    player_name_max_len: usize,
    dirty: bool,
}

impl SizeTally {
    /// An empty sheet for the given chart
    pub fn new(chart: &[SizeLabel], player_name_max_len: usize) -> Self {
        Self {
            groups: chart.iter().map(|label| (label.clone(), Vec::new())).collect(),
            show_player_names: false,
            player_name_max_len,
            dirty: false,
        }
    }

    /// Expand persisted groups into one row per non-zero size.
    ///
    /// Rows get fresh ids; a group with three sizes yields three rows sharing
    /// its player name. Named mode is on when any group carries a name.
    pub fn expand(groups: &[SizeGroup], chart: &[SizeLabel], player_name_max_len: usize) -> Self {
        let mut tally = Self::new(chart, player_name_max_len);
        tally.show_player_names = groups
            .iter()
            .any(|g| g.player_name.as_deref().is_some_and(|n| !n.is_empty()));

        for group in groups {
            for (label, quantity) in group.sizes.non_zero() {
                tally
                    .groups
                    .entry(label.clone())
                    .or_default()
                    .push(SizeRow {
                        id: Uuid::new_v4(),
                        player_name: group.player_name.clone(),
                        size: label.clone(),
                        quantity,
                    });
            }
        }
        tally
    }

    /// One single-size group per row, in chart order.
    ///
    /// Player names are kept only in named mode. Row ids become group ids.
    pub fn collapse(&self) -> Vec<SizeGroup> {
        let chart: Vec<SizeLabel> = self.groups.keys().cloned().collect();
        self.rows()
            .map(|row| SizeGroup {
                id: row.id,
                player_name: if self.show_player_names {
                    Some(row.player_name.clone().unwrap_or_default())
                } else {
                    None
                },
                sizes: SizeQuantities::single(&chart, &row.size, row.quantity),
            })
            .collect()
    }

    /// Collapse into the current order and clear the dirty flag
    pub fn save(&mut self, store: &mut OrderStore) -> Result<bool, WizardError> {
        let saved = store.update_sizes(self.collapse())?;
        if saved {
            self.dirty = false;
        }
        Ok(saved)
    }

    pub fn rows(&self) -> impl Iterator<Item = &SizeRow> {
        self.groups.values().flatten()
    }

    pub fn rows_for(&self, size: &SizeLabel) -> &[SizeRow] {
        self.groups.get(size).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn row(&self, id: Uuid) -> Option<&SizeRow> {
        self.rows().find(|row| row.id == id)
    }

    fn row_mut(&mut self, id: Uuid) -> Option<&mut SizeRow> {
        self.groups.values_mut().flatten().find(|row| row.id == id)
    }

    pub fn add_row(&mut self, size: SizeLabel) -> Uuid {
        let row = SizeRow {
            id: Uuid::new_v4(),
            player_name: self.show_player_names.then(String::new),
            size: size.clone(),
            quantity: 0,
        };
        let id = row.id;
        self.groups.entry(size).or_default().push(row);
        self.dirty = true;
        id
    }

    pub fn remove_row(&mut self, id: Uuid) -> bool {
        for rows in self.groups.values_mut() {
            if let Some(index) = rows.iter().position(|row| row.id == id) {
                rows.remove(index);
                self.dirty = true;
                return true;
            }
        }
        false
    }

    pub fn set_quantity(&mut self, id: Uuid, quantity: u32) -> bool {
        self.edit_row(id, |row| row.quantity = quantity)
    }

    pub fn increment(&mut self, id: Uuid) -> bool {
        self.edit_row(id, |row| row.quantity = row.quantity.saturating_add(1))
    }

    /// Never goes below zero
    pub fn decrement(&mut self, id: Uuid) -> bool {
        self.edit_row(id, |row| row.quantity = row.quantity.saturating_sub(1))
    }

    /// Names longer than the limit are cut at the limit
    pub fn set_player_name(&mut self, id: Uuid, name: &str) -> bool {
        let name: String = name.chars().take(self.player_name_max_len).collect();
        self.edit_row(id, |row| row.player_name = Some(name))
    }

    fn edit_row(&mut self, id: Uuid, edit: impl FnOnce(&mut SizeRow)) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                edit(row);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Flip named mode, resetting every row's name.
    ///
    /// Nothing is persisted until the next save.
    pub fn toggle_player_names(&mut self) -> bool {
        self.show_player_names = !self.show_player_names;
        let reset = self.show_player_names.then(String::new);
        for row in self.groups.values_mut().flatten() {
            row.player_name = reset.clone();
        }
        self.dirty = true;
        self.show_player_names
    }

    pub fn show_player_names(&self) -> bool {
        self.show_player_names
    }

    pub fn total_quantity(&self) -> u32 {
        self.rows().map(|row| row.quantity).sum()
    }

    pub fn size_total(&self, size: &SizeLabel) -> u32 {
        self.rows_for(size).iter().map(|row| row.quantity).sum()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Vec<SizeLabel> {
        SizeLabel::standard()
    }

    fn sam() -> SizeGroup {
        let mut sizes = SizeQuantities::zeroed(&chart());
        sizes.set("S".into(), 2);
        sizes.set("M".into(), 1);
        SizeGroup::new(Some("Sam".to_string()), sizes)
    }

    #[test]
    fn test_expand_emits_one_row_per_size() {
        let tally = SizeTally::expand(&[sam()], &chart(), DEFAULT_PLAYER_NAME_MAX_LEN);
        let rows: Vec<_> = tally.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].id, rows[1].id);
        assert!(rows.iter().all(|r| r.player_name.as_deref() == Some("Sam")));
        assert!(tally.show_player_names());
        assert!(!tally.is_dirty());
    }

    #[test]
    fn test_collapse_splits_players_with_several_sizes() {
        let tally = SizeTally::expand(&[sam()], &chart(), DEFAULT_PLAYER_NAME_MAX_LEN);
        let groups = tally.collapse();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].player_name.as_deref(), Some("Sam"));
        assert_eq!(groups[0].sizes.get(&"S".into()), 2);
        assert_eq!(groups[0].sizes.total(), 2);
        assert_eq!(groups[1].sizes.get(&"M".into()), 1);
        assert_eq!(groups[1].sizes.total(), 1);
    }

    #[test]
    fn test_anonymous_mode_drops_names() {
        let mut tally = SizeTally::new(&chart(), DEFAULT_PLAYER_NAME_MAX_LEN);
        let id = tally.add_row("L".into());
        tally.set_quantity(id, 4);
        let groups = tally.collapse();
        assert_eq!(groups[0].player_name, None);
        assert_eq!(groups[0].id, id);
    }

    #[test]
    fn test_decrement_stops_at_zero() {
        let mut tally = SizeTally::new(&chart(), DEFAULT_PLAYER_NAME_MAX_LEN);
        let id = tally.add_row("M".into());
        tally.increment(id);
        assert!(tally.decrement(id));
        assert!(tally.decrement(id));
        assert_eq!(tally.row(id).unwrap().quantity, 0);
    }

    #[test]
    fn test_toggle_resets_names() {
        let mut tally = SizeTally::expand(&[sam()], &chart(), DEFAULT_PLAYER_NAME_MAX_LEN);
        assert!(!tally.toggle_player_names());
        assert!(tally.rows().all(|r| r.player_name.is_none()));
        assert!(tally.toggle_player_names());
        assert!(tally.rows().all(|r| r.player_name.as_deref() == Some("")));
        assert!(tally.is_dirty());
    }

    #[test]
    fn test_player_name_is_truncated() {
        let mut tally = SizeTally::new(&chart(), DEFAULT_PLAYER_NAME_MAX_LEN);
        tally.toggle_player_names();
        let id = tally.add_row("XL".into());
        tally.set_player_name(id, "Maximilian Longname");
        assert_eq!(
            tally.row(id).unwrap().player_name.as_deref(),
            Some("Maximilian Lon")
        );
    }

    #[test]
    fn test_remove_and_totals() {
        let mut tally = SizeTally::new(&chart(), DEFAULT_PLAYER_NAME_MAX_LEN);
        let a = tally.add_row("S".into());
        let b = tally.add_row("S".into());
        tally.set_quantity(a, 3);
        tally.set_quantity(b, 2);
        assert_eq!(tally.size_total(&"S".into()), 5);
        assert!(tally.remove_row(a));
        assert!(!tally.remove_row(a));
        assert_eq!(tally.total_quantity(), 2);
    }

    #[test]
    fn test_rows_follow_chart_order() {
        let mut tally = SizeTally::new(&chart(), DEFAULT_PLAYER_NAME_MAX_LEN);
        tally.add_row("XXL".into());
        tally.add_row("S".into());
        let sizes: Vec<&str> = tally.rows().map(|r| r.size.as_str()).collect();
        assert_eq!(sizes, vec!["S", "XXL"]);
    }
}
