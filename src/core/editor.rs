//! In-memory block editor for a single open page.
//!
//! Block order is exactly the order of the vector; the persisted
//! `element_positions` list is derived from it at save time. The editor
//! additionally tracks which elements were created/changed and which were
//! removed since the last save, so updates only ship what the backend needs.

use std::collections::{BTreeMap, HashSet};

use super::page::{Block, Page};

/// Editable state of the currently open page.
#[derive(Debug, Clone)]
pub struct PageEditor {
    pub page_uuid: String,
    pub title: String,
    pub is_root: bool,
    pub parent_page_uuid: Option<String>,
    pub public_page: bool,
    pub is_favourite: bool,
    pub date_view_count: BTreeMap<String, u64>,
    blocks: Vec<Block>,
    dirty: HashSet<String>,
    removed: HashSet<String>,
}

/// Elements to ship with the next page-update request.
#[derive(Debug, Clone, Default)]
pub struct SavePayload {
    /// Blocks created or changed since the last save.
    pub changed: Vec<Block>,
    /// Uuids of blocks removed since the last save.
    pub removed: Vec<String>,
}

impl PageEditor {
    /// Build an editor from a fetched page. Blocks are ordered by the
    /// page's `element_positions`; ids the positions list doesn't know
    /// keep their response order at the end.
    pub fn new(page: Page, mut blocks: Vec<Block>) -> Self {
        if !page.element_positions.is_empty() {
            let rank: BTreeMap<&str, usize> = page
                .element_positions
                .iter()
                .enumerate()
                .map(|(i, uuid)| (uuid.as_str(), i))
                .collect();
            blocks.sort_by_key(|b| rank.get(b.uuid.as_str()).copied().unwrap_or(usize::MAX));
        }

        Self {
            page_uuid: page.uuid,
            title: page.name,
            is_root: page.is_root,
            parent_page_uuid: page.parent_page_uuid,
            public_page: page.public_page,
            is_favourite: page.is_favourite,
            date_view_count: page.date_view_count,
            blocks,
            dirty: HashSet::new(),
            removed: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Mutable access for the render loop. The caller must report content
    /// edits through [`PageEditor::mark_dirty_at`].
    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    pub fn find(&self, uuid: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.uuid == uuid)
    }

    /// Insert `block` directly below `index`; the new block ends up at
    /// `index + 1` (clamped to the end of the list). Returns the index it
    /// landed at.
    pub fn insert_after(&mut self, index: usize, block: Block) -> usize {
        let at = (index + 1).min(self.blocks.len());
        self.dirty.insert(block.uuid.clone());
        self.blocks.insert(at, block);
        at
    }

    /// Append at the end of the page (used by the top insert menu).
    pub fn append(&mut self, block: Block) -> usize {
        self.dirty.insert(block.uuid.clone());
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// Remove exactly the block at `index`, shifting the rest left.
    pub fn remove(&mut self, index: usize) -> Option<Block> {
        if index >= self.blocks.len() {
            return None;
        }
        let block = self.blocks.remove(index);
        self.dirty.remove(&block.uuid);
        self.removed.insert(block.uuid.clone());
        Some(block)
    }

    /// Move the block at `index` by `offset` positions. A target outside
    /// the array bounds is a no-op. Returns whether anything moved.
    pub fn move_by(&mut self, index: usize, offset: isize) -> bool {
        if index >= self.blocks.len() {
            return false;
        }
        let target = index as isize + offset;
        if target < 0 || target >= self.blocks.len() as isize {
            return false;
        }
        let block = self.blocks.remove(index);
        self.blocks.insert(target as usize, block);
        true
    }

    /// Drag/drop reorder: remove at `from`, insert at `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.blocks.len() || to >= self.blocks.len() {
            return false;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        true
    }

    /// Mark the block at `index` as changed since the last save.
    pub fn mark_dirty_at(&mut self, index: usize) {
        if let Some(block) = self.blocks.get(index) {
            self.dirty.insert(block.uuid.clone());
        }
    }

    /// Apply `f` to the block at `index` and mark it dirty.
    pub fn update<F: FnOnce(&mut Block)>(&mut self, index: usize, f: F) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) => {
                f(block);
                let uuid = block.uuid.clone();
                self.dirty.insert(uuid);
                true
            }
            None => false,
        }
    }

    /// Ordered uuids of all blocks, as the update contract wants them.
    pub fn element_positions(&self) -> Vec<String> {
        self.blocks.iter().map(|b| b.uuid.clone()).collect()
    }

    pub fn has_unsaved_elements(&self) -> bool {
        !self.dirty.is_empty() || !self.removed.is_empty()
    }

    /// Drain the change log for a save. Fire-and-forget by design: the
    /// sets clear at send time and a failed request is not replayed.
    pub fn save_payload(&mut self) -> SavePayload {
        let changed = self
            .blocks
            .iter()
            .filter(|b| self.dirty.contains(&b.uuid))
            .cloned()
            .collect();
        let mut removed: Vec<String> = self.removed.drain().collect();
        removed.sort();
        self.dirty.clear();
        SavePayload { changed, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::page::BlockKind;

    fn editor_with(count: usize) -> PageEditor {
        let page = Page::new_root("Test");
        let blocks = (0..count)
            .map(|i| {
                let mut b = Block::new(BlockKind::Paragraph);
                b.content = format!("block {i}");
                b
            })
            .collect();
        let mut editor = PageEditor::new(page, blocks);
        // fetched pages start with a clean change log
        editor.save_payload();
        editor
    }

    #[test]
    fn test_insert_after_lands_below() {
        let mut editor = editor_with(3);
        let block = Block::new(BlockKind::Checkbox);
        let uuid = block.uuid.clone();
        let at = editor.insert_after(1, block);
        assert_eq!(at, 2);
        assert_eq!(editor.len(), 4);
        assert_eq!(editor.block(2).map(|b| b.uuid.as_str()), Some(uuid.as_str()));
        assert_eq!(editor.block(1).map(|b| b.content.as_str()), Some("block 1"));
        assert_eq!(editor.block(3).map(|b| b.content.as_str()), Some("block 2"));
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut editor = editor_with(3);
        let removed = editor.remove(1);
        assert_eq!(removed.map(|b| b.content), Some("block 1".to_string()));
        assert_eq!(editor.len(), 2);
        assert_eq!(editor.block(0).map(|b| b.content.as_str()), Some("block 0"));
        assert_eq!(editor.block(1).map(|b| b.content.as_str()), Some("block 2"));
    }

    #[test]
    fn test_move_by_swaps_adjacent() {
        let mut editor = editor_with(3);
        assert!(editor.move_by(0, 1));
        assert_eq!(editor.block(0).map(|b| b.content.as_str()), Some("block 1"));
        assert_eq!(editor.block(1).map(|b| b.content.as_str()), Some("block 0"));

        assert!(editor.move_by(1, -1));
        assert_eq!(editor.block(0).map(|b| b.content.as_str()), Some("block 0"));
    }

    #[test]
    fn test_move_by_noop_at_bounds() {
        let mut editor = editor_with(3);
        assert!(!editor.move_by(0, -1));
        assert!(!editor.move_by(2, 1));
        let contents: Vec<_> = editor.blocks().iter().map(|b| b.content.clone()).collect();
        assert_eq!(contents, vec!["block 0", "block 1", "block 2"]);
    }

    #[test]
    fn test_reorder_matches_splice_semantics() {
        let mut editor = editor_with(4);
        assert!(editor.reorder(0, 2));
        let contents: Vec<_> = editor.blocks().iter().map(|b| b.content.clone()).collect();
        assert_eq!(contents, vec!["block 1", "block 2", "block 0", "block 3"]);

        assert!(!editor.reorder(1, 1));
        assert!(!editor.reorder(9, 0));
    }

    #[test]
    fn test_save_payload_tracks_changed_and_removed() {
        let mut editor = editor_with(3);
        let removed_uuid = editor.block(2).map(|b| b.uuid.clone()).unwrap_or_default();

        editor.update(0, |b| b.content = "edited".to_string());
        editor.remove(2);

        let payload = editor.save_payload();
        assert_eq!(payload.changed.len(), 1);
        assert_eq!(payload.changed[0].content, "edited");
        assert_eq!(payload.removed, vec![removed_uuid]);

        // untouched blocks never appear; a second save ships nothing
        let payload = editor.save_payload();
        assert!(payload.changed.is_empty());
        assert!(payload.removed.is_empty());
    }

    #[test]
    fn test_removed_block_not_reported_as_changed() {
        let mut editor = editor_with(2);
        editor.update(1, |b| b.content = "edited then deleted".to_string());
        let uuid = editor.block(1).map(|b| b.uuid.clone()).unwrap_or_default();
        editor.remove(1);

        let payload = editor.save_payload();
        assert!(payload.changed.iter().all(|b| b.uuid != uuid));
        assert_eq!(payload.removed, vec![uuid]);
    }

    #[test]
    fn test_reorder_only_edit_ships_no_elements() {
        let mut editor = editor_with(3);
        editor.reorder(0, 2);
        let payload = editor.save_payload();
        assert!(payload.changed.is_empty());
        assert!(payload.removed.is_empty());
        // the new order still shows through the positions list
        assert_eq!(editor.element_positions().len(), 3);
    }

    #[test]
    fn test_fetch_orders_by_element_positions() {
        let mut page = Page::new_root("Test");
        let a = Block::new(BlockKind::Paragraph);
        let b = Block::new(BlockKind::Paragraph);
        let c = Block::new(BlockKind::Paragraph);
        page.element_positions = vec![c.uuid.clone(), a.uuid.clone(), b.uuid.clone()];

        let editor = PageEditor::new(page, vec![a.clone(), b.clone(), c.clone()]);
        let order: Vec<_> = editor.blocks().iter().map(|bl| bl.uuid.clone()).collect();
        assert_eq!(order, vec![c.uuid, a.uuid, b.uuid]);
    }
}
