//! Paged storage for corner connection sets.
//!
//! A connection set is an unordered set of [`VertexKey`]s that are considered
//! coincident. Sets are stored as singly linked chains of fixed-size pages in
//! a single arena. Each page holds a live-entry count, up to
//! [`PAGE_CAPACITY`] keys and a link to the next page of the same set. Freed
//! pages are queued and handed out again before the arena grows.
//!
//! Every member of a set maps to the head page of its chain, so two keys are
//! connected exactly when they map to the same head.

use std::collections::VecDeque;

use super::index::{PageId, VertexKey};

/// Number of key slots in one page.
pub const PAGE_CAPACITY: usize = 6;

#[derive(Debug, Clone, Copy)]
struct Page {
    /// Number of occupied slots, or `None` while the page is on the free list.
    len: Option<u8>,
    slots: [VertexKey; PAGE_CAPACITY],
    next: PageId,
}

impl Page {
    fn empty() -> Self {
        Self {
            len: Some(0),
            slots: [VertexKey::invalid(); PAGE_CAPACITY],
            next: PageId::invalid(),
        }
    }

    #[inline]
    fn is_live(&self) -> bool {
        self.len.is_some()
    }
}

/// Summary of the connection arena, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Number of distinct connection sets.
    pub sets: usize,
    /// Number of pages in use.
    pub live_pages: usize,
    /// Number of pages waiting on the free list.
    pub free_pages: usize,
    /// Number of corners that belong to some set.
    pub connected_corners: usize,
}

/// Arena of connection-set pages plus the corner -> set map.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConnectionSets {
    pages: Vec<Page>,
    free_pages: VecDeque<PageId>,
    /// Head page of the set each vertex key belongs to.
    heads: Vec<PageId>,
}

impl ConnectionSets {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make room for `num_keys` vertex keys. Existing entries are preserved.
    pub(crate) fn resize_keys(&mut self, num_keys: usize) {
        if num_keys > self.heads.len() {
            self.heads.resize(num_keys, PageId::invalid());
        }
    }

    /// Mark a key as belonging to no set. The key must already be detached.
    pub(crate) fn reset_key(&mut self, key: VertexKey) {
        debug_assert!(!self.heads[key.index()].is_valid(), "{:?} still attached", key);
        self.heads[key.index()] = PageId::invalid();
    }

    /// Head page of the set `key` belongs to, if any.
    #[inline]
    fn head_of(&self, key: VertexKey) -> Option<PageId> {
        let head = self.heads[key.index()];
        head.is_valid().then_some(head)
    }

    /// Whether two keys are in the same set.
    pub(crate) fn are_connected(&self, a: VertexKey, b: VertexKey) -> bool {
        match (self.head_of(a), self.head_of(b)) {
            (Some(ha), Some(hb)) => ha == hb,
            _ => false,
        }
    }

    fn alloc_page(&mut self) -> PageId {
        let id = match self.free_pages.pop_front() {
            Some(id) => {
                self.pages[id.index()] = Page::empty();
                id
            }
            None => {
                let id = PageId::from_raw(self.pages.len());
                self.pages.push(Page::empty());
                id
            }
        };
        log::trace!("allocated connection page {:?}", id);
        id
    }

    fn free_page(&mut self, id: PageId) {
        let page = &mut self.pages[id.index()];
        page.len = None;
        page.next = PageId::invalid();
        self.free_pages.push_back(id);
        log::trace!("freed connection page {:?}", id);
    }

    /// Declare `a` and `b` coincident, merging their sets if needed.
    pub(crate) fn attach(&mut self, a: VertexKey, b: VertexKey) {
        if a == b {
            return;
        }

        match (self.head_of(a), self.head_of(b)) {
            (Some(ha), Some(hb)) if ha == hb => {}
            (Some(ha), Some(hb)) => {
                // fold a's pages into b's set, reclaiming each page as it is drained
                let mut page = ha;
                while page.is_valid() {
                    let drained = self.pages[page.index()];
                    self.free_page(page);
                    for key in drained.slots.iter().copied().filter(|k| k.is_valid()) {
                        self.insert(hb, key);
                    }
                    page = drained.next;
                }
            }
            (Some(ha), None) => self.insert(ha, b),
            (None, Some(hb)) => self.insert(hb, a),
            (None, None) => {
                let id = self.alloc_page();
                let page = &mut self.pages[id.index()];
                page.slots[0] = a;
                page.slots[1] = b;
                page.len = Some(2);
                self.heads[a.index()] = id;
                self.heads[b.index()] = id;
            }
        }
    }

    /// Insert `key` into the set starting at `head`, unless it is already there.
    fn insert(&mut self, head: PageId, key: VertexKey) {
        let mut open: Option<(PageId, usize)> = None;
        let mut last = head;
        let mut page = head;

        // walk the whole chain: the key may sit in a later page than the first hole
        while page.is_valid() {
            let p = &self.pages[page.index()];
            for (slot, &member) in p.slots.iter().enumerate() {
                if member == key {
                    return;
                }
                if !member.is_valid() && open.is_none() {
                    open = Some((page, slot));
                }
            }
            last = page;
            page = p.next;
        }

        match open {
            Some((page, slot)) => {
                let p = &mut self.pages[page.index()];
                p.slots[slot] = key;
                p.len = p.len.map(|n| n + 1);
            }
            None => {
                let id = self.alloc_page();
                let p = &mut self.pages[id.index()];
                p.slots[0] = key;
                p.len = Some(1);
                self.pages[last.index()].next = id;
            }
        }

        self.heads[key.index()] = head;
    }

    /// Remove `key` from whatever set it belongs to. No-op if it has none.
    pub(crate) fn detach(&mut self, key: VertexKey) {
        let Some(head) = self.head_of(key) else {
            return;
        };
        self.heads[key.index()] = PageId::invalid();

        let mut prior = PageId::invalid();
        let mut page = head;
        while page.is_valid() {
            let next = self.pages[page.index()].next;
            let p = &mut self.pages[page.index()];
            if let Some(slot) = p.slots.iter().position(|&k| k == key) {
                p.slots[slot] = VertexKey::invalid();
                let remaining = p.len.map_or(0, |n| n - 1);
                p.len = Some(remaining);

                if remaining == 0 {
                    self.unlink(page, prior, next);
                }
                return;
            }
            prior = page;
            page = next;
        }
    }

    /// Free an emptied page and splice it out of its chain.
    fn unlink(&mut self, page: PageId, prior: PageId, next: PageId) {
        self.free_page(page);
        if prior.is_valid() {
            self.pages[prior.index()].next = next;
        } else if next.is_valid() {
            // the head went away, so the remaining members need the new head
            let mut cursor = next;
            while cursor.is_valid() {
                let p = self.pages[cursor.index()];
                for key in p.slots.iter().copied().filter(|k| k.is_valid()) {
                    self.heads[key.index()] = next;
                }
                cursor = p.next;
            }
        }
    }

    /// Iterate over the other members of `key`'s set.
    pub(crate) fn members(&self, key: VertexKey) -> SetMembers<'_> {
        SetMembers {
            sets: self,
            page: self.head_of(key).unwrap_or_default(),
            slot: 0,
            exclude: key,
        }
    }

    pub(crate) fn stats(&self) -> ConnectionStats {
        let live_pages = self.pages.iter().filter(|p| p.is_live()).count();
        let connected_corners = self.heads.iter().filter(|h| h.is_valid()).count();
        let mut heads: Vec<PageId> = self.heads.iter().copied().filter(|h| h.is_valid()).collect();
        heads.sort_unstable();
        heads.dedup();

        ConnectionStats {
            sets: heads.len(),
            live_pages,
            free_pages: self.free_pages.len(),
            connected_corners,
        }
    }

    /// Check that every key is stored in exactly the set its head points to,
    /// and in no other.
    pub(crate) fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.heads.len()];
        let mut heads: Vec<PageId> = self.heads.iter().copied().filter(|h| h.is_valid()).collect();
        heads.sort_unstable();
        heads.dedup();

        for head in heads {
            let mut page = head;
            while page.is_valid() {
                let p = &self.pages[page.index()];
                let live = p.slots.iter().filter(|k| k.is_valid()).count();
                if p.len != Some(live as u8) || live == 0 {
                    return false;
                }
                for key in p.slots.iter().copied().filter(|k| k.is_valid()) {
                    if seen[key.index()] || self.heads[key.index()] != head {
                        return false;
                    }
                    seen[key.index()] = true;
                }
                page = p.next;
            }
        }

        // every key with a head must have been found in its chain
        self.heads
            .iter()
            .zip(&seen)
            .all(|(head, &found)| head.is_valid() == found)
    }
}

/// Iterator over the members of a connection set, excluding the queried key.
pub(crate) struct SetMembers<'a> {
    sets: &'a ConnectionSets,
    page: PageId,
    slot: usize,
    exclude: VertexKey,
}

impl Iterator for SetMembers<'_> {
    type Item = VertexKey;

    fn next(&mut self) -> Option<Self::Item> {
        while self.page.is_valid() {
            let page = &self.sets.pages[self.page.index()];
            while self.slot < PAGE_CAPACITY {
                let key = page.slots[self.slot];
                self.slot += 1;
                if key.is_valid() && key != self.exclude {
                    return Some(key);
                }
            }
            self.page = page.next;
            self.slot = 0;
        }
        None
    }
}
