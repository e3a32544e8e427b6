//! Guillotine slot bookkeeping for atlas pages.
//!
//! Slots form a binary partition tree flattened into two index-linked
//! lists inside one `Vec`: the empty list iterates leaves in the same
//! order as a depth-first search of the tree, the used list is
//! unordered. Linking by index keeps the arena free of pointer chasing
//! and owns every record in one allocation.

/// Rectangular region of an atlas page.
#[derive(Clone, Copy, Debug)]
pub struct Slot {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    prev: Option<usize>,
    next: Option<usize>,
}

pub struct SlotArena {
    slots: Vec<Slot>,
    empty_head: Option<usize>,
    used_head: Option<usize>,
}

/// Leftovers narrower than this are not worth tracking as slots.
const MIN_SLOT_DIM: u32 = 2;

impl SlotArena {
    pub fn new(width: u32, height: u32) -> Self {
        let mut arena = SlotArena {
            slots: Vec::new(),
            empty_head: None,
            used_head: None,
        };
        let root = arena.push(0, 0, width, height);
        arena.empty_head = Some(root);
        arena
    }

    fn push(&mut self, x: u32, y: u32, width: u32, height: u32) -> usize {
        self.slots.push(Slot {
            x,
            y,
            width,
            height,
            prev: None,
            next: None,
        });
        self.slots.len() - 1
    }

    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    /// Claims a slot for a `width` x `height` texture plus a one-pixel
    /// seam on the right and bottom. Returns the slot index, with its
    /// leftover area split off into new empty slots.
    pub fn find_slot(&mut self, width: u32, height: u32) -> Option<usize> {
        let padded_width = width + 1;
        let padded_height = height + 1;

        let mut cursor = self.empty_head;
        let found = loop {
            let index = cursor?;
            let slot = &self.slots[index];
            if padded_width <= slot.width && padded_height <= slot.height {
                break index;
            }
            cursor = slot.next;
        };

        let slot = self.slots[found];
        let remaining_width = slot.width - padded_width;
        let remaining_height = slot.height - padded_height;

        if remaining_width >= MIN_SLOT_DIM || remaining_height >= MIN_SLOT_DIM {
            let (left, right) = if remaining_height <= remaining_width {
                // split vertically: left below the claimed area, right
                // spans the full remaining column
                (
                    self.push(slot.x, slot.y + padded_height, padded_width, remaining_height),
                    self.push(slot.x + padded_width, slot.y, remaining_width, slot.height),
                )
            } else {
                // split horizontally: left beside the claimed area,
                // right spans the full remaining row
                (
                    self.push(slot.x + padded_width, slot.y, remaining_width, padded_height),
                    self.push(slot.x, slot.y + padded_height, slot.width, remaining_height),
                )
            };
            self.replace_in_empty(found, left, right);
        } else {
            self.unlink_empty(found);
        }
        self.push_used(found);

        self.slots[found].width = padded_width;
        self.slots[found].height = padded_height;
        Some(found)
    }

    fn unlink_empty(&mut self, index: usize) {
        let (prev, next) = (self.slots[index].prev, self.slots[index].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.empty_head = next,
        }
        if let Some(n) = next {
            self.slots[n].prev = prev;
        }
        self.slots[index].prev = None;
        self.slots[index].next = None;
    }

    /// Splices `left` and `right` into the empty list where `old` was,
    /// preserving depth-first order.
    fn replace_in_empty(&mut self, old: usize, left: usize, right: usize) {
        let (prev, next) = (self.slots[old].prev, self.slots[old].next);
        self.slots[left].prev = prev;
        self.slots[left].next = Some(right);
        self.slots[right].prev = Some(left);
        self.slots[right].next = next;
        match prev {
            Some(p) => self.slots[p].next = Some(left),
            None => self.empty_head = Some(left),
        }
        if let Some(n) = next {
            self.slots[n].prev = Some(right);
        }
        self.slots[old].prev = None;
        self.slots[old].next = None;
    }

    fn push_used(&mut self, index: usize) {
        self.slots[index].prev = None;
        self.slots[index].next = self.used_head;
        if let Some(head) = self.used_head {
            self.slots[head].prev = Some(index);
        }
        self.used_head = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_slot_lands_at_origin() {
        let mut arena = SlotArena::new(64, 64);
        let index = arena.find_slot(10, 12).expect("root page must fit 10x12");
        let slot = arena.slot(index);
        assert_eq!((slot.x, slot.y), (0, 0));
        assert_eq!(
            (slot.width, slot.height),
            (11, 13),
            "slot keeps a one pixel seam"
        );
    }

    #[test]
    fn slots_do_not_overlap() {
        let mut arena = SlotArena::new(32, 32);
        let mut rects = Vec::new();
        while let Some(index) = arena.find_slot(7, 5) {
            let slot = *arena.slot(index);
            rects.push(slot);
        }
        assert!(rects.len() > 1, "a 32x32 page holds several 7x5 slots");
        for (i, a) in rects.iter().enumerate() {
            assert!(a.x + a.width <= 32 && a.y + a.height <= 32);
            for b in &rects[i + 1..] {
                let disjoint = a.x + a.width <= b.x
                    || b.x + b.width <= a.x
                    || a.y + a.height <= b.y
                    || b.y + b.height <= a.y;
                assert!(disjoint, "slots {a:?} and {b:?} overlap");
            }
        }
    }

    #[test]
    fn rejects_texture_larger_than_page() {
        let mut arena = SlotArena::new(16, 16);
        assert!(arena.find_slot(16, 4).is_none(), "16 wide needs a 17 wide slot");
        assert!(arena.find_slot(4, 4).is_some());
    }

    #[test]
    fn fills_page_tightly_with_mixed_sizes() {
        let mut arena = SlotArena::new(64, 64);
        let mut area = 0;
        for (w, h) in [(30, 30), (30, 30), (14, 6), (6, 14), (2, 2), (2, 2)] {
            let index = arena
                .find_slot(w, h)
                .unwrap_or_else(|| panic!("{w}x{h} must still fit"));
            let slot = arena.slot(index);
            area += slot.width * slot.height;
        }
        assert!(area <= 64 * 64);
    }
}
