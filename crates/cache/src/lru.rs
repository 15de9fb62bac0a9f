use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Bounded map ordered by access recency
///
/// Entries live in a slab and are threaded on an index-linked list, most
/// recent at `head`, least recent at `tail`. The hash index maps a key to its
/// slot so lookup, promotion and eviction are all O(1). Every access moves
/// the entry to the head, so recency is a strict total order.
#[derive(Debug)]
pub(crate) struct LruMap<K, V> {
    slots: Vec<Slot<K, V>>,
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

/// What happened to the map on [`LruMap::insert`]
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Insertion<K, V> {
    /// New key, room was available
    Added,
    /// Existing key, value swapped in place
    Replaced,
    /// New key, the least recently used entry was dropped to make room
    Evicted(K, V),
}

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<K, V> LruMap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity.min(1024)),
            index: HashMap::with_capacity(capacity.min(1024)),
            head: None,
            tail: None,
            capacity,
        }
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    /// Look up `key` and mark it most recently used
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.promote(idx);
        Some(&self.slots[idx].value)
    }

    /// Look up `key` without touching recency
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&idx| &self.slots[idx].value)
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Insert or replace `key` as the most recently used entry
    ///
    /// Replacing an existing key refreshes its recency and never evicts.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        if let Some(&idx) = self.index.get(&key) {
            self.slots[idx].value = value;
            self.promote(idx);
            return Insertion::Replaced;
        }

        if self.len() >= self.capacity {
            if let Some(victim) = self.tail {
                self.detach(victim);
                let fresh = Slot {
                    key: key.clone(),
                    value,
                    prev: None,
                    next: None,
                };
                let evicted = std::mem::replace(&mut self.slots[victim], fresh);
                self.index.remove(&evicted.key);
                self.index.insert(key, victim);
                self.attach_front(victim);
                return Insertion::Evicted(evicted.key, evicted.value);
            }
        }

        let idx = self.slots.len();
        self.slots.push(Slot {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.index.insert(key, idx);
        self.attach_front(idx);
        Insertion::Added
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from most to least recently used
    pub(crate) fn keys_by_recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let slot = &self.slots[idx];
            keys.push(slot.key.clone());
            cursor = slot.next;
        }
        keys
    }

    fn promote(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.attach_front(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let slot = &self.slots[idx];
            (slot.prev, slot.next)
        };
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        let slot = &mut self.slots[idx];
        slot.prev = None;
        slot.next = None;
    }

    fn attach_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[idx];
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head {
            Some(h) => self.slots[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}
