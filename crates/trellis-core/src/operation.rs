use std::cell::RefCell;

/// Snapshot kind recorded when a settings form edits node properties.
pub const UPDATE_NODE_PROPS: &str = "update:node:props";

/// Records document snapshots for undo/redo.
pub trait Operation {
    fn snapshot(&self, kind: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub sequence: u64,
    pub kind: String,
}

/// Bounded in-memory snapshot log.
#[derive(Debug)]
pub struct OperationHistory {
    records: RefCell<Vec<SnapshotRecord>>,
    next_sequence: RefCell<u64>,
    capacity: usize,
}

impl OperationHistory {
    pub const DEFAULT_CAPACITY: usize = 128;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RefCell::new(Vec::new()),
            next_sequence: RefCell::new(1),
            capacity: capacity.max(1),
        }
    }

    pub fn records(&self) -> Vec<SnapshotRecord> {
        self.records.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl Default for OperationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl Operation for OperationHistory {
    fn snapshot(&self, kind: &str) {
        let sequence = {
            let mut next = self.next_sequence.borrow_mut();
            let current = *next;
            *next += 1;
            current
        };
        let mut records = self.records.borrow_mut();
        if records.len() == self.capacity {
            records.remove(0);
        }
        records.push(SnapshotRecord {
            sequence,
            kind: kind.to_owned(),
        });
    }
}
