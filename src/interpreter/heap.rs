use std::collections::HashMap;

use super::value::Value;

pub type ObjectId = usize;

/// Field name to value.
pub type HeapObject = HashMap<String, Value>;

/// Append-only object store. Ids start at 1, increase monotonically and are
/// never reused; objects live until the program exits.
#[derive(Debug)]
pub struct Heap {
    objects: HashMap<ObjectId, HeapObject>,
    next_oid: ObjectId,
}

impl Default for Heap {
    fn default() -> Self {
        Heap::new()
    }
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            objects: HashMap::new(),
            next_oid: 1,
        }
    }

    pub fn allocate(&mut self, object: HeapObject) -> ObjectId {
        let oid = self.next_oid;
        self.next_oid += 1;
        self.objects.insert(oid, object);
        oid
    }

    pub fn has_object(&self, oid: ObjectId) -> bool {
        self.objects.contains_key(&oid)
    }

    pub fn get(&self, oid: ObjectId) -> Option<&HeapObject> {
        self.objects.get(&oid)
    }

    pub fn get_mut(&mut self, oid: ObjectId) -> Option<&mut HeapObject> {
        self.objects.get_mut(&oid)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
