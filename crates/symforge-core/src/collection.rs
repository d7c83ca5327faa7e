//! Identity-keyed, order-preserving, observable object containers.
//!
//! [`ObjectCollection`] is the backbone of every library element: each
//! sub-object type (pins, polygons, circles, texts) lives in one collection
//! that enforces UUID uniqueness, preserves insertion order, and notifies
//! registered observers of every structural change before the mutating call
//! returns. Observers receive one `object_added`/`object_removed` call per
//! successful mutation, in registration order, which lets a presentation
//! layer maintain per-item graphics in O(1) per change instead of rebuilding
//! the whole scene.
//!
//! UUIDs are only checked for uniqueness within one collection; global
//! uniqueness across files is an externally maintained convention of the
//! library system.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::trace;
use uuid::Uuid;

/// Implemented by every object that can live in an [`ObjectCollection`].
///
/// The UUID must be immutable for the object's whole lifetime; collections
/// key membership and external files key references on it.
pub trait CollectionItem {
    fn uuid(&self) -> Uuid;
}

/// Receiver of granular structural-change notifications.
///
/// One implementation serves every item type; it is instantiated per `T`
/// when registered. Handlers run synchronously on the mutating call's stack
/// and must not mutate the collection they observe.
pub trait CollectionObserver<T> {
    /// `item` has just been inserted at `index`.
    fn object_added(&self, index: usize, item: &T);

    /// `item` has just been removed from `index`. The reference is valid for
    /// the duration of the call; afterwards ownership goes back to the
    /// caller of `remove_at`.
    fn object_removed(&self, index: usize, item: &T);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("an object with UUID {0} already exists in this collection")]
    DuplicateIdentity(Uuid),

    #[error("index {index} is out of range for a collection of {len} objects")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("collection mutated from within a change notification")]
    ReentrantMutation,
}

/// Ordered collection of uniquely-identified objects.
///
/// Objects are owned exclusively by the collection while they are members;
/// `remove_at` hands ownership back. Iteration is a live view in positional
/// order: the borrow checker rules out mutation while an iterator is alive,
/// and the runtime reentrancy flag additionally rejects mutation reached
/// through interior mutability while a notification is in flight.
pub struct ObjectCollection<T: CollectionItem> {
    items: Vec<T>,
    observers: Vec<Rc<dyn CollectionObserver<T>>>,
    notifying: Cell<bool>,
}

impl<T: CollectionItem> ObjectCollection<T> {
    pub fn new() -> Self {
        ObjectCollection {
            items: Vec::new(),
            observers: Vec::new(),
            notifying: Cell::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.index_of(uuid).is_some()
    }

    pub fn index_of(&self, uuid: &Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.uuid() == *uuid)
    }

    pub fn get(&self, uuid: &Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.uuid() == *uuid)
    }

    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable access for attribute edits. Identity stays immutable because
    /// item UUIDs are private to their types; attribute changes fire no
    /// notifications (only membership changes are structural).
    pub fn get_mut(&mut self, uuid: &Uuid) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.uuid() == *uuid)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Member UUIDs in positional order.
    pub fn uuids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.items.iter().map(CollectionItem::uuid)
    }

    /// Append at the end; see [`ObjectCollection::insert`].
    pub fn push(&mut self, item: T) -> Result<(), CollectionError> {
        self.insert(self.items.len(), item)
    }

    /// Insert `item` at `index` (`0..=len`).
    ///
    /// Fails without side effects (no state change, no notification) when
    /// the UUID is already present or the index is out of range. On success
    /// every observer has received exactly one `object_added` call before
    /// this returns.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        if self.notifying.get() {
            return Err(CollectionError::ReentrantMutation);
        }
        if index > self.items.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        if self.contains(&item.uuid()) {
            return Err(CollectionError::DuplicateIdentity(item.uuid()));
        }
        trace!(index, uuid = %item.uuid(), "collection object added");
        self.items.insert(index, item);
        let item = &self.items[index];
        self.notify(|observer| observer.object_added(index, item));
        Ok(())
    }

    /// Remove the object at `index`, returning it to the caller.
    ///
    /// Observers see the removed object (old index, item reference) before
    /// this returns; positions of all objects after `index` shift down by
    /// one.
    pub fn remove_at(&mut self, index: usize) -> Result<T, CollectionError> {
        if self.notifying.get() {
            return Err(CollectionError::ReentrantMutation);
        }
        if index >= self.items.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        trace!(index, uuid = %item.uuid(), "collection object removed");
        self.notify(|observer| observer.object_removed(index, &item));
        Ok(item)
    }

    /// Register an observer; it will be notified after all previously
    /// registered ones.
    pub fn add_observer(&mut self, observer: Rc<dyn CollectionObserver<T>>) {
        self.observers.push(observer);
    }

    /// Unregister by pointer identity. Returns whether it was registered.
    pub fn remove_observer(&mut self, observer: &Rc<dyn CollectionObserver<T>>) -> bool {
        let before = self.observers.len();
        self.observers
            .retain(|registered| !Rc::ptr_eq(registered, observer));
        self.observers.len() != before
    }

    fn notify(&self, call: impl Fn(&dyn CollectionObserver<T>)) {
        if self.observers.is_empty() {
            return;
        }
        let observers = self.observers.clone();
        self.notifying.set(true);
        let _guard = NotifyGuard(&self.notifying);
        for observer in &observers {
            call(observer.as_ref());
        }
    }
}

/// Clears the reentrancy flag even if an observer panics.
struct NotifyGuard<'a>(&'a Cell<bool>);

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<T: CollectionItem> Default for ObjectCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: CollectionItem> IntoIterator for &'a ObjectCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Structural equality over the members in order; observers are runtime
/// wiring and do not participate.
impl<T: CollectionItem + PartialEq> PartialEq for ObjectCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: CollectionItem + fmt::Debug> fmt::Debug for ObjectCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCollection")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestItem {
        uuid: Uuid,
        label: &'static str,
    }

    impl TestItem {
        fn new(label: &'static str) -> Self {
            TestItem {
                uuid: Uuid::new_v4(),
                label,
            }
        }
    }

    impl CollectionItem for TestItem {
        fn uuid(&self) -> Uuid {
            self.uuid
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<(&'static str, usize, Uuid)>>,
    }

    impl CollectionObserver<TestItem> for Recorder {
        fn object_added(&self, index: usize, item: &TestItem) {
            self.events.borrow_mut().push(("added", index, item.uuid));
        }

        fn object_removed(&self, index: usize, item: &TestItem) {
            self.events.borrow_mut().push(("removed", index, item.uuid));
        }
    }

    #[test]
    fn test_insert_then_get_by_uuid() {
        let mut collection = ObjectCollection::new();
        let item = TestItem::new("a");
        let uuid = item.uuid;
        collection.insert(0, item.clone()).unwrap();
        assert_eq!(collection.get(&uuid), Some(&item));
        assert_eq!(collection.index_of(&uuid), Some(0));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_duplicate_uuid_fails_without_notification() {
        let mut collection = ObjectCollection::new();
        let recorder = Rc::new(Recorder::default());
        let item = TestItem::new("a");
        collection.insert(0, item.clone()).unwrap();
        collection.add_observer(recorder.clone());

        let err = collection.insert(1, item.clone()).unwrap_err();
        assert_eq!(err, CollectionError::DuplicateIdentity(item.uuid));
        assert_eq!(collection.len(), 1);
        assert!(recorder.events.borrow().is_empty());
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut collection: ObjectCollection<TestItem> = ObjectCollection::new();
        let err = collection.insert(1, TestItem::new("a")).unwrap_err();
        assert_eq!(err, CollectionError::IndexOutOfRange { index: 1, len: 0 });
    }

    #[test]
    fn test_insert_notifies_before_return_with_new_index() {
        let mut collection = ObjectCollection::new();
        let recorder = Rc::new(Recorder::default());
        collection.add_observer(recorder.clone());

        let first = TestItem::new("a");
        let second = TestItem::new("b");
        collection.push(first.clone()).unwrap();
        collection.insert(0, second.clone()).unwrap();

        let events = recorder.events.borrow();
        assert_eq!(*events, vec![("added", 0, first.uuid), ("added", 0, second.uuid)]);
        drop(events);
        // `second` was inserted before `first`.
        assert_eq!(collection.get_at(0).unwrap().uuid, second.uuid);
        assert_eq!(collection.get_at(1).unwrap().uuid, first.uuid);
    }

    #[test]
    fn test_remove_shifts_later_items_down() {
        let mut collection = ObjectCollection::new();
        let items: Vec<TestItem> = (0..4).map(|_| TestItem::new("x")).collect();
        for item in &items {
            collection.push(item.clone()).unwrap();
        }
        let recorder = Rc::new(Recorder::default());
        collection.add_observer(recorder.clone());

        let removed = collection.remove_at(1).unwrap();
        assert_eq!(removed, items[1]);
        assert_eq!(*recorder.events.borrow(), vec![("removed", 1, items[1].uuid)]);
        assert_eq!(collection.index_of(&items[2].uuid), Some(1));
        assert_eq!(collection.index_of(&items[3].uuid), Some(2));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut collection: ObjectCollection<TestItem> = ObjectCollection::new();
        let err = collection.remove_at(0).unwrap_err();
        assert_eq!(err, CollectionError::IndexOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn test_observers_notified_in_registration_order() {
        let mut collection = ObjectCollection::new();
        let order: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));

        struct Tagged {
            tag: u8,
            order: Rc<RefCell<Vec<u8>>>,
        }
        impl CollectionObserver<TestItem> for Tagged {
            fn object_added(&self, _index: usize, _item: &TestItem) {
                self.order.borrow_mut().push(self.tag);
            }
            fn object_removed(&self, _index: usize, _item: &TestItem) {}
        }

        collection.add_observer(Rc::new(Tagged {
            tag: 1,
            order: order.clone(),
        }));
        collection.add_observer(Rc::new(Tagged {
            tag: 2,
            order: order.clone(),
        }));
        collection.push(TestItem::new("a")).unwrap();
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_removed_observer_is_silent() {
        let mut collection = ObjectCollection::new();
        let recorder: Rc<Recorder> = Rc::new(Recorder::default());
        let handle: Rc<dyn CollectionObserver<TestItem>> = recorder.clone();
        collection.add_observer(handle.clone());

        collection.push(TestItem::new("a")).unwrap();
        assert!(collection.remove_observer(&handle));
        assert!(!collection.remove_observer(&handle));

        collection.push(TestItem::new("b")).unwrap();
        assert_eq!(recorder.events.borrow().len(), 1);
    }

    #[test]
    fn test_get_mut_edits_attributes_in_place() {
        let mut collection = ObjectCollection::new();
        let item = TestItem::new("before");
        let uuid = item.uuid;
        collection.push(item).unwrap();
        collection.get_mut(&uuid).unwrap().label = "after";
        assert_eq!(collection.get(&uuid).unwrap().label, "after");
    }
}
