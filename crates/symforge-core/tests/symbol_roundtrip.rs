//! End-to-end tests of the symbol aggregate: persistence round trips,
//! presentation-adapter binding, and the published-interface rules.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use symforge_core::{
    Alignment, Angle, Circle, ElectricalRole, ElementError, ElementName, HAlign, Length, ParseError,
    Polygon, Position, SchematicLayer, Symbol, SymbolPin, SymbolPresentation, Text, Uuid, VAlign,
    Vertex, SYMBOL_FILE_NAME,
};

fn new_symbol(name: &str) -> Symbol {
    Symbol::new(
        Uuid::new_v4(),
        "0.1".parse().unwrap(),
        "testuser",
        ElementName::new(name).unwrap(),
        "integration test element",
        "test",
    )
}

fn new_pin(name: &str, x_mm: f64, y_mm: f64) -> SymbolPin {
    SymbolPin::new(
        Uuid::new_v4(),
        name,
        ElectricalRole::Passive,
        Position::from_mm(x_mm, y_mm),
        Angle::ZERO,
        Length::from_mm(2.54),
    )
}

fn new_polygon() -> Polygon {
    Polygon::new(
        Uuid::new_v4(),
        SchematicLayer::Outlines,
        Length::from_mm(0.25),
        false,
        true,
        vec![
            Vertex::line_to(Position::from_mm(-2.54, -2.54)),
            Vertex::line_to(Position::from_mm(2.54, -2.54)),
            Vertex::line_to(Position::from_mm(2.54, 2.54)),
            Vertex::line_to(Position::from_mm(-2.54, -2.54)),
        ],
    )
}

/// Records every notification it receives, in order.
#[derive(Default)]
struct RecordingAdapter {
    events: RefCell<Vec<(String, usize, Uuid)>>,
}

impl RecordingAdapter {
    fn events(&self) -> Vec<(String, usize, Uuid)> {
        self.events.borrow().clone()
    }

    fn record(&self, kind: &str, index: usize, uuid: Uuid) {
        self.events.borrow_mut().push((kind.to_string(), index, uuid));
    }
}

impl SymbolPresentation for RecordingAdapter {
    fn pin_added(&self, index: usize, pin: &SymbolPin) {
        self.record("pin_added", index, pin.uuid());
    }
    fn pin_removed(&self, index: usize, pin: &SymbolPin) {
        self.record("pin_removed", index, pin.uuid());
    }
    fn polygon_added(&self, index: usize, polygon: &Polygon) {
        self.record("polygon_added", index, polygon.uuid());
    }
    fn polygon_removed(&self, index: usize, polygon: &Polygon) {
        self.record("polygon_removed", index, polygon.uuid());
    }
    fn circle_added(&self, index: usize, circle: &Circle) {
        self.record("circle_added", index, circle.uuid());
    }
    fn circle_removed(&self, index: usize, circle: &Circle) {
        self.record("circle_removed", index, circle.uuid());
    }
    fn text_added(&self, index: usize, text: &Text) {
        self.record("text_added", index, text.uuid());
    }
    fn text_removed(&self, index: usize, text: &Text) {
        self.record("text_removed", index, text.uuid());
    }
}

#[test]
fn pin_identity_and_order_survive_round_trip() {
    // Create an aggregate U0 with pins P1 (index 0) and P2 (index 1),
    // serialize, deserialize, and expect the same pins in the same order.
    let mut symbol = new_symbol("Round Trip");
    let p1 = new_pin("P1", -2.54, 0.0);
    let p2 = new_pin("P2", 2.54, 0.0);
    let (u1, u2) = (p1.uuid(), p2.uuid());
    symbol.insert_pin(0, p1).unwrap();
    symbol.insert_pin(1, p2).unwrap();

    let dir = tempfile::tempdir().unwrap();
    symbol.save_to(dir.path()).unwrap();
    let reopened = Symbol::open(dir.path(), false).unwrap();

    assert_eq!(reopened, symbol);
    assert_eq!(reopened.pins().len(), 2);
    let uuids: Vec<Uuid> = reopened.pins().uuids().collect();
    assert_eq!(uuids, vec![u1, u2]);
}

#[test]
fn full_symbol_survives_save_and_open() {
    let mut symbol = new_symbol("Everything");
    symbol.add_pin(new_pin("1", -7.62, 2.54)).unwrap();
    symbol.add_pin(new_pin("2", -7.62, -2.54)).unwrap();
    symbol.polygons_mut().push(new_polygon()).unwrap();
    symbol
        .circles_mut()
        .push(Circle::new(
            Uuid::new_v4(),
            SchematicLayer::Outlines,
            Length::from_mm(0.2),
            false,
            false,
            Position::from_mm(0.0, 0.0),
            Length::from_mm(1.0),
        ))
        .unwrap();
    symbol
        .texts_mut()
        .push(Text::new(
            Uuid::new_v4(),
            SchematicLayer::Names,
            "{{NAME}}",
            Alignment::new(HAlign::Center, VAlign::Bottom),
            Length::from_mm(2.5),
            Position::from_mm(0.0, 3.81),
            Angle::ZERO,
        ))
        .unwrap();
    symbol.names_mut().insert(
        "de_DE",
        ElementName::new("Alles").unwrap(),
    );

    let dir = tempfile::tempdir().unwrap();
    symbol.save_to(dir.path()).unwrap();
    let reopened = Symbol::open(dir.path(), false).unwrap();
    assert_eq!(reopened, symbol);
    assert_eq!(reopened.names().get("de_DE").as_str(), "Alles");
}

#[test]
fn saving_twice_produces_identical_files() {
    let mut symbol = new_symbol("Stable");
    symbol.add_pin(new_pin("A", 0.0, 0.0)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    symbol.save_to(dir.path()).unwrap();
    let first = fs::read_to_string(dir.path().join(SYMBOL_FILE_NAME)).unwrap();
    symbol.save().unwrap();
    let second = fs::read_to_string(dir.path().join(SYMBOL_FILE_NAME)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn adapter_replay_remove_unregister() {
    // One polygon exists before registration: the adapter must see it as a
    // synthetic add, then the real remove, then nothing after unregistering.
    let mut symbol = new_symbol("Adapter");
    let polygon = new_polygon();
    let polygon_uuid = polygon.uuid();
    symbol.polygons_mut().push(polygon).unwrap();

    let adapter = Rc::new(RecordingAdapter::default());
    let handle: Rc<dyn SymbolPresentation> = adapter.clone();
    symbol.register_presentation(handle.clone()).unwrap();
    assert_eq!(
        adapter.events(),
        vec![("polygon_added".to_string(), 0, polygon_uuid)]
    );

    symbol.polygons_mut().remove_at(0).unwrap();
    assert_eq!(
        adapter.events(),
        vec![
            ("polygon_added".to_string(), 0, polygon_uuid),
            ("polygon_removed".to_string(), 0, polygon_uuid),
        ]
    );

    symbol.unregister_presentation(&handle).unwrap();
    symbol.polygons_mut().push(new_polygon()).unwrap();
    symbol.add_pin(new_pin("A", 0.0, 0.0)).unwrap();
    assert_eq!(adapter.events().len(), 2);
}

#[test]
fn replay_covers_all_collections_in_order() {
    let mut symbol = new_symbol("Replay");
    symbol.add_pin(new_pin("1", 0.0, 0.0)).unwrap();
    symbol.add_pin(new_pin("2", 0.0, 2.54)).unwrap();
    symbol.polygons_mut().push(new_polygon()).unwrap();
    symbol
        .texts_mut()
        .push(Text::new(
            Uuid::new_v4(),
            SchematicLayer::Values,
            "{{VALUE}}",
            Alignment::new(HAlign::Center, VAlign::Bottom),
            Length::from_mm(2.5),
            Position::from_mm(0.0, -3.81),
            Angle::ZERO,
        ))
        .unwrap();

    let adapter = Rc::new(RecordingAdapter::default());
    symbol
        .register_presentation(adapter.clone() as Rc<dyn SymbolPresentation>)
        .unwrap();

    let kinds: Vec<(String, usize)> = adapter
        .events()
        .into_iter()
        .map(|(kind, index, _)| (kind, index))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("pin_added".to_string(), 0),
            ("pin_added".to_string(), 1),
            ("polygon_added".to_string(), 0),
            ("text_added".to_string(), 0),
        ]
    );
}

#[test]
fn second_adapter_registration_fails() {
    let mut symbol = new_symbol("Single Slot");
    let first: Rc<dyn SymbolPresentation> = Rc::new(RecordingAdapter::default());
    let second: Rc<dyn SymbolPresentation> = Rc::new(RecordingAdapter::default());

    symbol.register_presentation(first.clone()).unwrap();
    let err = symbol.register_presentation(second.clone()).unwrap_err();
    assert!(matches!(err, ElementError::AlreadyRegistered));

    // Unregistering the wrong adapter is rejected, the right one works.
    let err = symbol.unregister_presentation(&second).unwrap_err();
    assert!(matches!(err, ElementError::NotRegistered));
    symbol.unregister_presentation(&first).unwrap();
    let err = symbol.unregister_presentation(&first).unwrap_err();
    assert!(matches!(err, ElementError::NotRegistered));

    // The slot is free again.
    symbol.register_presentation(second).unwrap();
}

#[test]
fn published_symbol_rejects_pin_membership_changes_on_save() {
    let mut symbol = new_symbol("Published");
    symbol.add_pin(new_pin("1", 0.0, 0.0)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    symbol.save_to(dir.path()).unwrap();

    symbol.mark_published();
    symbol.save().unwrap();

    // Membership mutators are rejected outright...
    assert!(matches!(
        symbol.add_pin(new_pin("2", 2.54, 0.0)),
        Err(ElementError::InterfaceViolation(_))
    ));
    // ...and the save-time validation hook is also in place.
    assert!(symbol.check_interface_stability().is_ok());
    let pin_uuid = symbol.pins().uuids().next().unwrap();
    symbol.pin_mut(&pin_uuid).unwrap();
    symbol.save().unwrap();
}

#[test]
fn read_only_symbol_rejects_save() {
    let mut symbol = new_symbol("Reference Copy");
    symbol.add_pin(new_pin("1", 0.0, 0.0)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    symbol.save_to(dir.path()).unwrap();
    let before = fs::read_to_string(dir.path().join(SYMBOL_FILE_NAME)).unwrap();

    let mut reference = Symbol::open(dir.path(), true).unwrap();
    assert!(reference.is_read_only());
    // In-memory edits are fine; persisting them is not.
    let pin_uuid = reference.pins().uuids().next().unwrap();
    reference.pin_mut(&pin_uuid).unwrap().set_name("X");
    assert!(matches!(reference.save(), Err(ElementError::ReadOnly { .. })));
    let other = tempfile::tempdir().unwrap();
    assert!(matches!(
        reference.save_to(other.path()),
        Err(ElementError::ReadOnly { .. })
    ));

    // The stored file is untouched.
    let after = fs::read_to_string(dir.path().join(SYMBOL_FILE_NAME)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn save_without_backing_directory_fails() {
    let symbol = new_symbol("Nowhere");
    assert!(matches!(symbol.save(), Err(ElementError::NoLocation)));
}

#[test]
fn unsupported_format_version_is_reported() {
    let mut symbol = new_symbol("Future");
    let dir = tempfile::tempdir().unwrap();
    symbol.save_to(dir.path()).unwrap();

    let path = dir.path().join(SYMBOL_FILE_NAME);
    let text = fs::read_to_string(&path)
        .unwrap()
        .replace("(format_version 1)", "(format_version 2)");
    fs::write(&path, text).unwrap();

    match Symbol::open(dir.path(), false) {
        Err(ElementError::VersionMismatch { found }) => assert_eq!(found, "2"),
        other => panic!("expected version mismatch, got {other:?}"),
    }
}

#[test]
fn duplicate_pin_uuid_is_rejected_on_load() {
    let mut symbol = new_symbol("Duplicates");
    symbol.add_pin(new_pin("1", 0.0, 0.0)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    symbol.save_to(dir.path()).unwrap();

    let path = dir.path().join(SYMBOL_FILE_NAME);
    let text = fs::read_to_string(&path).unwrap();
    // Duplicate the whole pin node.
    let pin_start = text.find(" (pin ").unwrap();
    let pin_node: String = text[pin_start..text.rfind("\n)").unwrap()].to_string();
    let doctored = text.replace(&pin_node, &format!("{pin_node}{pin_node}"));
    fs::write(&path, doctored).unwrap();

    match Symbol::open(dir.path(), false) {
        Err(ElementError::Parse(ParseError::DuplicateIdentifier { kind, .. })) => {
            assert_eq!(kind, "pin");
        }
        other => panic!("expected duplicate identifier error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Symbol::open(dir.path(), false),
        Err(ElementError::Read { .. })
    ));
}
