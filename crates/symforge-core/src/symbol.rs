//! The symbol library element.
//!
//! A symbol is the schematic-side appearance of a component: pins, polygon
//! outlines, circles and text labels, each kept in its own observable
//! collection, plus the shared element metadata. The symbol aggregates the
//! four collections, forwards their change notifications to one registered
//! presentation adapter, and owns the round-trip-safe persistence of the
//! whole element.
//!
//! The following information is the published "interface" of a symbol and
//! must never change once other library elements reference it:
//!  - the symbol UUID
//!  - the set of pin UUIDs (adding or removing pins breaks references)
//! Membership edits of the pin collection are therefore routed through the
//! symbol, which rejects them once the symbol is marked published, and
//! every save re-validates against the baseline recorded at publish time.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;

use tracing::{debug, info};
use uuid::Uuid;

use crate::circle::{Circle, CircleList};
use crate::codec;
use crate::collection::{CollectionObserver, ObjectCollection};
use crate::element::{ElementName, LocalizedNames, LocalizedText, Version, DEFAULT_LOCALE};
use crate::error::ElementError;
use crate::pin::{SymbolPin, SymbolPinList};
use crate::polygon::{Polygon, PolygonList};
use crate::text::{Text, TextList};
use symforge_sexpr::{parse, FromSexpr, List, ParseError, ToSexpr};

/// Directory entry name of a symbol's document file.
pub const SYMBOL_FILE_NAME: &str = "symbol.sexpr";

/// File format version this build reads and writes. Older/newer files are
/// reported as a version mismatch; migration is a caller decision.
pub const FILE_FORMAT_VERSION: &str = "1";

const ROOT_NODE_NAME: &str = "symforge_symbol";

/// Abbreviated element kind, used in directory and URL schemes.
pub const SHORT_ELEMENT_NAME: &str = "sym";
pub const LONG_ELEMENT_NAME: &str = "symbol";

/// Consumer of a symbol's granular change notifications.
///
/// Implemented by the presentation layer (e.g. a graphics scene mirroring
/// the symbol); the core never implements it. At registration time the
/// current content of all four collections is replayed as `*_added` calls
/// in positional order, so an implementation needs no special case for
/// "collection already populated". All calls arrive synchronously on the
/// mutating call's stack.
pub trait SymbolPresentation {
    fn pin_added(&self, index: usize, pin: &SymbolPin);
    fn pin_removed(&self, index: usize, pin: &SymbolPin);
    fn polygon_added(&self, index: usize, polygon: &Polygon);
    fn polygon_removed(&self, index: usize, polygon: &Polygon);
    fn circle_added(&self, index: usize, circle: &Circle);
    fn circle_removed(&self, index: usize, circle: &Circle);
    fn text_added(&self, index: usize, text: &Text);
    fn text_removed(&self, index: usize, text: &Text);
}

/// Forwards one collection's notifications to the presentation adapter.
/// Written once, instantiated per sub-object type.
struct Forwarder<T> {
    adapter: Rc<dyn SymbolPresentation>,
    added: fn(&dyn SymbolPresentation, usize, &T),
    removed: fn(&dyn SymbolPresentation, usize, &T),
}

impl<T> CollectionObserver<T> for Forwarder<T> {
    fn object_added(&self, index: usize, item: &T) {
        (self.added)(self.adapter.as_ref(), index, item);
    }

    fn object_removed(&self, index: usize, item: &T) {
        (self.removed)(self.adapter.as_ref(), index, item);
    }
}

/// The adapter plus the observer handles needed to unsubscribe it again.
struct RegisteredPresentation {
    adapter: Rc<dyn SymbolPresentation>,
    pins: Rc<dyn CollectionObserver<SymbolPin>>,
    polygons: Rc<dyn CollectionObserver<Polygon>>,
    circles: Rc<dyn CollectionObserver<Circle>>,
    texts: Rc<dyn CollectionObserver<Text>>,
}

/// A symbol library element.
pub struct Symbol {
    uuid: Uuid,
    version: Version,
    author: String,
    names: LocalizedNames,
    descriptions: LocalizedText,
    keywords: LocalizedText,
    deprecated: bool,
    pins: SymbolPinList,
    polygons: PolygonList,
    circles: CircleList,
    texts: TextList,
    directory: Option<PathBuf>,
    read_only: bool,
    published: bool,
    /// Pin UUIDs recorded when the symbol was published; empty while
    /// unpublished.
    baseline_pins: BTreeSet<Uuid>,
    presentation: Option<RegisteredPresentation>,
}

impl Symbol {
    /// Create a new, empty, unpublished symbol without a backing directory.
    pub fn new(
        uuid: Uuid,
        version: Version,
        author: impl Into<String>,
        name: ElementName,
        description: impl Into<String>,
        keywords: impl Into<String>,
    ) -> Self {
        Symbol {
            uuid,
            version,
            author: author.into(),
            names: LocalizedNames::new(name),
            descriptions: LocalizedText::new(description),
            keywords: LocalizedText::new(keywords),
            deprecated: false,
            pins: ObjectCollection::new(),
            polygons: ObjectCollection::new(),
            circles: ObjectCollection::new(),
            texts: ObjectCollection::new(),
            directory: None,
            read_only: false,
            published: false,
            baseline_pins: BTreeSet::new(),
            presentation: None,
        }
    }

    /// Load a symbol from its element directory.
    ///
    /// With `read_only` set the instance can be inspected and edited in
    /// memory but every save attempt fails; the flag cannot be cleared for
    /// the lifetime of the instance. An unsupported file format version is
    /// reported as [`ElementError::VersionMismatch`] so callers can decide
    /// between aborting and a best-effort import; no auto-migration happens.
    pub fn open(directory: impl Into<PathBuf>, read_only: bool) -> Result<Self, ElementError> {
        let directory = directory.into();
        let path = directory.join(SYMBOL_FILE_NAME);
        let text = fs::read_to_string(&path).map_err(|source| ElementError::Read {
            path: path.clone(),
            source,
        })?;
        let root = parse(&text)?;
        let mut symbol = match Symbol::from_sexpr(&root) {
            Err(ParseError::UnsupportedFormatVersion { found }) => {
                return Err(ElementError::VersionMismatch { found })
            }
            other => other?,
        };
        symbol.directory = Some(directory);
        symbol.read_only = read_only;
        info!(uuid = %symbol.uuid, path = %path.display(), read_only, "symbol opened");
        Ok(symbol)
    }

    // Metadata accessors

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn names(&self) -> &LocalizedNames {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut LocalizedNames {
        &mut self.names
    }

    pub fn descriptions(&self) -> &LocalizedText {
        &self.descriptions
    }

    pub fn descriptions_mut(&mut self) -> &mut LocalizedText {
        &mut self.descriptions
    }

    pub fn keywords(&self) -> &LocalizedText {
        &self.keywords
    }

    pub fn keywords_mut(&mut self) -> &mut LocalizedText {
        &mut self.keywords
    }

    pub fn deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn set_deprecated(&mut self, deprecated: bool) {
        self.deprecated = deprecated;
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    // Geometry accessors
    //
    // Pins are the published interface, so their membership is only
    // editable through the symbol; the other collections hand out full
    // mutable access.

    pub fn pins(&self) -> &SymbolPinList {
        &self.pins
    }

    /// Insert a pin at `index`. Fails with an interface violation once the
    /// symbol is published.
    pub fn insert_pin(&mut self, index: usize, pin: SymbolPin) -> Result<(), ElementError> {
        if self.published {
            return Err(ElementError::InterfaceViolation(
                "pins cannot be added to a published symbol".to_string(),
            ));
        }
        self.pins.insert(index, pin)?;
        Ok(())
    }

    /// Append a pin; see [`Symbol::insert_pin`].
    pub fn add_pin(&mut self, pin: SymbolPin) -> Result<(), ElementError> {
        self.insert_pin(self.pins.len(), pin)
    }

    /// Remove the pin at `index`. Fails with an interface violation once
    /// the symbol is published.
    pub fn remove_pin_at(&mut self, index: usize) -> Result<SymbolPin, ElementError> {
        if self.published {
            return Err(ElementError::InterfaceViolation(
                "pins cannot be removed from a published symbol".to_string(),
            ));
        }
        Ok(self.pins.remove_at(index)?)
    }

    /// Attribute edits of a pin are allowed in every state; only membership
    /// is frozen by publication.
    pub fn pin_mut(&mut self, uuid: &Uuid) -> Option<&mut SymbolPin> {
        self.pins.get_mut(uuid)
    }

    pub fn add_pin_observer(&mut self, observer: Rc<dyn CollectionObserver<SymbolPin>>) {
        self.pins.add_observer(observer);
    }

    pub fn remove_pin_observer(&mut self, observer: &Rc<dyn CollectionObserver<SymbolPin>>) -> bool {
        self.pins.remove_observer(observer)
    }

    pub fn polygons(&self) -> &PolygonList {
        &self.polygons
    }

    pub fn polygons_mut(&mut self) -> &mut PolygonList {
        &mut self.polygons
    }

    pub fn circles(&self) -> &CircleList {
        &self.circles
    }

    pub fn circles_mut(&mut self) -> &mut CircleList {
        &mut self.circles
    }

    pub fn texts(&self) -> &TextList {
        &self.texts
    }

    pub fn texts_mut(&mut self) -> &mut TextList {
        &mut self.texts
    }

    // Publication

    pub fn is_published(&self) -> bool {
        self.published
    }

    /// One-way transition to the published state; records the current pin
    /// UUID set as the interface baseline. Idempotent.
    pub fn mark_published(&mut self) {
        if self.published {
            return;
        }
        self.published = true;
        self.baseline_pins = self.pins.uuids().collect();
        debug!(uuid = %self.uuid, pins = self.baseline_pins.len(), "symbol published");
    }

    /// Validate the interface-stability invariant against the baseline
    /// recorded at publish time. Also run on every save.
    pub fn check_interface_stability(&self) -> Result<(), ElementError> {
        if !self.published {
            return Ok(());
        }
        let current: BTreeSet<Uuid> = self.pins.uuids().collect();
        let added = current.difference(&self.baseline_pins).count();
        let removed = self.baseline_pins.difference(&current).count();
        if added > 0 || removed > 0 {
            return Err(ElementError::InterfaceViolation(format!(
                "pin membership differs from the published baseline ({added} added, {removed} removed)"
            )));
        }
        Ok(())
    }

    // Presentation binding

    /// Register the single presentation adapter.
    ///
    /// Subscribes the adapter to all four collections and replays their
    /// current content as `*_added` calls (pins, polygons, circles, texts,
    /// each in positional order) before returning. Fails when another
    /// adapter is still registered.
    pub fn register_presentation(
        &mut self,
        adapter: Rc<dyn SymbolPresentation>,
    ) -> Result<(), ElementError> {
        if self.presentation.is_some() {
            return Err(ElementError::AlreadyRegistered);
        }

        let pins: Rc<dyn CollectionObserver<SymbolPin>> = Rc::new(Forwarder {
            adapter: adapter.clone(),
            added: |a, i, p| a.pin_added(i, p),
            removed: |a, i, p| a.pin_removed(i, p),
        });
        let polygons: Rc<dyn CollectionObserver<Polygon>> = Rc::new(Forwarder {
            adapter: adapter.clone(),
            added: |a, i, p| a.polygon_added(i, p),
            removed: |a, i, p| a.polygon_removed(i, p),
        });
        let circles: Rc<dyn CollectionObserver<Circle>> = Rc::new(Forwarder {
            adapter: adapter.clone(),
            added: |a, i, c| a.circle_added(i, c),
            removed: |a, i, c| a.circle_removed(i, c),
        });
        let texts: Rc<dyn CollectionObserver<Text>> = Rc::new(Forwarder {
            adapter: adapter.clone(),
            added: |a, i, t| a.text_added(i, t),
            removed: |a, i, t| a.text_removed(i, t),
        });

        self.pins.add_observer(pins.clone());
        self.polygons.add_observer(polygons.clone());
        self.circles.add_observer(circles.clone());
        self.texts.add_observer(texts.clone());

        for (index, pin) in self.pins.iter().enumerate() {
            adapter.pin_added(index, pin);
        }
        for (index, polygon) in self.polygons.iter().enumerate() {
            adapter.polygon_added(index, polygon);
        }
        for (index, circle) in self.circles.iter().enumerate() {
            adapter.circle_added(index, circle);
        }
        for (index, text) in self.texts.iter().enumerate() {
            adapter.text_added(index, text);
        }

        debug!(uuid = %self.uuid, "presentation adapter registered");
        self.presentation = Some(RegisteredPresentation {
            adapter,
            pins,
            polygons,
            circles,
            texts,
        });
        Ok(())
    }

    /// Unregister the given adapter. Fails when it is not the currently
    /// registered one (including when none is registered).
    pub fn unregister_presentation(
        &mut self,
        adapter: &Rc<dyn SymbolPresentation>,
    ) -> Result<(), ElementError> {
        let registered = match self.presentation.take() {
            Some(registered) if Rc::ptr_eq(&registered.adapter, adapter) => registered,
            other => {
                self.presentation = other;
                return Err(ElementError::NotRegistered);
            }
        };
        self.pins.remove_observer(&registered.pins);
        self.polygons.remove_observer(&registered.polygons);
        self.circles.remove_observer(&registered.circles);
        self.texts.remove_observer(&registered.texts);
        debug!(uuid = %self.uuid, "presentation adapter unregistered");
        Ok(())
    }

    // Persistence

    /// Save to the backing directory the element was opened from or last
    /// saved to.
    pub fn save(&self) -> Result<(), ElementError> {
        let directory = self.directory.clone().ok_or(ElementError::NoLocation)?;
        self.save_impl(&directory)
    }

    /// Save to `directory`, which becomes the new backing directory.
    pub fn save_to(&mut self, directory: impl Into<PathBuf>) -> Result<(), ElementError> {
        let directory = directory.into();
        self.save_impl(&directory)?;
        self.directory = Some(directory);
        Ok(())
    }

    fn save_impl(&self, directory: &Path) -> Result<(), ElementError> {
        if self.read_only {
            return Err(ElementError::ReadOnly {
                path: directory.join(SYMBOL_FILE_NAME),
            });
        }
        self.check_interface_stability()?;

        let text = format!("{}\n", self.to_sexpr());
        fs::create_dir_all(directory).map_err(|source| ElementError::Write {
            path: directory.to_path_buf(),
            source,
        })?;
        // Write the whole document to a temp file and rename it over the
        // old one, so a failed write never clobbers the previous state.
        let path = directory.join(SYMBOL_FILE_NAME);
        let tmp_path = directory.join(format!("{SYMBOL_FILE_NAME}.new"));
        fs::write(&tmp_path, text).map_err(|source| ElementError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| ElementError::Write {
            path: path.clone(),
            source,
        })?;
        info!(uuid = %self.uuid, path = %path.display(), "symbol saved");
        Ok(())
    }
}

impl ToSexpr for Symbol {
    /// Children are emitted in a fixed order (metadata first, then pins,
    /// polygons, circles and texts in collection order) so the output is
    /// deterministic and diffs stay minimal.
    fn to_sexpr(&self) -> List {
        let mut root = List::new(ROOT_NODE_NAME);
        root.push_list(codec::token_list("format_version", FILE_FORMAT_VERSION));
        root.push_list(codec::token_list("uuid", self.uuid.to_string()));
        for (locale, name) in self.names.iter() {
            let mut node = List::new("name");
            node.push_token(locale);
            node.push_string(name.as_str());
            root.push_list(node);
        }
        for (locale, text) in self.descriptions.iter() {
            let mut node = List::new("description");
            node.push_token(locale);
            node.push_string(text);
            root.push_list(node);
        }
        for (locale, text) in self.keywords.iter() {
            let mut node = List::new("keywords");
            node.push_token(locale);
            node.push_string(text);
            root.push_list(node);
        }
        root.push_list(codec::string_list("author", &self.author));
        root.push_list(codec::string_list("version", self.version.to_string()));
        root.push_list(codec::bool_list("deprecated", self.deprecated));
        root.push_list(codec::bool_list("published", self.published));
        for pin in self.pins.iter() {
            root.push_list(pin.to_sexpr());
        }
        for polygon in self.polygons.iter() {
            root.push_list(polygon.to_sexpr());
        }
        for circle in self.circles.iter() {
            root.push_list(circle.to_sexpr());
        }
        for text in self.texts.iter() {
            root.push_list(text.to_sexpr());
        }
        root
    }
}

impl FromSexpr for Symbol {
    /// Unknown children are ignored for forward compatibility; missing
    /// required children and duplicate sub-object UUIDs are rejected.
    fn from_sexpr(root: &List) -> Result<Self, ParseError> {
        if root.name() != ROOT_NODE_NAME {
            return Err(ParseError::UnexpectedRoot {
                found: root.name().to_string(),
                expected: ROOT_NODE_NAME.to_string(),
            });
        }
        let format_version = root.child_token("format_version")?;
        if format_version != FILE_FORMAT_VERSION {
            return Err(ParseError::UnsupportedFormatVersion {
                found: format_version.to_string(),
            });
        }

        let uuid = codec::parse_uuid(root.child_token("uuid")?)?;
        let names = parse_localized(root, "name")?;
        let default_name = names
            .iter()
            .find(|(locale, _)| *locale == DEFAULT_LOCALE)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| ParseError::MissingChild {
                parent: ROOT_NODE_NAME.to_string(),
                child: format!("name {DEFAULT_LOCALE}"),
            })?;
        let descriptions = parse_localized(root, "description")?;
        let keywords = parse_localized(root, "keywords")?;
        let author = root.child_string("author")?.to_string();
        let version = Version::from_str(root.child_string("version")?)?;
        let deprecated = match root.find("deprecated") {
            Some(node) => codec::parse_bool(node)?,
            None => false,
        };
        let published = match root.find("published") {
            Some(node) => codec::parse_bool(node)?,
            None => false,
        };

        let mut symbol = Symbol::new(
            uuid,
            version,
            author,
            ElementName::new(default_name)?,
            String::new(),
            String::new(),
        );
        for (locale, value) in names {
            symbol.names.insert(locale, ElementName::new(value)?);
        }
        for (locale, value) in descriptions {
            symbol.descriptions.insert(locale, value);
        }
        for (locale, value) in keywords {
            symbol.keywords.insert(locale, value);
        }
        symbol.deprecated = deprecated;

        for node in root.find_all("pin") {
            let pin = SymbolPin::from_sexpr(node)?;
            let pin_uuid = pin.uuid();
            symbol
                .pins
                .push(pin)
                .map_err(|_| duplicate("pin", pin_uuid))?;
        }
        for node in root.find_all("polygon") {
            let polygon = Polygon::from_sexpr(node)?;
            let polygon_uuid = polygon.uuid();
            symbol
                .polygons
                .push(polygon)
                .map_err(|_| duplicate("polygon", polygon_uuid))?;
        }
        for node in root.find_all("circle") {
            let circle = Circle::from_sexpr(node)?;
            let circle_uuid = circle.uuid();
            symbol
                .circles
                .push(circle)
                .map_err(|_| duplicate("circle", circle_uuid))?;
        }
        for node in root.find_all("text") {
            let text = Text::from_sexpr(node)?;
            let text_uuid = text.uuid();
            symbol
                .texts
                .push(text)
                .map_err(|_| duplicate("text", text_uuid))?;
        }

        if published {
            symbol.mark_published();
        }
        Ok(symbol)
    }
}

fn duplicate(kind: &str, uuid: Uuid) -> ParseError {
    ParseError::DuplicateIdentifier {
        kind: kind.to_string(),
        id: uuid.to_string(),
    }
}

/// Collect `(node locale "value")` children in document order.
fn parse_localized(root: &List, node_name: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut entries = Vec::new();
    for node in root.find_all(node_name) {
        let locale = node.token_at(0)?.to_string();
        let value = node.string_at(1)?.to_string();
        entries.push((locale, value));
    }
    Ok(entries)
}

/// Structural equality over identity, metadata and the four collections in
/// order. The backing directory, read-only flag and presentation slot are
/// runtime state and do not participate; the publish baseline is derived
/// from the published flag and the pins.
impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
            && self.version == other.version
            && self.author == other.author
            && self.names == other.names
            && self.descriptions == other.descriptions
            && self.keywords == other.keywords
            && self.deprecated == other.deprecated
            && self.published == other.published
            && self.pins == other.pins
            && self.polygons == other.polygons
            && self.circles == other.circles
            && self.texts == other.texts
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("uuid", &self.uuid)
            .field("name", &self.names.default_name().as_str())
            .field("version", &self.version.to_string())
            .field("published", &self.published)
            .field("pins", &self.pins.len())
            .field("polygons", &self.polygons.len())
            .field("circles", &self.circles.len())
            .field("texts", &self.texts.len())
            .finish()
    }
}
