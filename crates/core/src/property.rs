//! Typed properties and their type-erased view.
//!
//! A [`Property`] pairs an identifier with a value codec. Capabilities are
//! compositional: the *retained* capability adds a stored current value, the
//! *settable* capability allows inbound commands and listener registration.
//! Handles are cheap clones sharing one inner state, so the application can
//! keep a typed handle while the node tree holds an erased one — the one-time
//! topic binding guarantees a single parent regardless of how many handles
//! exist.

use std::sync::{Arc, Mutex, OnceLock};

use homielink_domain::id::Identifier;
use homielink_domain::payload;
use homielink_domain::topic::TopicPath;
use homielink_domain::unit::Unit;
use homielink_domain::value::{Datatype, ValueCodec};

use crate::error::HomieError;
use crate::extension::PropertyExtension;
use crate::sync::lock;

type Listener<C> = Arc<dyn Fn(&Property<C>, <C as ValueCodec>::Value) + Send + Sync>;

struct Inner<C: ValueCodec> {
    id: Identifier,
    name: String,
    settable: bool,
    unit: Unit,
    codec: C,
    /// Present iff the property carries the retained capability.
    retained: Option<Mutex<Option<C::Value>>>,
    extensions: Vec<Arc<dyn PropertyExtension>>,
    listener: Mutex<Option<Listener<C>>>,
    /// Set exactly once when the owning device binds its topic tree.
    topic: OnceLock<TopicPath>,
}

/// A single typed, addressable attribute of a node.
pub struct Property<C: ValueCodec> {
    inner: Arc<Inner<C>>,
}

impl<C: ValueCodec> Clone for Property<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ValueCodec> Property<C> {
    /// Start building a property from its id and codec.
    #[must_use]
    pub fn builder(id: Identifier, codec: C) -> PropertyBuilder<C> {
        PropertyBuilder {
            id,
            codec,
            name: String::new(),
            settable: false,
            unit: Unit::NONE,
            retained: false,
            initial: None,
            initial_supplied_twice: false,
            extensions: Vec::new(),
        }
    }

    /// The property id (the last topic segment).
    #[must_use]
    pub fn id(&self) -> &Identifier {
        &self.inner.id
    }

    /// The display name, empty by default.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether inbound commands are accepted on the `set` subtopic.
    #[must_use]
    pub fn settable(&self) -> bool {
        self.inner.settable
    }

    /// The advertised measurement unit.
    #[must_use]
    pub fn unit(&self) -> &Unit {
        &self.inner.unit
    }

    /// The value codec driving encode/decode for this property.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.inner.codec
    }

    /// Whether the property carries the retained capability.
    #[must_use]
    pub fn is_retained(&self) -> bool {
        self.inner.retained.is_some()
    }

    /// The full topic path, present once the property is bound into a
    /// device tree.
    #[must_use]
    pub fn topic(&self) -> Option<&TopicPath> {
        self.inner.topic.get()
    }

    /// The current stored value of a retained property.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::NotRetained`] when the property does not carry
    /// the retained capability — a non-retained property stores nothing and
    /// its current value is meaningless.
    pub fn value(&self) -> Result<Option<C::Value>, HomieError> {
        match &self.inner.retained {
            Some(cell) => Ok(lock(cell).clone()),
            None => Err(HomieError::NotRetained(self.inner.id.clone())),
        }
    }

    /// Register the listener invoked for decoded inbound `set` commands.
    ///
    /// Replaces any previously registered listener.
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::NotSettable`] when the property does not carry
    /// the settable capability.
    pub fn set_listener<F>(&self, listener: F) -> Result<(), HomieError>
    where
        F: Fn(&Property<C>, C::Value) + Send + Sync + 'static,
    {
        if !self.inner.settable {
            return Err(HomieError::NotSettable(self.inner.id.clone()));
        }
        *lock(&self.inner.listener) = Some(Arc::new(listener));
        Ok(())
    }

    /// Overwrite the stored value of a retained property; no-op otherwise.
    pub(crate) fn store_value(&self, value: C::Value) {
        if let Some(cell) = &self.inner.retained {
            *lock(cell) = Some(value);
        }
    }
}

/// Step-by-step builder for [`Property`].
pub struct PropertyBuilder<C: ValueCodec> {
    id: Identifier,
    codec: C,
    name: String,
    settable: bool,
    unit: Unit,
    retained: bool,
    initial: Option<C::Value>,
    initial_supplied_twice: bool,
    extensions: Vec<Arc<dyn PropertyExtension>>,
}

impl<C: ValueCodec> PropertyBuilder<C> {
    /// Set the display name (default: empty).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable the settable capability (default: off).
    #[must_use]
    pub fn settable(mut self, settable: bool) -> Self {
        self.settable = settable;
        self
    }

    /// Set the advertised unit (default: [`Unit::NONE`]).
    #[must_use]
    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Add the retained capability: the property stores its last published
    /// value and republishes it during device announcement.
    #[must_use]
    pub fn retained(mut self) -> Self {
        self.retained = true;
        self
    }

    /// Seed the stored value of a retained property. May be supplied at
    /// most once.
    #[must_use]
    pub fn initial_value(mut self, value: C::Value) -> Self {
        if self.initial.is_some() {
            self.initial_supplied_twice = true;
        } else {
            self.initial = Some(value);
        }
        self
    }

    /// Attach a property-level extension; order is preserved.
    #[must_use]
    pub fn extension(mut self, extension: Arc<dyn PropertyExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Consume the builder, validate, and return a [`Property`].
    ///
    /// # Errors
    ///
    /// Returns [`HomieError::InitialValueSetTwice`] when
    /// [`initial_value`](Self::initial_value) was called twice,
    /// [`HomieError::InitialValueWithoutRetained`] when an initial value was
    /// supplied without the retained capability, or a codec error when the
    /// initial value is outside the codec's domain.
    pub fn build(self) -> Result<Property<C>, HomieError> {
        if self.initial_supplied_twice {
            return Err(HomieError::InitialValueSetTwice(self.id));
        }
        if self.initial.is_some() && !self.retained {
            return Err(HomieError::InitialValueWithoutRetained(self.id));
        }
        if let Some(initial) = &self.initial {
            // An out-of-domain seed must fail here, not at announce time.
            self.codec.to_wire(initial)?;
        }
        let retained = self.retained.then(|| Mutex::new(self.initial));
        Ok(Property {
            inner: Arc::new(Inner {
                id: self.id,
                name: self.name,
                settable: self.settable,
                unit: self.unit,
                codec: self.codec,
                retained,
                extensions: self.extensions,
                listener: Mutex::new(None),
                topic: OnceLock::new(),
            }),
        })
    }
}

/// The type-erased property view used by nodes, the device lifecycle, and
/// extension hooks.
pub trait AnyProperty: Send + Sync {
    /// The property id.
    fn id(&self) -> &Identifier;
    /// The display name.
    fn name(&self) -> &str;
    /// The advertised datatype.
    fn datatype(&self) -> Datatype;
    /// Whether inbound commands are accepted.
    fn settable(&self) -> bool;
    /// Whether the property stores its last published value.
    fn is_retained(&self) -> bool;
    /// The advertised unit.
    fn unit(&self) -> &Unit;
    /// The optional `$format` advertisement.
    fn format(&self) -> Option<String>;
    /// The full topic path, present once bound into a device tree.
    fn topic(&self) -> Option<&TopicPath>;
    /// Property-level extensions, in attachment order.
    fn extensions(&self) -> &[Arc<dyn PropertyExtension>];
    /// The stored value of a retained property, already encoded for the
    /// wire. `None` for non-retained or still unseeded properties.
    fn retained_wire_value(&self) -> Option<String>;
    /// Decode an inbound `set` payload and invoke the listener.
    ///
    /// Payloads that fail to decode are logged and dropped; the
    /// subscription stream must survive malformed commands.
    fn apply_set_payload(&self, payload: &[u8]);
    /// Record the one-time topic binding.
    fn bind(&self, topic: TopicPath) -> Result<(), HomieError>;
}

impl<C: ValueCodec + 'static> AnyProperty for Property<C> {
    fn id(&self) -> &Identifier {
        &self.inner.id
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn datatype(&self) -> Datatype {
        self.inner.codec.datatype()
    }

    fn settable(&self) -> bool {
        self.inner.settable
    }

    fn is_retained(&self) -> bool {
        self.inner.retained.is_some()
    }

    fn unit(&self) -> &Unit {
        &self.inner.unit
    }

    fn format(&self) -> Option<String> {
        self.inner.codec.format()
    }

    fn topic(&self) -> Option<&TopicPath> {
        self.inner.topic.get()
    }

    fn extensions(&self) -> &[Arc<dyn PropertyExtension>] {
        &self.inner.extensions
    }

    fn retained_wire_value(&self) -> Option<String> {
        let cell = self.inner.retained.as_ref()?;
        let value = lock(cell).clone()?;
        // Values are validated before storage, so encoding cannot fail.
        self.inner.codec.to_wire(&value).ok()
    }

    fn apply_set_payload(&self, raw: &[u8]) {
        let wire = match payload::decode(raw) {
            Ok(wire) => wire,
            Err(err) => {
                tracing::warn!(%err, property = %self.inner.id, "dropping non-UTF-8 set payload");
                return;
            }
        };
        let value = match self.inner.codec.from_wire(&wire) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, property = %self.inner.id, payload = %wire, "dropping out-of-domain set command");
                return;
            }
        };
        // Clone the listener out so the slot is free during the callback;
        // the callback may itself read the property or replace the listener.
        let listener = lock(&self.inner.listener).clone();
        if let Some(listener) = listener {
            listener(self, value);
        }
    }

    fn bind(&self, topic: TopicPath) -> Result<(), HomieError> {
        self.inner.topic.set(topic).map_err(|_| HomieError::AlreadyBound {
            kind: "property",
            id: self.inner.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use homielink_domain::value::{BooleanCodec, FloatCodec, IntegerCodec, StringCodec};

    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[test]
    fn should_build_with_defaults() {
        let property = Property::builder(id("temperature"), FloatCodec::new())
            .build()
            .unwrap();
        assert_eq!(property.name(), "");
        assert!(!property.settable());
        assert!(!property.is_retained());
        assert_eq!(property.unit(), &Unit::NONE);
        assert!(property.topic().is_none());
    }

    #[test]
    fn should_store_initial_value_when_retained() {
        let property = Property::builder(id("temperature"), FloatCodec::new())
            .retained()
            .initial_value(21.5)
            .build()
            .unwrap();
        assert_eq!(property.value().unwrap(), Some(21.5));
    }

    #[test]
    fn should_reject_initial_value_without_retained_capability() {
        let result = Property::builder(id("temperature"), FloatCodec::new())
            .initial_value(21.5)
            .build();
        assert!(matches!(
            result,
            Err(HomieError::InitialValueWithoutRetained(_))
        ));
    }

    #[test]
    fn should_reject_initial_value_supplied_twice() {
        let result = Property::builder(id("temperature"), FloatCodec::new())
            .retained()
            .initial_value(21.5)
            .initial_value(22.0)
            .build();
        assert!(matches!(result, Err(HomieError::InitialValueSetTwice(_))));
    }

    #[test]
    fn should_reject_out_of_range_initial_value() {
        let codec = FloatCodec::with_range(Some(0.0), Some(100.0)).unwrap();
        let result = Property::builder(id("humidity"), codec)
            .retained()
            .initial_value(150.0)
            .build();
        assert!(matches!(result, Err(HomieError::Value(_))));
    }

    #[test]
    fn should_reject_value_query_on_non_retained_property() {
        let property = Property::builder(id("motion"), BooleanCodec).build().unwrap();
        assert!(matches!(property.value(), Err(HomieError::NotRetained(_))));
    }

    #[test]
    fn should_reject_listener_on_non_settable_property() {
        let property = Property::builder(id("temperature"), FloatCodec::new())
            .build()
            .unwrap();
        let result = property.set_listener(|_, _| {});
        assert!(matches!(result, Err(HomieError::NotSettable(_))));
    }

    #[test]
    fn should_invoke_listener_with_decoded_value() {
        let property = Property::builder(id("target"), IntegerCodec::new())
            .settable(true)
            .build()
            .unwrap();
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        property
            .set_listener(move |prop, value| {
                assert_eq!(prop.id().as_str(), "target");
                assert_eq!(value, 42);
                flag.store(true, Ordering::SeqCst);
            })
            .unwrap();

        AnyProperty::apply_set_payload(&property, b"42");
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn should_drop_undecodable_set_payload_without_invoking_listener() {
        let codec = IntegerCodec::with_range(Some(0), Some(100)).unwrap();
        let property = Property::builder(id("target"), codec)
            .settable(true)
            .build()
            .unwrap();
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        property
            .set_listener(move |_, _| flag.store(true, Ordering::SeqCst))
            .unwrap();

        AnyProperty::apply_set_payload(&property, b"150");
        AnyProperty::apply_set_payload(&property, b"not-a-number");
        AnyProperty::apply_set_payload(&property, &[0xff, 0xfe]);
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn should_bind_topic_exactly_once() {
        let property = Property::builder(id("temperature"), FloatCodec::new())
            .build()
            .unwrap();
        let topic = TopicPath::device("homie/", &id("car"))
            .child(&id("engine"))
            .child(&id("temperature"));

        AnyProperty::bind(&property, topic.clone()).unwrap();
        assert_eq!(property.topic(), Some(&topic));

        let second = AnyProperty::bind(&property, topic);
        assert!(matches!(second, Err(HomieError::AlreadyBound { .. })));
    }

    #[test]
    fn should_share_state_between_cloned_handles() {
        let property = Property::builder(id("temperature"), FloatCodec::new())
            .retained()
            .build()
            .unwrap();
        let clone = property.clone();
        property.store_value(18.0);
        assert_eq!(clone.value().unwrap(), Some(18.0));
    }

    #[test]
    fn should_erase_to_any_property() {
        let property = Property::builder(id("mode"), StringCodec).build().unwrap();
        let erased: Box<dyn AnyProperty> = Box::new(property);
        assert_eq!(erased.datatype(), Datatype::String);
        assert_eq!(erased.format(), None);
        assert!(erased.retained_wire_value().is_none());
    }
}
