use mixin::backings::{Address, Contact};
use mixin::core::registry::registered_types;
use mixin::{
    flatten, shared, Access, CoercionError, MixinError, Mixin, MixinOptions, Properties,
    PropertyDescriptor, PropertyValue, Reify, ReifyPolicy, Value,
};
use std::rc::Rc;

/// Backing type with a computed property
#[derive(Debug, Default)]
struct Thermometer {
    celsius: f64,
}

const THERMOMETER_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::of::<f64>("Celsius", Access::ReadWrite),
    PropertyDescriptor::of::<f64>("Fahrenheit", Access::ReadWrite),
];

impl Properties for Thermometer {
    fn type_name(&self) -> &'static str {
        "Thermometer"
    }

    fn descriptors(&self) -> &'static [PropertyDescriptor] {
        THERMOMETER_PROPERTIES
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        match name {
            "Celsius" => Some(Value::Float(self.celsius)),
            "Fahrenheit" => Some(Value::Float(self.celsius * 9.0 / 5.0 + 32.0)),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<bool, CoercionError> {
        match name {
            "Celsius" => self.celsius = f64::from_value(value)?,
            "Fahrenheit" => self.celsius = (f64::from_value(value)? - 32.0) * 5.0 / 9.0,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Reify for Thermometer {
    const TYPE_NAME: &'static str = "Thermometer";

    fn property_descriptors() -> &'static [PropertyDescriptor] {
        THERMOMETER_PROPERTIES
    }

    fn construct() -> Result<Self, MixinError> {
        Ok(Self::default())
    }
}

#[derive(Debug, Default)]
struct Ticket {
    number: u32,
    title: String,
}

mixin::properties!(Ticket {
    "Number" => number: u32,
    "Title" => title: String,
});

mixin::register_backing!(Ticket, "Issue tracker ticket");

#[test]
fn test_contact_and_address_scenario() {
    let contact = shared(Contact {
        name: "me".to_string(),
        mail_to: "me@somewhere.org".to_string(),
        phone: None,
    });
    let address = shared(Address::default());

    let mut mixin = Mixin::new().with("Nickname", "m");
    mixin
        .compose_with(contact.clone())
        .unwrap()
        .compose_with(address.clone())
        .unwrap();

    mixin.set("Street", "1 Main St").unwrap();
    mixin.set("Phone", "+64 4 ...").unwrap();
    mixin.set("Birthday", "1990-01-01").unwrap();

    assert_eq!(address.borrow().street, "1 Main St");
    assert_eq!(contact.borrow().phone.as_deref(), Some("+64 4 ..."));
    assert_eq!(mixin.member("Birthday"), Some(&Value::from("1990-01-01")));

    let names = mixin.member_names();
    for expected in ["Nickname", "Birthday", "Name", "MailTo", "Phone", "Street", "Country"] {
        assert!(names.contains(expected), "missing {expected}");
    }
}

#[test]
fn test_computed_properties_stay_live() {
    let thermometer = shared(Thermometer { celsius: 100.0 });
    let mut mixin = Mixin::new();
    mixin.compose_with(thermometer.clone()).unwrap();

    assert_eq!(mixin.get("Fahrenheit").unwrap(), Value::Float(212.0));

    mixin.set("Fahrenheit", 32).unwrap();
    assert_eq!(thermometer.borrow().celsius, 0.0);
    assert_eq!(mixin.get_as::<f64>("Celsius").unwrap(), 0.0);

    assert!(matches!(
        mixin.set("Celsius", "warm"),
        Err(MixinError::TypeCoercion { .. })
    ));
}

#[test]
fn test_reify_user_type_from_text_members() {
    let mut mixin = Mixin::new().with("Celsius", "21.5").with("Room", "lab");
    let thermometer = mixin.reify_as::<Thermometer>().unwrap();

    assert_eq!(thermometer.borrow().celsius, 21.5);
    assert_eq!(mixin.ad_hoc_names().collect::<Vec<_>>(), ["Room"]);
    assert!(Rc::ptr_eq(
        &thermometer,
        &mixin.reify_as::<Thermometer>().unwrap()
    ));
}

#[test]
fn test_registered_user_type_is_reified_by_name() {
    assert!(registered_types().iter().any(|d| d.name == "Ticket"));

    let mut mixin = Mixin::new().with("Number", "17").with("Title", "Crash on start");
    let ticket = mixin.reify_named("Ticket").unwrap();

    assert_eq!(ticket.borrow().get_property("Number"), Some(Value::UInt(17)));
    assert_eq!(mixin.reify_as::<Ticket>().unwrap().borrow().title, "Crash on start");
}

#[test]
fn test_skip_invalid_policy_end_to_end() {
    let options = MixinOptions {
        reify_policy: ReifyPolicy::SkipInvalid,
        ..Default::default()
    };
    let mut mixin = Mixin::with_options(options)
        .with("Number", -4)
        .with("Title", "Negative");

    let ticket = mixin.reify_as::<Ticket>().unwrap();
    assert_eq!(ticket.borrow().number, 0);
    assert_eq!(mixin.get("Number").unwrap(), Value::Int(-4));
    assert_eq!(mixin.get("Title").unwrap(), Value::from("Negative"));
}

#[test]
fn test_flatten_and_export_agree() {
    let address = Address {
        street: "1 Main St".to_string(),
        city: "Wellington".to_string(),
        postal_code: None,
        country: "NZL".to_string(),
    };
    let flat = flatten(&address);
    assert_eq!(flat["PostalCode"], Value::Null);

    let mut mixin = Mixin::new();
    mixin.compose_with(shared(address)).unwrap();
    let exported = mixin.to_json().unwrap();

    assert_eq!(exported["Address"]["Street"], "1 Main St");
    assert!(exported["Address"].get("PostalCode").is_none());
}
