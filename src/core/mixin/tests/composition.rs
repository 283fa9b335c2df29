//! Tests for composing objects and other mixins

use super::*;

#[test]
fn test_new_mixin_is_empty() {
    let mixin = Mixin::new();
    assert!(mixin.is_empty());
    assert_eq!(mixin.composed_len(), 0);
    assert!(mixin.member_names().is_empty());
    assert_eq!(mixin.options(), &MixinOptions::default());
}

#[test]
fn test_member_builders_are_fluent() {
    let mut mixin = Mixin::new().with("X", 123).with("Z", "zeta");
    mixin
        .set_member("Y", true)
        .with_members([("A", 1), ("B", 2)]);

    assert_eq!(mixin.get("X").unwrap(), Value::Int(123));
    assert_eq!(mixin.get("Z").unwrap(), Value::from("zeta"));
    assert_eq!(mixin.get("Y").unwrap(), Value::Bool(true));
    assert_eq!(mixin.ad_hoc_names().collect::<Vec<_>>(), ["X", "Z", "Y", "A", "B"]);
}

#[test]
fn test_compose_prepends() {
    let mut mixin = Mixin::new();
    mixin.compose_with(me()).unwrap().compose_with(home()).unwrap();
    assert_eq!(mixin.composed_type_names(), ["Address", "Contact"]);
}

#[test]
fn test_absent_instance_is_rejected() {
    let mut mixin = Mixin::new();
    let result = mixin.compose_with(None::<Shared<Contact>>);
    assert!(matches!(result, Err(MixinError::NullReference)));
    assert_eq!(mixin.composed_len(), 0);
}

#[test]
fn test_mutably_borrowed_instance_is_rejected() {
    let contact = me();
    let mut mixin = Mixin::new();
    {
        let _guard = contact.borrow_mut();
        let result = mixin.compose_with(contact.clone());
        assert!(matches!(result, Err(MixinError::Busy { .. })));
    }
    assert_eq!(mixin.composed_len(), 0);

    mixin.compose_with(contact).unwrap();
    assert_eq!(mixin.composed_type_names(), ["Contact"]);
}

#[test]
fn test_duplicate_reference_is_rejected() {
    let contact = me();
    let mut mixin = Mixin::new();
    mixin.compose_with(contact.clone()).unwrap();

    match mixin.compose_with(contact) {
        Err(MixinError::DuplicateComposition { type_name }) => assert_eq!(type_name, "Contact"),
        other => panic!("Expected DuplicateComposition, got {other:?}"),
    }
    assert_eq!(mixin.composed_len(), 1);
}

/// Identity is by reference, so an equal but separate object is accepted
#[test]
fn test_equal_but_distinct_object_is_accepted() {
    let first = me();
    let second = me();
    assert_eq!(*first.borrow(), *second.borrow());

    let mut mixin = Mixin::new();
    mixin.compose_with(first).unwrap();
    mixin.compose_with(second).unwrap();
    assert_eq!(mixin.composed_len(), 2);
}

#[test]
fn test_compose_mixin_merges_members_and_objects() {
    let contact = me();
    let address = home();

    let mut other = Mixin::new().with("Name", "other").with("Phone", "+64 4 ...");
    other.compose_with(contact.clone()).unwrap();
    other.compose_with(address.clone()).unwrap();

    let mut mixin = Mixin::new().with("Name", "mine").with("Age", 40);
    mixin.compose_mixin(&other).unwrap();

    assert_eq!(mixin.get("Name").unwrap(), Value::from("other"));
    assert_eq!(mixin.get("Phone").unwrap(), Value::from("+64 4 ..."));
    assert_eq!(mixin.get("Age").unwrap(), Value::Int(40));
    // Each object is prepended in the other mixin's order
    assert_eq!(mixin.composed_type_names(), ["Contact", "Address"]);

    // Both mixins share the same backing objects
    mixin.set("Street", "2 High St").unwrap();
    assert_eq!(address.borrow().street, "2 High St");
    assert_eq!(other.get("Street").unwrap(), Value::from("2 High St"));
}

#[test]
fn test_compose_mixin_with_shared_object_changes_nothing() {
    let contact = me();
    let mut other = Mixin::new().with("Phone", "+64 4 ...");
    other.compose_with(home()).unwrap();
    other.compose_with(contact.clone()).unwrap();

    let mut mixin = Mixin::new();
    mixin.compose_with(contact).unwrap();

    assert!(matches!(
        mixin.compose_mixin(&other),
        Err(MixinError::DuplicateComposition { type_name: "Contact" })
    ));
    assert_eq!(mixin.composed_len(), 1);
    assert!(mixin.member("Phone").is_none());
}

#[test]
fn test_member_names_is_union_of_members_and_types() {
    let mut mixin = Mixin::new().with("Phone", "+64 4 ...").with("Name", "x");
    mixin.compose_with(me()).unwrap().compose_with(home()).unwrap();
    mixin.compose_with(shared(Badge::default())).unwrap();

    let names: Vec<String> = mixin.member_names().into_iter().collect();
    assert_eq!(
        names,
        ["Country", "Id", "MailTo", "Name", "Phone", "Secret", "Street"]
    );
}

#[test]
fn test_member_names_is_a_snapshot() {
    let mut mixin = Mixin::new();
    let before = mixin.member_names();
    mixin.set("Late", 1).unwrap();

    assert!(before.is_empty());
    assert!(mixin.member_names().contains("Late"));
}

#[test]
fn test_debug_lists_composed_types() {
    let mut mixin = Mixin::new().with("X", 1);
    mixin.compose_with(me()).unwrap();
    let debug = format!("{mixin:?}");
    assert!(debug.contains("Contact"));
    assert!(debug.contains("\"X\""));
}
