//! Copying an object's readable properties into an open, ordered map.

use indexmap::IndexMap;

use crate::core::properties::Properties;
use crate::core::value::Value;

/// Open property bag keyed by property name, in insertion order
pub type Expando = IndexMap<String, Value>;

/// Snapshot of every readable property of `object`, in declaration order
pub fn flatten(object: &dyn Properties) -> Expando {
    let mut expando = Expando::new();
    expando.with_object(object);
    expando
}

/// Fluent filling of an [`Expando`]
pub trait ExpandoExt {
    /// Copies the readable properties of `object`, replacing existing keys
    fn with_object(&mut self, object: &dyn Properties) -> &mut Self;

    fn with_pairs<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>;

    fn with(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self;
}

impl ExpandoExt for Expando {
    fn with_object(&mut self, object: &dyn Properties) -> &mut Self {
        for descriptor in object.descriptors().iter().filter(|d| d.access.can_read()) {
            if let Some(value) = object.get_property(descriptor.name) {
                self.insert(descriptor.name.to_string(), value);
            }
        }
        self
    }

    fn with_pairs<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in pairs {
            self.insert(name.into(), value.into());
        }
        self
    }

    fn with(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CoercionError;
    use crate::core::properties::{Access, PropertyDescriptor};
    use crate::core::value::ValueKind;
    use serde::Serialize;

    #[derive(Debug, Default, Clone, Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Person {
        name: String,
        age: i64,
        tags: Vec<Value>,
        manager: Option<String>,
    }

    crate::properties!(Person {
        "Name" => name: String,
        "Age" => age: i64,
        "Tags" => tags: Vec<Value>,
        "Manager" => manager: Option<String>,
    });

    struct Vault {
        label: String,
    }

    const VAULT_PROPERTIES: &[PropertyDescriptor] = &[
        PropertyDescriptor::new("Label", ValueKind::Text, false, Access::ReadWrite),
        PropertyDescriptor::new("Combination", ValueKind::Text, false, Access::Write),
    ];

    impl Properties for Vault {
        fn type_name(&self) -> &'static str {
            "Vault"
        }

        fn descriptors(&self) -> &'static [PropertyDescriptor] {
            VAULT_PROPERTIES
        }

        fn get_property(&self, name: &str) -> Option<Value> {
            (name == "Label").then(|| Value::from(self.label.as_str()))
        }

        fn set_property(&mut self, _name: &str, _value: Value) -> Result<bool, CoercionError> {
            Ok(false)
        }
    }

    #[test]
    fn test_flatten_serializes_like_the_struct() {
        let person = Person {
            name: "Ada".to_string(),
            age: 36,
            tags: vec![Value::from("math")],
            manager: None,
        };

        let flat = serde_json::to_value(flatten(&person)).unwrap();
        let direct = serde_json::to_value(&person).unwrap();
        assert_eq!(flat, direct);
        assert_eq!(
            serde_json::to_string(&flatten(&person)).unwrap(),
            serde_json::to_string(&person).unwrap()
        );
    }

    #[test]
    fn test_flatten_keeps_declaration_order() {
        let keys: Vec<String> = flatten(&Person::default()).into_keys().collect();
        assert_eq!(keys, ["Name", "Age", "Tags", "Manager"]);
    }

    #[test]
    fn test_write_only_properties_are_excluded() {
        let vault = Vault {
            label: "cellar".to_string(),
        };
        let flat = flatten(&vault);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["Label"], Value::from("cellar"));
    }

    #[test]
    fn test_expando_builders() {
        let person = Person {
            name: "Ada".to_string(),
            ..Default::default()
        };
        let mut expando = Expando::new();
        expando
            .with("Id", 7)
            .with_object(&person)
            .with_pairs([("Name", "Grace"), ("Team", "compilers")]);

        assert_eq!(expando["Id"], Value::Int(7));
        assert_eq!(expando["Name"], Value::from("Grace"));
        assert_eq!(expando["Team"], Value::from("compilers"));
        assert_eq!(expando.get_index(0).map(|(k, _)| k.as_str()), Some("Id"));
    }
}
