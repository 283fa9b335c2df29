use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use super::Mixin;
use crate::core::error::{MixinError, MixinResult};
use crate::core::export::{write_value, JsonWriter, StructuredWriter, XmlWriter};

const IMPORT: &str = "structured import of a mixin";

impl Mixin {
    /// Writes every backing object in resolution order through its own
    /// export, then every ad-hoc member in insertion order.
    ///
    /// A backing object mutably borrowed elsewhere fails the export with
    /// [`MixinError::Busy`].
    pub fn export(&self, writer: &mut dyn StructuredWriter) -> MixinResult<()> {
        for backing in &self.composed {
            backing.read()?.export(writer)?;
        }

        for (name, value) in &self.members {
            if value.is_null() {
                if self.options.export_nulls {
                    writer.write_scalar(name, value)?;
                }
                continue;
            }
            write_value(writer, name, value)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> MixinResult<JsonValue> {
        let mut writer = JsonWriter::new();
        self.export(&mut writer)?;
        Ok(writer.finish()?)
    }

    pub fn to_xml(&self) -> MixinResult<String> {
        let mut writer = XmlWriter::new();
        self.export(&mut writer)?;
        Ok(writer.finish()?)
    }

    /// Rebuilding a mixin from exported data is not supported.
    ///
    /// Always fails with [`MixinError::NotImplemented`]; exported documents
    /// do not round-trip.
    pub fn import(_source: &str) -> MixinResult<Mixin> {
        Err(MixinError::NotImplemented(IMPORT))
    }
}

impl<'de> Deserialize<'de> for Mixin {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(D::Error::custom(MixinError::NotImplemented(IMPORT)))
    }
}
