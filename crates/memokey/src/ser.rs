//! `serde::Serializer` that lowers any `Serialize` value into a [`Value`]
//!
//! Mapping:
//! - structs and maps → `Object`
//! - sequences, tuples and tuple structs → `Array`
//! - `None`, unit and unit structs → `Null`; `Some(x)` → `x`, rejected when
//!   `x` itself lowers to `Null` (`Some(None)`, `Some(())`)
//! - unit variants → the variant name; other variants → `{variant: payload}`
//!
//! Nesting is bounded by a depth limit. An owned value tree can only nest
//! without end when a `Serialize` impl walks a cyclic graph, so hitting the
//! limit is reported as [`Error::CyclicArgument`].

use serde::ser::{self, Serialize};

use crate::canonical::format_float;
use crate::error::{Error, Result};
use crate::value::{Object, Value};

/// Lower a `Serialize` value into a [`Value`]
///
/// # Arguments
/// * `value` - Any serializable value
/// * `limit` - Maximum nesting depth
pub fn to_value<T: Serialize + ?Sized>(value: &T, limit: usize) -> Result<Value> {
    value.serialize(ValueSerializer::new(limit))
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ValueSerializer {
    depth: usize,
    limit: usize,
}

impl ValueSerializer {
    pub(crate) fn new(limit: usize) -> Self {
        Self { depth: 0, limit }
    }

    fn nested(self) -> Result<Self> {
        let depth = self.depth + 1;
        if depth > self.limit {
            return Err(Error::CyclicArgument { limit: self.limit });
        }
        Ok(Self { depth, ..self })
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = VariantSerializer<SeqSerializer>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = VariantSerializer<MapSerializer>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        i128::try_from(v)
            .map(Value::Int)
            .map_err(|_| Error::Serialize(format!("integer {} out of range", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(v.iter().map(|&b| Value::Int(b.into())).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    // `Some(x)` lowers to `x`, so a payload that is itself null would share
    // `None`'s key
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value> {
        match value.serialize(self)? {
            Value::Null => Err(Error::Serialize(
                "Some(..) around a null value is indistinguishable from None".to_string(),
            )),
            payload => Ok(payload),
        }
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        let payload = value.serialize(self.nested()?)?;
        let mut obj = Object::with_capacity(1);
        obj.insert(variant, payload);
        Ok(Value::Object(obj))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer> {
        SeqSerializer::new(self, len.unwrap_or(0))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer> {
        SeqSerializer::new(self, len)
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqSerializer> {
        SeqSerializer::new(self, len)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSerializer<SeqSerializer>> {
        Ok(VariantSerializer {
            variant,
            inner: SeqSerializer::new(self.nested()?, len)?,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer> {
        MapSerializer::new(self, len.unwrap_or(0))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapSerializer> {
        MapSerializer::new(self, len)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSerializer<MapSerializer>> {
        Ok(VariantSerializer {
            variant,
            inner: MapSerializer::new(self.nested()?, len)?,
        })
    }
}

pub(crate) struct SeqSerializer {
    child: ValueSerializer,
    items: Vec<Value>,
}

impl SeqSerializer {
    fn new(parent: ValueSerializer, len: usize) -> Result<Self> {
        Ok(Self {
            child: parent.nested()?,
            items: Vec::with_capacity(len),
        })
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(self.child)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

pub(crate) struct MapSerializer {
    child: ValueSerializer,
    object: Object,
    pending_key: Option<String>,
}

impl MapSerializer {
    fn new(parent: ValueSerializer, len: usize) -> Result<Self> {
        Ok(Self {
            child: parent.nested()?,
            object: Object::with_capacity(len),
            pending_key: None,
        })
    }
}

/// Map keys are rendered to text; only scalar keys are accepted
fn map_key(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(format_float(f)),
        other => Err(Error::Serialize(format!(
            "map key must be a string, number or boolean, got {:?}",
            other
        ))),
    }
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        self.pending_key = Some(map_key(key.serialize(self.child)?)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::Serialize("map value without a key".to_string()))?;
        self.object.insert(key, value.serialize(self.child)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.object))
    }
}

impl ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.object.insert(key, value.serialize(self.child)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.object))
    }
}

/// Wraps a variant payload as `{variant: payload}`
pub(crate) struct VariantSerializer<S> {
    variant: &'static str,
    inner: S,
}

impl<S> VariantSerializer<S> {
    fn wrap(variant: &'static str, payload: Value) -> Value {
        let mut obj = Object::with_capacity(1);
        obj.insert(variant, payload);
        Value::Object(obj)
    }
}

impl ser::SerializeTupleVariant for VariantSerializer<SeqSerializer> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.inner.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Self::wrap(self.variant, Value::Array(self.inner.items)))
    }
}

impl ser::SerializeStructVariant for VariantSerializer<MapSerializer> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(Self::wrap(self.variant, Value::Object(self.inner.object)))
    }
}
