//! Argument lists
//!
//! A memoized function takes one Rust value. At the top level a tuple is
//! read as positional arguments and `()` as no arguments; anything else is a
//! single argument. [`Spread`] turns a runtime-length sequence into positional
//! arguments for variadic functions.
//!
//! serde hands fixed-size arrays over exactly like tuples, so a top-level
//! `[T; N]` is also `N` positional arguments. Pass a `Vec<T>`, or wrap the
//! array in a 1-tuple (`([1, 2, 3],)`), to make it one array argument.

use serde::ser::{self, Serialize, SerializeTuple, Serializer};

use crate::error::Result;
use crate::ser::{MapSerializer, SeqSerializer, ValueSerializer, VariantSerializer};
use crate::value::Value;

/// Positional arguments of runtime length
///
/// `Spread(vec![1, 2, 3])` is the argument list `(1, 2, 3)`, as is the
/// fixed-size array `[1, 2, 3]`, whereas `vec![1, 2, 3]` is a single array
/// argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spread<T>(pub Vec<T>);

impl<T> Spread<T> {
    /// Arguments as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Unwrap the arguments
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> From<Vec<T>> for Spread<T> {
    fn from(args: Vec<T>) -> Self {
        Spread(args)
    }
}

impl<T> std::ops::Deref for Spread<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T: Serialize> Serialize for Spread<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(self.0.len())?;
        for arg in &self.0 {
            tuple.serialize_element(arg)?;
        }
        tuple.end()
    }
}

/// Lower a memoized function's argument into its positional argument list
///
/// # Arguments
/// * `args` - `()`, a tuple, a [`Spread`], or any single `Serialize` value
/// * `limit` - Maximum nesting depth per argument
pub fn to_arguments<A: Serialize + ?Sized>(args: &A, limit: usize) -> Result<Vec<Value>> {
    args.serialize(ArgumentSerializer {
        inner: ValueSerializer::new(limit),
    })
}

/// Top-level serializer: spreads tuples, wraps everything else as one argument
struct ArgumentSerializer {
    inner: ValueSerializer,
}

impl ArgumentSerializer {
    fn single(value: Value) -> Vec<Value> {
        vec![value]
    }
}

impl Serializer for ArgumentSerializer {
    type Ok = Vec<Value>;
    type Error = crate::error::Error;

    type SerializeSeq = Single<SeqSerializer>;
    type SerializeTuple = Positional;
    type SerializeTupleStruct = Single<SeqSerializer>;
    type SerializeTupleVariant = Single<VariantSerializer<SeqSerializer>>;
    type SerializeMap = Single<MapSerializer>;
    type SerializeStruct = Single<MapSerializer>;
    type SerializeStructVariant = Single<VariantSerializer<MapSerializer>>;

    fn serialize_bool(self, v: bool) -> Result<Vec<Value>> {
        self.inner.serialize_bool(v).map(Self::single)
    }

    fn serialize_i8(self, v: i8) -> Result<Vec<Value>> {
        self.inner.serialize_i8(v).map(Self::single)
    }

    fn serialize_i16(self, v: i16) -> Result<Vec<Value>> {
        self.inner.serialize_i16(v).map(Self::single)
    }

    fn serialize_i32(self, v: i32) -> Result<Vec<Value>> {
        self.inner.serialize_i32(v).map(Self::single)
    }

    fn serialize_i64(self, v: i64) -> Result<Vec<Value>> {
        self.inner.serialize_i64(v).map(Self::single)
    }

    fn serialize_i128(self, v: i128) -> Result<Vec<Value>> {
        self.inner.serialize_i128(v).map(Self::single)
    }

    fn serialize_u8(self, v: u8) -> Result<Vec<Value>> {
        self.inner.serialize_u8(v).map(Self::single)
    }

    fn serialize_u16(self, v: u16) -> Result<Vec<Value>> {
        self.inner.serialize_u16(v).map(Self::single)
    }

    fn serialize_u32(self, v: u32) -> Result<Vec<Value>> {
        self.inner.serialize_u32(v).map(Self::single)
    }

    fn serialize_u64(self, v: u64) -> Result<Vec<Value>> {
        self.inner.serialize_u64(v).map(Self::single)
    }

    fn serialize_u128(self, v: u128) -> Result<Vec<Value>> {
        self.inner.serialize_u128(v).map(Self::single)
    }

    fn serialize_f32(self, v: f32) -> Result<Vec<Value>> {
        self.inner.serialize_f32(v).map(Self::single)
    }

    fn serialize_f64(self, v: f64) -> Result<Vec<Value>> {
        self.inner.serialize_f64(v).map(Self::single)
    }

    fn serialize_char(self, v: char) -> Result<Vec<Value>> {
        self.inner.serialize_char(v).map(Self::single)
    }

    fn serialize_str(self, v: &str) -> Result<Vec<Value>> {
        self.inner.serialize_str(v).map(Self::single)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Vec<Value>> {
        self.inner.serialize_bytes(v).map(Self::single)
    }

    fn serialize_none(self) -> Result<Vec<Value>> {
        self.inner.serialize_none().map(Self::single)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<Value>> {
        self.inner.serialize_some(value).map(Self::single)
    }

    // `()` is the empty argument list
    fn serialize_unit(self) -> Result<Vec<Value>> {
        Ok(Vec::new())
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Vec<Value>> {
        self.inner.serialize_unit_struct(name).map(Self::single)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Vec<Value>> {
        self.inner
            .serialize_unit_variant(name, variant_index, variant)
            .map(Self::single)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Vec<Value>> {
        self.inner
            .serialize_newtype_struct(name, value)
            .map(Self::single)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Vec<Value>> {
        self.inner
            .serialize_newtype_variant(name, variant_index, variant, value)
            .map(Self::single)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.inner.serialize_seq(len).map(Single)
    }

    fn serialize_tuple(self, len: usize) -> Result<Positional> {
        Ok(Positional {
            inner: self.inner,
            args: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.inner.serialize_tuple_struct(name, len).map(Single)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.inner
            .serialize_tuple_variant(name, variant_index, variant, len)
            .map(Single)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        self.inner.serialize_map(len).map(Single)
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.inner.serialize_struct(name, len).map(Single)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.inner
            .serialize_struct_variant(name, variant_index, variant, len)
            .map(Single)
    }
}

/// Collects tuple elements as separate arguments, each at depth 0
struct Positional {
    inner: ValueSerializer,
    args: Vec<Value>,
}

impl SerializeTuple for Positional {
    type Ok = Vec<Value>;
    type Error = crate::error::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.args.push(value.serialize(self.inner)?);
        Ok(())
    }

    fn end(self) -> Result<Vec<Value>> {
        Ok(self.args)
    }
}

/// A compound value that forms exactly one argument
struct Single<S>(S);

impl<S: ser::SerializeSeq<Ok = Value, Error = crate::error::Error>> ser::SerializeSeq for Single<S> {
    type Ok = Vec<Value>;
    type Error = crate::error::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.0.serialize_element(value)
    }

    fn end(self) -> Result<Vec<Value>> {
        self.0.end().map(|v| vec![v])
    }
}

impl<S: ser::SerializeTupleStruct<Ok = Value, Error = crate::error::Error>> ser::SerializeTupleStruct
    for Single<S>
{
    type Ok = Vec<Value>;
    type Error = crate::error::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.0.serialize_field(value)
    }

    fn end(self) -> Result<Vec<Value>> {
        self.0.end().map(|v| vec![v])
    }
}

impl<S: ser::SerializeTupleVariant<Ok = Value, Error = crate::error::Error>>
    ser::SerializeTupleVariant for Single<S>
{
    type Ok = Vec<Value>;
    type Error = crate::error::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.0.serialize_field(value)
    }

    fn end(self) -> Result<Vec<Value>> {
        self.0.end().map(|v| vec![v])
    }
}

impl<S: ser::SerializeMap<Ok = Value, Error = crate::error::Error>> ser::SerializeMap for Single<S> {
    type Ok = Vec<Value>;
    type Error = crate::error::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        self.0.serialize_key(key)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.0.serialize_value(value)
    }

    fn end(self) -> Result<Vec<Value>> {
        self.0.end().map(|v| vec![v])
    }
}

impl<S: ser::SerializeStruct<Ok = Value, Error = crate::error::Error>> ser::SerializeStruct
    for Single<S>
{
    type Ok = Vec<Value>;
    type Error = crate::error::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.0.serialize_field(key, value)
    }

    fn end(self) -> Result<Vec<Value>> {
        self.0.end().map(|v| vec![v])
    }
}

impl<S: ser::SerializeStructVariant<Ok = Value, Error = crate::error::Error>>
    ser::SerializeStructVariant for Single<S>
{
    type Ok = Vec<Value>;
    type Error = crate::error::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.0.serialize_field(key, value)
    }

    fn end(self) -> Result<Vec<Value>> {
        self.0.end().map(|v| vec![v])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn test_unit_is_empty_list() {
        assert_eq!(to_arguments(&(), 8).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn test_tuple_spreads() {
        let args = to_arguments(&(3, "x", true), 8).unwrap();
        assert_eq!(
            args,
            vec![Value::Int(3), Value::from("x"), Value::Bool(true)]
        );
    }

    #[test]
    fn test_scalar_is_single_argument() {
        assert_eq!(to_arguments(&123u32, 8).unwrap(), vec![Value::Int(123)]);
    }

    #[test]
    fn test_vec_is_single_argument() {
        let args = to_arguments(&vec![1, 2], 8).unwrap();
        assert_eq!(args, vec![Value::from(vec![1, 2])]);
    }

    #[test]
    fn test_spread_is_positional() {
        let args = to_arguments(&Spread(vec![1, 2, 3]), 8).unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(to_arguments(&Spread::<i32>(vec![]), 8).unwrap().len(), 0);
    }

    #[test]
    fn test_object_argument() {
        let obj = Object::from([("a", 1)]);
        let args = to_arguments(&(obj.clone(), 2), 8).unwrap();
        assert_eq!(args, vec![Value::Object(obj), Value::Int(2)]);
    }

    #[test]
    fn test_null_is_single_argument() {
        assert_eq!(to_arguments(&Value::Null, 8).unwrap(), vec![Value::Null]);
        assert_eq!(
            to_arguments(&Value::Null, 8).unwrap(),
            to_arguments(&(Value::Null,), 8).unwrap()
        );
        assert_eq!(to_arguments(&None::<u8>, 8).unwrap(), vec![Value::Null]);
    }

    #[test]
    fn test_fixed_array_is_positional() {
        assert_eq!(
            to_arguments(&[1, 2, 3], 8).unwrap(),
            to_arguments(&Spread(vec![1, 2, 3]), 8).unwrap()
        );
        assert_eq!(
            to_arguments(&([1, 2, 3],), 8).unwrap(),
            vec![Value::from(vec![1, 2, 3])]
        );
    }

    #[test]
    fn test_nested_tuple_is_array() {
        let args = to_arguments(&((1, 2),), 8).unwrap();
        assert_eq!(args, vec![Value::from(vec![1, 2])]);
    }
}
