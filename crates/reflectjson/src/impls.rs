/*
 * Copyright (C) 2025 Reflect JSON Contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! `Reflect`/`ReflectMut` for the primitive and container types the derive
//! macro can't generate impls for on its own (they aren't user structs).

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::adapter::{narrow, primitive_to_value};
use crate::construct::Construct;
use crate::deserialize::{DeContext, ReflectMut};
use crate::error::{Error, Result};
use crate::reflect::{element_info, Primitive, Reflect, Shape};
use crate::type_info::TypeInfo;

macro_rules! impl_int {
    ($($t:ty),+ $(,)?) => {$(
        impl Reflect for $t {
            fn type_info() -> TypeInfo { TypeInfo::of::<$t>() }
            fn dyn_type_info(&self) -> TypeInfo { Self::type_info() }
            fn shape(&self) -> Shape<'_> { Shape::Primitive(Primitive::Int(*self as i128)) }
            fn as_any(&self) -> &dyn Any { self }
        }
        impl Construct for $t {
            fn construct() -> Result<Self> { Ok(<$t>::default()) }
        }
        impl ReflectMut for $t {
            fn type_info() -> TypeInfo { TypeInfo::of::<$t>() }
            fn from_json_value(value: &serde_json::Value, _ctx: &mut DeContext) -> Result<Self> {
                match narrow(value, &Self::type_info())? {
                    Primitive::Int(i) => Ok(i as $t),
                    _ => unreachable!("narrow() only returns Int for an integer TypeInfo"),
                }
            }
        }
    )+};
}

impl_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize);

macro_rules! impl_float {
    ($($t:ty),+ $(,)?) => {$(
        impl Reflect for $t {
            fn type_info() -> TypeInfo { TypeInfo::of::<$t>() }
            fn dyn_type_info(&self) -> TypeInfo { Self::type_info() }
            fn shape(&self) -> Shape<'_> { Shape::Primitive(Primitive::Float(*self as f64)) }
            fn as_any(&self) -> &dyn Any { self }
        }
        impl Construct for $t {
            fn construct() -> Result<Self> { Ok(<$t>::default()) }
        }
        impl ReflectMut for $t {
            fn type_info() -> TypeInfo { TypeInfo::of::<$t>() }
            fn from_json_value(value: &serde_json::Value, _ctx: &mut DeContext) -> Result<Self> {
                match narrow(value, &Self::type_info())? {
                    Primitive::Float(f) => Ok(f as $t),
                    _ => unreachable!("narrow() only returns Float for a float TypeInfo"),
                }
            }
        }
    )+};
}

impl_float!(f32, f64);

impl Reflect for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<bool>()
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Bool(*self))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
impl Construct for bool {
    fn construct() -> Result<Self> {
        Ok(false)
    }
}
impl ReflectMut for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<bool>()
    }
    fn from_json_value(value: &serde_json::Value, _ctx: &mut DeContext) -> Result<Self> {
        match narrow(value, &Self::type_info())? {
            Primitive::Bool(b) => Ok(b),
            _ => unreachable!("narrow() only returns Bool for a bool TypeInfo"),
        }
    }
}

impl Reflect for char {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<char>()
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Char(*self))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
impl Construct for char {
    fn construct() -> Result<Self> {
        Ok('\0')
    }
}
impl ReflectMut for char {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<char>()
    }
    fn from_json_value(value: &serde_json::Value, _ctx: &mut DeContext) -> Result<Self> {
        match narrow(value, &Self::type_info())? {
            Primitive::Char(c) => Ok(c),
            _ => unreachable!("narrow() only returns Char for a char TypeInfo"),
        }
    }
}

impl Reflect for String {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<String>()
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Str(self.clone()))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
impl Construct for String {
    fn construct() -> Result<Self> {
        Ok(String::new())
    }
}
impl ReflectMut for String {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<String>()
    }
    fn from_json_value(value: &serde_json::Value, _ctx: &mut DeContext) -> Result<Self> {
        match narrow(value, &Self::type_info())? {
            Primitive::Str(s) => Ok(s),
            _ => unreachable!("narrow() only returns Str for a String TypeInfo"),
        }
    }
}

impl Reflect for url::Url {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<url::Url>()
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Url(self.to_string()))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
impl ReflectMut for url::Url {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<url::Url>()
    }
    fn from_json_value(value: &serde_json::Value, _ctx: &mut DeContext) -> Result<Self> {
        match narrow(value, &Self::type_info())? {
            Primitive::Url(s) => {
                url::Url::parse(&s).map_err(|e| Error::ReflectiveAccess { field: "url", cause: Box::new(e) })
            }
            _ => unreachable!("narrow() only returns Url for a url::Url TypeInfo"),
        }
    }
}

impl<T: Reflect + 'static> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::container::<Option<T>>(element_info::<T>())
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn is_null(&self) -> bool {
        self.is_none()
    }
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(v) => v.shape(),
            None => unreachable!("is_null() short-circuits before shape() is consulted"),
        }
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn identity(&self) -> usize {
        match self {
            Some(v) => v.identity(),
            None => 0,
        }
    }
}
impl<T: ReflectMut> Construct for Option<T> {
    fn construct() -> Result<Self> {
        Ok(None)
    }
}
impl<T: ReflectMut> ReflectMut for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Option<T>>()
    }
    fn from_json_value(value: &serde_json::Value, ctx: &mut DeContext) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::from_json_value(value, ctx)?))
        }
    }
}

impl<T: Reflect + 'static> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::container::<Vec<T>>(element_info::<T>())
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Array(self.iter().map(|v| v as &dyn Reflect).collect())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
impl<T: ReflectMut> Construct for Vec<T> {
    fn construct() -> Result<Self> {
        Ok(Vec::new())
    }
}
impl<T: ReflectMut> ReflectMut for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Vec<T>>()
    }
    fn from_json_value(value: &serde_json::Value, ctx: &mut DeContext) -> Result<Self> {
        let items = value.as_array().ok_or_else(|| Error::TypeMismatch {
            expected: Self::type_info(),
            found: "not a JSON array",
        })?;
        items.iter().map(|item| T::from_json_value(item, ctx)).collect()
    }
}

impl<T: Reflect + 'static, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::container::<[T; N]>(element_info::<T>())
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Array(self.iter().map(|v| v as &dyn Reflect).collect())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<V: Reflect + 'static> Reflect for HashMap<String, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::container::<HashMap<String, V>>(element_info::<V>())
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self.iter().map(|(k, v)| (k.clone(), v as &dyn Reflect)).collect())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
impl<V: ReflectMut> Construct for HashMap<String, V> {
    fn construct() -> Result<Self> {
        Ok(HashMap::new())
    }
}
impl<V: ReflectMut> ReflectMut for HashMap<String, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<HashMap<String, V>>()
    }
    fn from_json_value(value: &serde_json::Value, ctx: &mut DeContext) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| Error::TypeMismatch {
            expected: Self::type_info(),
            found: "not a JSON object",
        })?;
        obj.iter().map(|(k, v)| Ok((k.clone(), V::from_json_value(v, ctx)?))).collect()
    }
}

impl<V: Reflect + 'static> Reflect for BTreeMap<String, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::container::<BTreeMap<String, V>>(element_info::<V>())
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self.iter().map(|(k, v)| (k.clone(), v as &dyn Reflect)).collect())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
impl<V: ReflectMut> Construct for BTreeMap<String, V> {
    fn construct() -> Result<Self> {
        Ok(BTreeMap::new())
    }
}
impl<V: ReflectMut> ReflectMut for BTreeMap<String, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<BTreeMap<String, V>>()
    }
    fn from_json_value(value: &serde_json::Value, ctx: &mut DeContext) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| Error::TypeMismatch {
            expected: Self::type_info(),
            found: "not a JSON object",
        })?;
        obj.iter().map(|(k, v)| Ok((k.clone(), V::from_json_value(v, ctx)?))).collect()
    }
}

/// `identity()` is the pointee address rather than `Rc`'s own fat-pointer
/// address, so two `Rc`s cloned from the same allocation collapse to one
/// identity — letting a DAG (the same child reachable along two distinct
/// paths) serialize without tripping cycle detection, while an actual cycle
/// through a shared node is still caught.
impl<T: Reflect + 'static> Reflect for Rc<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::container::<Rc<T>>(element_info::<T>())
    }
    fn dyn_type_info(&self) -> TypeInfo {
        Self::type_info()
    }
    fn is_null(&self) -> bool {
        self.as_ref().is_null()
    }
    fn shape(&self) -> Shape<'_> {
        self.as_ref().shape()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn identity(&self) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }
}
impl<T: ReflectMut> ReflectMut for Rc<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Rc<T>>()
    }
    fn from_json_value(value: &serde_json::Value, ctx: &mut DeContext) -> Result<Self> {
        Ok(Rc::new(T::from_json_value(value, ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SerializerBuilder;

    #[test]
    fn vec_of_ints_round_trips() {
        let s = SerializerBuilder::new().build();
        let out = s.to_json(&vec![1, 2, 3]).unwrap();
        assert_eq!(out, "[1,2,3]");
        let back: Vec<i32> = s.from_json(&out).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn option_none_is_null_and_round_trips() {
        let s = SerializerBuilder::new().build();
        let v: Option<i32> = None;
        assert_eq!(s.to_json(&v).unwrap(), "");
        let raw = serde_json::Value::Null;
        let back: Option<i32> = Option::<i32>::from_json_value(&raw, &mut DeContext::new(
            std::sync::Arc::new(crate::handler::HandlerMap::new()),
            std::sync::Arc::new(crate::exclusion::Disjunction::default_composition()),
        )).unwrap();
        assert_eq!(back, None);
    }

    #[test]
    fn string_map_preserves_values() {
        let s = SerializerBuilder::new().build();
        let mut m = HashMap::new();
        m.insert("a".to_string(), 1i32);
        let out = s.to_json(&m).unwrap();
        let back: HashMap<String, i32> = s.from_json(&out).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn url_serializes_to_its_canonical_string_form() {
        let s = SerializerBuilder::new().build();
        let u = url::Url::parse("https://example.com/a?b=1").unwrap();
        let out = s.to_json(&u).unwrap();
        assert_eq!(out, r#""https://example.com/a?b=1""#);
    }

    #[test]
    fn rc_wrapped_value_serializes_as_its_pointee() {
        let s = SerializerBuilder::new().build();
        let shared: Rc<i32> = Rc::new(9);
        assert_eq!(s.to_json(&shared).unwrap(), "9");
    }

    #[test]
    fn two_rcs_over_the_same_allocation_share_one_identity() {
        let shared = Rc::new(1);
        let other = shared.clone();
        assert_eq!(Reflect::identity(&shared), Reflect::identity(&other));
    }
}
