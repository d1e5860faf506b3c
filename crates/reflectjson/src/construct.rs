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

//! `ObjectConstructor`: produces a blank instance of a declared type before
//! its fields are populated during deserialization.

use crate::error::{Error, Result};
use crate::handler::HandlerMap;
use crate::type_info::TypeInfo;

/// A type that can be instantiated without arguments. The derive macro
/// implements this in terms of `Default` when the annotated struct itself
/// derives `Default`; otherwise it emits the inherited `Unconstructible`
/// default, and the only way to deserialize the type becomes a registered
/// instance creator.
pub trait Construct: Sized {
    fn construct() -> Result<Self> {
        Err(Error::Unconstructible { type_name: std::any::type_name::<Self>() })
    }
}

/// Produces an instance of `T`, preferring a registered instance creator
/// over the derive-generated default path. This is the one call site every
/// struct's generated deserialization goes through before field population.
pub fn new_instance<T: Construct + 'static>(handlers: &HandlerMap) -> Result<T> {
    let info = TypeInfo::of::<T>();
    if let Some(creator) = handlers.instance_creator_for(&info) {
        let boxed = creator()?;
        return boxed
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| Error::Unconstructible { type_name: info.display_name });
    }
    T::construct()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, PartialEq, Debug)]
    struct Blank {
        n: i32,
    }
    impl Construct for Blank {
        fn construct() -> Result<Self> {
            Ok(Self::default())
        }
    }

    struct NoDefault;
    impl Construct for NoDefault {}

    #[test]
    fn default_backed_type_constructs_via_default() {
        let handlers = HandlerMap::new();
        let v: Blank = new_instance(&handlers).unwrap();
        assert_eq!(v, Blank::default());
    }

    #[test]
    fn type_with_no_path_is_unconstructible() {
        let handlers = HandlerMap::new();
        let err = new_instance::<NoDefault>(&handlers).unwrap_err();
        assert!(err.to_string().contains("no instance creator"));
    }

    #[test]
    fn registered_instance_creator_takes_priority() {
        let mut handlers = HandlerMap::new();
        handlers.register_instance_creator::<Blank, _>(|| Ok(Blank { n: 7 }));
        let v: Blank = new_instance(&handlers).unwrap();
        assert_eq!(v, Blank { n: 7 });
    }
}
