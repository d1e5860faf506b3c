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

use proc_macro::TokenStream;

mod derive;

/// Generates `Reflect`, `Construct` and `ReflectMut` impls for a struct or
/// data-less enum, reading `#[json(...)]` attributes for the policy
/// overrides the declared-type schema needs: `rename`, `skip`, `since`,
/// `flatten`.
#[proc_macro_derive(Json, attributes(json))]
pub fn json_derive(input: TokenStream) -> TokenStream {
    derive::expand(input.into()).unwrap_or_else(syn::Error::into_compile_error).into()
}
