// Copyright 2025 il2scope developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # il2scope
//!
//! A cross-platform framework for introspecting and marshalling the type system of live
//! IL2CPP processes. Built in pure Rust, `il2scope` resolves the opaque type handles an
//! injected instrumentation agent observes in a target into storage-kind classifications
//! and native calling-convention representations, including the flattening of nested
//! value-type layouts that a foreign-function bridge needs to describe argument and
//! field shapes.
//!
//! ## Features
//!
//! - **🔍 Storage-kind decoding** - Total decoding of the raw `Il2CppTypeEnum` codes a
//!   target reports, with the runtime's own fallback behavior for unknown codes
//! - **📦 Native alias resolution** - Scalar and flattened-aggregate calling-convention
//!   shapes for every type, ready for an FFI invocation layer
//! - **⚡ Memoized descriptors** - Every foreign query is made at most once per entity;
//!   descriptors are interned per handle and shared
//! - **🔧 Bridge-agnostic** - All target access goes through one [`runtime::RuntimeApi`]
//!   trait; bring your own injection/instrumentation transport
//! - **🛡️ Memory safe** - No foreign address is ever dereferenced locally
//!
//! ## Quick Start
//!
//! Add `il2scope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! il2scope = "0.2"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust,no_run
//! use il2scope::prelude::*;
//! # fn bridge() -> Box<dyn il2scope::runtime::RuntimeApi> { unimplemented!() }
//!
//! let runtime = Runtime::new(bridge());
//!
//! // Resolve a type handle observed in the target.
//! let ty = runtime.type_at(0x7f32_1440_08a0)?;
//! println!("{}: {} -> {}", ty.name()?, ty.element()?, ty.native_alias()?);
//! # Ok::<(), il2scope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The crate is organized in two layers:
//!
//! - [`runtime`] - the connection to the target: the [`runtime::RuntimeApi`] bridge
//!   trait, opaque handle types, and the [`runtime::Runtime`] composition root that
//!   interns descriptors and caches process-wide layout constants
//! - [`typesystem`] - the descriptor facades ([`typesystem::RuntimeType`],
//!   [`typesystem::RuntimeClass`], [`typesystem::RuntimeField`], ...) plus the
//!   storage-kind decoder and the native-alias resolver
//!
//! All descriptors are borrowed views: the target process owns its metadata, and this
//! crate never allocates or frees foreign memory.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types from
/// across the il2scope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust,no_run
/// use il2scope::prelude::*;
/// # fn bridge() -> Box<dyn il2scope::runtime::RuntimeApi> { unimplemented!() }
///
/// let runtime = Runtime::new(bridge());
/// let ty = runtime.type_at(0x7f32_1440_08a0)?;
/// # Ok::<(), il2scope::Error>(())
/// ```
pub mod prelude;

/// Connection to the instrumented target process.
///
/// Provides the [`runtime::RuntimeApi`] trait an instrumentation bridge implements,
/// the opaque non-null handle types, and the [`runtime::Runtime`] composition root
/// through which all descriptors are created.
pub mod runtime;

/// Type system of the instrumented target process.
///
/// Descriptor facades over foreign metadata and the marshalling machinery:
///
/// - [`typesystem::RuntimeType`] - type descriptors with memoized properties
/// - [`typesystem::ElementType`] - decoded storage kinds
/// - [`typesystem::NativeAlias`] - native calling-convention representations
/// - [`typesystem::RuntimeClass`], [`typesystem::RuntimeField`],
///   [`typesystem::RuntimeObject`], [`typesystem::GenericClass`] - sibling facades
pub mod typesystem;

/// `il2scope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. This is used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `il2scope` Error type
///
/// The main error type for all operations in this crate. Provides detailed error
/// information for handle construction, foreign metadata access and native-alias
/// resolution.
pub use error::Error;
