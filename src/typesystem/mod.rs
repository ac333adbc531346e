//! Type system of the instrumented target process.
//!
//! This module provides the descriptor facades over the foreign runtime's metadata:
//! types, classes, fields, objects and generic-class projections, plus the two pure
//! pieces of machinery they rely on, the storage-kind decoder and the native-alias
//! resolver. Together they answer the one question the surrounding tooling keeps
//! asking: given an opaque type handle observed in the target, how is a value of that
//! type stored, and how must it be described to a foreign-function call?
//!
//! # Architecture
//!
//! Every descriptor is a borrowed view over foreign memory: a non-null handle plus a
//! weak reference back to the [`crate::runtime::Runtime`] that created it. All
//! properties are computed lazily through the runtime's
//! [`crate::runtime::RuntimeApi`] and memoized per instance; since the runtime interns
//! descriptors per handle, each property of each foreign entity is resolved at most
//! once process-wide.
//!
//! # Key Types
//! - [`RuntimeType`] - an `Il2CppType`, the entry point for marshalling queries
//! - [`ElementType`] - decoded storage kind of a type
//! - [`NativeAlias`] - calling-convention representation, scalar or flattened
//! - [`RuntimeClass`], [`RuntimeField`], [`RuntimeObject`], [`GenericClass`] - the
//!   sibling facades a type query fans out to
//!
//! # Examples
//!
//! ```rust,no_run
//! use il2scope::runtime::Runtime;
//! # fn bridge() -> Box<dyn il2scope::runtime::RuntimeApi> { unimplemented!() }
//!
//! let runtime = Runtime::new(bridge());
//!
//! // A Vector3-like value type flattens to its scalar fields.
//! let ty = runtime.type_at(0x7f32_1440_08a0)?;
//! if ty.class()?.is_value_type()? {
//!     println!("{} passes as {}", ty.name()?, ty.native_alias()?);
//! }
//! # Ok::<(), il2scope::Error>(())
//! ```

mod class;
mod element;
mod field;
mod native;
mod object;
mod types;

pub use class::{GenericClass, GenericClassRc, RuntimeClass, RuntimeClassRc};
pub use element::{ElementType, ELEMENT_TYPE};
pub use field::{FieldAttributes, FieldList, RuntimeField, RuntimeFieldRc, FIELD_ACCESS_MASK};
pub use native::NativeAlias;
pub use object::{RuntimeObject, RuntimeObjectRc};
pub use types::{RuntimeType, RuntimeTypeRc};
