//! # il2scope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! traits from the il2scope library. Import this module to get quick access to the
//! essential types for introspecting an instrumented IL2CPP target.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all il2scope operations
pub use crate::Error;

/// The result type used throughout il2scope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The composition root over one instrumented target
pub use crate::runtime::{Runtime, RuntimeConfig, RuntimeRc};

/// The bridge trait an instrumentation transport implements
pub use crate::runtime::RuntimeApi;

/// Opaque non-null references into the target
pub use crate::runtime::{
    ClassHandle, FieldHandle, GenericClassHandle, ObjectHandle, TypeHandle,
};

// ================================================================================================
// Type System
// ================================================================================================

/// Core type system components
pub use crate::typesystem::{
    ElementType, FieldAttributes, GenericClass, GenericClassRc, NativeAlias, RuntimeClass,
    RuntimeClassRc, RuntimeField, RuntimeFieldRc, RuntimeObject, RuntimeObjectRc, RuntimeType,
    RuntimeTypeRc,
};
