use crate::{
    runtime::{ClassHandle, FieldHandle, GenericClassHandle, ObjectHandle, TypeHandle},
    Result,
};

/// The raw introspection primitives this crate consumes from an instrumented IL2CPP process.
///
/// Implementations of this trait are the bridge to the target: each method is a single
/// synchronous query against foreign memory, typically forwarded to the exported
/// `il2cpp_*` API of the instrumented runtime by an injected agent. The crate never
/// dereferences foreign addresses itself; everything goes through this seam.
///
/// # Null handling
///
/// Methods that produce a handle return the raw foreign address as `u64`, where `0`
/// means null. The descriptor layer owns the null policy: for
/// [`RuntimeApi::type_get_data_type`] null is a normal "not applicable" outcome, for
/// every other query it is treated as broken metadata or a usage error.
///
/// # Errors
///
/// All methods return [`crate::Result`] so that implementations reading a detached or
/// corrupt target can surface [`crate::Error::MemoryRead`] instead of panicking. None
/// of these queries mutate the target; retrying a failed call is safe but this crate
/// never does so on its own.
pub trait RuntimeApi: Send + Sync {
    /// Returns the address of the `Il2CppClass` a type belongs to. Never null for a
    /// live type; the descriptor layer rejects `0`.
    fn class_from_type(&self, ty: TypeHandle) -> Result<u64>;

    /// Returns the address of the element type of an array-like type, or `0` when the
    /// type has none (any non-array type).
    fn type_get_data_type(&self, ty: TypeHandle) -> Result<u64>;

    /// Returns the address of the `Il2CppGenericClass` projection of a generic instance
    /// type.
    fn type_get_generic_class(&self, ty: TypeHandle) -> Result<u64>;

    /// Determines whether the type is passed by reference (an `&` / `out` parameter
    /// shape).
    fn type_is_by_reference(&self, ty: TypeHandle) -> Result<bool>;

    /// Returns the address of the NUL-terminated UTF-8 name of the type. Read it with
    /// [`RuntimeApi::read_utf8_str`].
    fn type_get_name(&self, ty: TypeHandle) -> Result<u64>;

    /// Returns the address of the reflection `Il2CppObject` for the type.
    fn type_get_object(&self, ty: TypeHandle) -> Result<u64>;

    /// Returns the raw storage-kind code (`Il2CppTypeEnum`) of the type. Decode it with
    /// [`crate::typesystem::ElementType::from_raw`].
    fn type_get_type_enum(&self, ty: TypeHandle) -> Result<u32>;

    /// Returns the byte offset of the storage-kind bitfield inside the `Il2CppType`
    /// struct. A process-wide layout constant; [`crate::runtime::Runtime`] fetches it
    /// once and caches it.
    fn type_offset_of_type_enum(&self) -> Result<u32>;

    /// Returns the address of the NUL-terminated UTF-8 name of the class.
    fn class_get_name(&self, class: ClassHandle) -> Result<u64>;

    /// Returns the address of the NUL-terminated UTF-8 namespace of the class.
    fn class_get_namespace(&self, class: ClassHandle) -> Result<u64>;

    /// Determines whether instances of the class are value types (passed by value,
    /// flattened for native calls).
    fn class_is_value_type(&self, class: ClassHandle) -> Result<bool>;

    /// Returns the addresses of all `FieldInfo` entries of the class, static fields
    /// included, in declaration order.
    fn class_get_fields(&self, class: ClassHandle) -> Result<Vec<u64>>;

    /// Returns the address of the NUL-terminated UTF-8 name of the field.
    fn field_get_name(&self, field: FieldHandle) -> Result<u64>;

    /// Returns the raw `FieldAttributes` bitmask of the field (ECMA-335 II.23.1.5).
    fn field_get_flags(&self, field: FieldHandle) -> Result<u32>;

    /// Returns the byte offset of the field within its declaring class.
    fn field_get_offset(&self, field: FieldHandle) -> Result<u32>;

    /// Returns the address of the `Il2CppType` of the field. Never null for a live
    /// field; the descriptor layer rejects `0`.
    fn field_get_type(&self, field: FieldHandle) -> Result<u64>;

    /// Returns the address of the `Il2CppClass` of an object instance.
    fn object_get_class(&self, object: ObjectHandle) -> Result<u64>;

    /// Returns the address of the inflated `Il2CppClass` behind a generic class
    /// projection, or `0` while the instantiation has not been inflated yet.
    fn generic_class_get_cached_class(&self, generic: GenericClassHandle) -> Result<u64>;

    /// Reads a NUL-terminated UTF-8 string from foreign memory.
    ///
    /// # Errors
    /// [`crate::Error::MemoryRead`] if the address cannot be read,
    /// [`crate::Error::Malformed`] if the bytes are not valid UTF-8 (broken metadata is
    /// fatal, see [`crate::Error`]).
    fn read_utf8_str(&self, address: u64) -> Result<String>;
}
