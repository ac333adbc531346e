use std::fmt;

use crate::Result;

/// Defines an opaque handle newtype over a foreign address.
///
/// Handles are never dereferenced locally; they are only passed back into the
/// [`crate::runtime::RuntimeApi`]. Construction rejects the null address.
macro_rules! foreign_handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw foreign address, rejecting null
            ///
            /// # Errors
            /// Returns [`crate::Error::NullHandle`] if `address` is zero.
            pub fn new(address: u64) -> Result<Self> {
                if address == 0 {
                    return Err(crate::Error::NullHandle(stringify!($name)));
                }

                Ok($name(address))
            }

            /// Returns the raw foreign address
            #[must_use]
            pub fn address(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(0x{:x})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{:016x}", self.0)
            }
        }
    };
}

foreign_handle!(
    /// A non-null reference to an `Il2CppType` in the target process.
    ///
    /// Two [`crate::typesystem::RuntimeType`] descriptors are the same type exactly when
    /// their `TypeHandle`s are equal.
    TypeHandle
);

foreign_handle!(
    /// A non-null reference to an `Il2CppClass` in the target process.
    ClassHandle
);

foreign_handle!(
    /// A non-null reference to a `FieldInfo` in the target process.
    FieldHandle
);

foreign_handle!(
    /// A non-null reference to an `Il2CppObject` in the target process.
    ObjectHandle
);

foreign_handle!(
    /// A non-null reference to an `Il2CppGenericClass` in the target process.
    GenericClassHandle
);
