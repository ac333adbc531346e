use strum::{Display, EnumCount};

#[allow(non_snake_case, dead_code, missing_docs)]
/// Possible values of the storage-kind bitfield of an `Il2CppType` - from the
/// `Il2CppTypeEnum` of the runtime, which mirrors the ECMA-335 element types plus
/// the IL2CPP-specific `ENUM` marker
pub mod ELEMENT_TYPE {
    /// Marks end of a list
    pub const END: u32 = 0x00;
    pub const VOID: u32 = 0x01;
    pub const BOOLEAN: u32 = 0x02;
    pub const CHAR: u32 = 0x03;
    pub const I1: u32 = 0x04;
    pub const U1: u32 = 0x05;
    pub const I2: u32 = 0x06;
    pub const U2: u32 = 0x07;
    pub const I4: u32 = 0x08;
    pub const U4: u32 = 0x09;
    pub const I8: u32 = 0x0a;
    pub const U8: u32 = 0x0b;
    pub const R4: u32 = 0x0c;
    pub const R8: u32 = 0x0d;
    pub const STRING: u32 = 0x0e;
    /// Followed by type
    pub const PTR: u32 = 0x0f;
    /// Followed by type
    pub const BYREF: u32 = 0x10;
    /// Followed by TypeDef or TypeRef token
    pub const VALUETYPE: u32 = 0x11;
    /// Followed by TypeDef or TypeRef token
    pub const CLASS: u32 = 0x12;
    /// Generic parameter in a generic type definition, represented as number
    pub const VAR: u32 = 0x13;
    /// type rank boundsCount bound1 ... loCount lo1 ...
    pub const ARRAY: u32 = 0x14;
    /// Generic type instantiation. Followed by type type-arg-count type-1 ... type-n
    pub const GENERICINST: u32 = 0x15;
    pub const TYPEDBYREF: u32 = 0x16;
    /// System.IntPtr
    pub const I: u32 = 0x18;
    /// System.UIntPtr
    pub const U: u32 = 0x19;
    /// Followed by full method signature
    pub const FNPTR: u32 = 0x1b;
    /// System.Object
    pub const OBJECT: u32 = 0x1c;
    /// Single-dim array with 0 lower bound
    pub const SZARRAY: u32 = 0x1d;
    /// Generic parameter in a generic method definition, represented as number
    pub const MVAR: u32 = 0x1e;
    /// Required modifier: followed by a TypeDef or TypeRef token
    pub const CMOD_REQD: u32 = 0x1f;
    /// Optional modifier: followed by a TypeDef or TypeRef token
    pub const CMOD_OPT: u32 = 0x20;
    /// Implemented within the CLI
    pub const INTERNAL: u32 = 0x21;
    /// Or'd with following element types
    pub const MODIFIER: u32 = 0x40;
    /// Sentinel for vararg method signature
    pub const SENTINEL: u32 = 0x41;
    /// Denotes a local variable that points at a pinned object
    pub const PINNED: u32 = 0x45;
    /// An enumeration type - IL2CPP extension, not part of ECMA-335
    pub const ENUM: u32 = 0x55;
}

/// Symbolic classification of how a runtime type is stored and passed.
///
/// Decoded from the raw [`ELEMENT_TYPE`] code a type reports. The set is closed: any
/// code outside the table decodes to [`ElementType::End`], matching what the runtime
/// itself does with the terminator code, so decoding is total and never fails.
///
/// `Display` renders the short lowercase tag used in diagnostics (`"valuetype"`,
/// `"cmod_reqd"`, ...).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum ElementType {
    /// List terminator; also what every unrecognized code decodes to
    End,
    /// void
    Void,
    /// bool
    Boolean,
    /// char
    Char,
    /// signed 8bit integer
    I1,
    /// unsigned 8bit integer
    U1,
    /// signed 16bit integer
    I2,
    /// unsigned 16bit integer
    U2,
    /// signed 32bit integer
    I4,
    /// unsigned 32bit integer
    U4,
    /// signed 64bit integer
    I8,
    /// unsigned 64bit integer
    U8,
    /// 32bit floating-point
    R4,
    /// 64bit floating-point
    R8,
    /// System.String
    String,
    /// A pointer to a type
    Ptr,
    /// Type passed by reference
    ByRef,
    /// A value type
    ValueType,
    /// A reference type
    Class,
    /// Generic type parameter
    Var,
    /// Multi-dimensional array
    Array,
    /// Generic type instantiation
    GenericInst,
    /// Type is referenced during runtime
    TypedByRef,
    /// signed integer, sized to executing platform
    I,
    /// unsigned integer, sized to executing platform
    U,
    /// Function pointer
    FnPtr,
    /// System.Object
    Object,
    /// Single dimension array
    SzArray,
    /// Generic method parameter
    MVar,
    /// Required modifier
    #[strum(serialize = "cmod_reqd")]
    CModReqd,
    /// Optional modifier
    #[strum(serialize = "cmod_opt")]
    CModOpt,
    /// Implemented within the CLI
    Internal,
    /// Or'd with following element types
    Modifier,
    /// Sentinel for vararg method signature
    Sentinel,
    /// A pinned type
    Pinned,
    /// An enumeration type
    Enum,
}

impl ElementType {
    /// Decodes a raw storage-kind code reported by the target process.
    ///
    /// Total over all of `u32`: codes outside the documented table fall back to
    /// [`ElementType::End`] rather than failing, the same value the terminator code
    /// decodes to.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            ELEMENT_TYPE::END => ElementType::End,
            ELEMENT_TYPE::VOID => ElementType::Void,
            ELEMENT_TYPE::BOOLEAN => ElementType::Boolean,
            ELEMENT_TYPE::CHAR => ElementType::Char,
            ELEMENT_TYPE::I1 => ElementType::I1,
            ELEMENT_TYPE::U1 => ElementType::U1,
            ELEMENT_TYPE::I2 => ElementType::I2,
            ELEMENT_TYPE::U2 => ElementType::U2,
            ELEMENT_TYPE::I4 => ElementType::I4,
            ELEMENT_TYPE::U4 => ElementType::U4,
            ELEMENT_TYPE::I8 => ElementType::I8,
            ELEMENT_TYPE::U8 => ElementType::U8,
            ELEMENT_TYPE::R4 => ElementType::R4,
            ELEMENT_TYPE::R8 => ElementType::R8,
            ELEMENT_TYPE::STRING => ElementType::String,
            ELEMENT_TYPE::PTR => ElementType::Ptr,
            ELEMENT_TYPE::BYREF => ElementType::ByRef,
            ELEMENT_TYPE::VALUETYPE => ElementType::ValueType,
            ELEMENT_TYPE::CLASS => ElementType::Class,
            ELEMENT_TYPE::VAR => ElementType::Var,
            ELEMENT_TYPE::ARRAY => ElementType::Array,
            ELEMENT_TYPE::GENERICINST => ElementType::GenericInst,
            ELEMENT_TYPE::TYPEDBYREF => ElementType::TypedByRef,
            ELEMENT_TYPE::I => ElementType::I,
            ELEMENT_TYPE::U => ElementType::U,
            ELEMENT_TYPE::FNPTR => ElementType::FnPtr,
            ELEMENT_TYPE::OBJECT => ElementType::Object,
            ELEMENT_TYPE::SZARRAY => ElementType::SzArray,
            ELEMENT_TYPE::MVAR => ElementType::MVar,
            ELEMENT_TYPE::CMOD_REQD => ElementType::CModReqd,
            ELEMENT_TYPE::CMOD_OPT => ElementType::CModOpt,
            ELEMENT_TYPE::INTERNAL => ElementType::Internal,
            ELEMENT_TYPE::MODIFIER => ElementType::Modifier,
            ELEMENT_TYPE::SENTINEL => ElementType::Sentinel,
            ELEMENT_TYPE::PINNED => ElementType::Pinned,
            ELEMENT_TYPE::ENUM => ElementType::Enum,
            _ => ElementType::End,
        }
    }
}
