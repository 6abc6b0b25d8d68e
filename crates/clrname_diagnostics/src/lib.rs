//! clrname_diagnostics: Error catalogue and the structured parse error.
//!
//! Every error the parser can raise is a predefined [`ErrorDescriptor`] in
//! [`messages`]. Descriptors are only ever referenced, never built at parse
//! time. A failed parse surfaces exactly one [`TypeNameError`], which carries
//! the descriptor together with the offending position, the parser state and
//! the original text.

mod error;

pub use error::TypeNameError;

use std::fmt;

/// Error category, derived from the numeric range of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 1000-1999: array rank syntax.
    Array,
    /// 2000-2999: type name syntax.
    TypeName,
    /// 3000-3999: generic arity and argument list syntax.
    Generics,
    /// 4000-4999: assembly identity syntax.
    Assembly,
    /// 5000-5999: a name or identity field defined twice.
    AlreadyDefined,
    /// 6000-6999: an identity property defined before the assembly name.
    DefinedOutOfOrder,
    /// 9000-9999: too many generic arguments or too deep nesting.
    CapacityExceeded,
}

impl ErrorCategory {
    /// The category a code belongs to, if it is in a known range.
    pub fn of(code: u32) -> Option<Self> {
        match code {
            1000..=1999 => Some(ErrorCategory::Array),
            2000..=2999 => Some(ErrorCategory::TypeName),
            3000..=3999 => Some(ErrorCategory::Generics),
            4000..=4999 => Some(ErrorCategory::Assembly),
            5000..=5999 => Some(ErrorCategory::AlreadyDefined),
            6000..=6999 => Some(ErrorCategory::DefinedOutOfOrder),
            9000..=9999 => Some(ErrorCategory::CapacityExceeded),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Array => write!(f, "array"),
            ErrorCategory::TypeName => write!(f, "type name"),
            ErrorCategory::Generics => write!(f, "generics"),
            ErrorCategory::Assembly => write!(f, "assembly"),
            ErrorCategory::AlreadyDefined => write!(f, "already defined"),
            ErrorCategory::DefinedOutOfOrder => write!(f, "defined out of order"),
            ErrorCategory::CapacityExceeded => write!(f, "capacity exceeded"),
        }
    }
}

/// A predefined error with a code and category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorDescriptor {
    /// The error number (e.g., 2004, 9000).
    pub code: u32,
    /// The category of this error.
    pub category: ErrorCategory,
    /// The human-readable message.
    pub message: &'static str,
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TN{}: {}", self.code, self.message)
    }
}

/// Result of a tree mutation that can violate a grammar invariant.
pub type DescriptorResult<T> = Result<T, &'static ErrorDescriptor>;

// ============================================================================
// Error catalogue
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! err {
        ($code:expr, $category:ident, $msg:expr) => {
            ErrorDescriptor { code: $code, category: ErrorCategory::$category, message: $msg }
        };
    }

    // ========================================================================
    // Array syntax (1000-1999)
    // ========================================================================
    pub const INVALID_ARRAY: ErrorDescriptor = err!(1000, Array, "Invalid array");
    pub const INVALID_ARRAY_START: ErrorDescriptor = err!(1001, Array, "Invalid array start");
    pub const INVALID_ARRAY_END: ErrorDescriptor = err!(1002, Array, "Invalid array end");

    // ========================================================================
    // Type name syntax (2000-2999)
    // ========================================================================
    pub const INVALID_TYPE_NAME: ErrorDescriptor = err!(2000, TypeName, "Invalid type name");
    pub const INVALID_TYPE_NAME_START: ErrorDescriptor = err!(2001, TypeName, "Invalid type name start");
    pub const INVALID_TYPE_NAME_END: ErrorDescriptor = err!(2002, TypeName, "Invalid type name end");
    pub const INVALID_TYPE_NAME_CHAR: ErrorDescriptor = err!(2003, TypeName, "Invalid character for type name");
    pub const INVALID_TYPE_NAME_TERMINATION: ErrorDescriptor = err!(2004, TypeName, "Invalid type name termination");

    // ========================================================================
    // Generics syntax (3000-3999)
    // ========================================================================
    pub const INVALID_GENERICS: ErrorDescriptor = err!(3000, Generics, "Invalid generics definition");
    pub const INVALID_GENERICS_START: ErrorDescriptor = err!(3001, Generics, "Invalid generics start");
    pub const INVALID_GENERICS_END: ErrorDescriptor = err!(3002, Generics, "Invalid generics end");
    pub const INVALID_GENERICS_ARG_BLOCK_OPEN: ErrorDescriptor = err!(3003, Generics, "Invalid generics argument block open");
    pub const INVALID_GENERICS_ARG_BLOCK_CLOSE: ErrorDescriptor = err!(3004, Generics, "Invalid generics argument block close");
    pub const INVALID_GENERICS_ARGUMENT: ErrorDescriptor = err!(3005, Generics, "Invalid generics argument");
    pub const INVALID_GENERICS_ARGUMENT_START: ErrorDescriptor = err!(3006, Generics, "Invalid generics argument start");
    pub const INVALID_GENERICS_ARGUMENT_END: ErrorDescriptor = err!(3007, Generics, "Invalid generics argument end");
    pub const INVALID_GENERICS_COUNT: ErrorDescriptor = err!(3008, Generics, "Invalid generics argument count");

    // ========================================================================
    // Assembly identity syntax (4000-4999)
    // ========================================================================
    pub const INVALID_ASSEMBLY_NAME: ErrorDescriptor = err!(4000, Assembly, "Invalid assembly name");
    pub const INVALID_ASSEMBLY_VERSION: ErrorDescriptor = err!(4001, Assembly, "Invalid assembly version");
    pub const INVALID_ASSEMBLY_VERSION_VALUE: ErrorDescriptor = err!(4002, Assembly, "Invalid assembly version value");
    pub const INVALID_ASSEMBLY_CULTURE: ErrorDescriptor = err!(4003, Assembly, "Invalid assembly culture");
    pub const INVALID_ASSEMBLY_CULTURE_VALUE: ErrorDescriptor = err!(4004, Assembly, "Invalid assembly culture value");
    pub const INVALID_ASSEMBLY_PUBLIC_KEY_TOKEN: ErrorDescriptor = err!(4005, Assembly, "Invalid assembly public key token");
    pub const INVALID_ASSEMBLY_PUBLIC_KEY_TOKEN_VALUE: ErrorDescriptor = err!(4006, Assembly, "Invalid assembly public key token value");
    pub const INVALID_ASSEMBLY_PROPERTY: ErrorDescriptor = err!(4007, Assembly, "Invalid assembly property");
    pub const INVALID_ASSEMBLY_PROPERTY_VALUE: ErrorDescriptor = err!(4008, Assembly, "Invalid assembly property value");

    // ========================================================================
    // Already defined (5000-5999)
    // ========================================================================
    pub const TYPE_NAME_ALREADY_DEFINED: ErrorDescriptor = err!(5000, AlreadyDefined, "Type name already defined");
    pub const ASSEMBLY_NAME_ALREADY_DEFINED: ErrorDescriptor = err!(5001, AlreadyDefined, "Assembly name is already defined");
    pub const ASSEMBLY_VERSION_ALREADY_DEFINED: ErrorDescriptor = err!(5002, AlreadyDefined, "Assembly's version is already defined");
    pub const ASSEMBLY_CULTURE_ALREADY_DEFINED: ErrorDescriptor = err!(5003, AlreadyDefined, "Assembly's culture is already defined");
    pub const ASSEMBLY_PUBLIC_KEY_TOKEN_ALREADY_DEFINED: ErrorDescriptor = err!(5004, AlreadyDefined, "Assembly's public key token is already defined");

    // ========================================================================
    // Defined out of order (6000-6999)
    // ========================================================================
    pub const CANNOT_DEFINE_VERSION_BEFORE_ASSEMBLY_NAME: ErrorDescriptor = err!(6000, DefinedOutOfOrder, "Can not define assembly version before assembly name");
    pub const CANNOT_DEFINE_CULTURE_BEFORE_ASSEMBLY_NAME: ErrorDescriptor = err!(6001, DefinedOutOfOrder, "Can not define assembly culture before assembly name");
    pub const CANNOT_DEFINE_PUBLIC_KEY_TOKEN_BEFORE_ASSEMBLY_NAME: ErrorDescriptor = err!(6002, DefinedOutOfOrder, "Can not define assembly public key token before assembly name");

    // ========================================================================
    // Capacity exceeded (9000-9999)
    // ========================================================================
    pub const GENERICS_ARGUMENTS_COUNT_EXCEEDED: ErrorDescriptor = err!(9000, CapacityExceeded, "Generics arguments count exceeded");
    pub const NESTING_DEPTH_EXCEEDED: ErrorDescriptor = err!(9001, CapacityExceeded, "Generics arguments nesting depth exceeded");

    /// Every descriptor in the catalogue, in code order.
    pub static ALL: &[&ErrorDescriptor] = &[
        &INVALID_ARRAY,
        &INVALID_ARRAY_START,
        &INVALID_ARRAY_END,
        &INVALID_TYPE_NAME,
        &INVALID_TYPE_NAME_START,
        &INVALID_TYPE_NAME_END,
        &INVALID_TYPE_NAME_CHAR,
        &INVALID_TYPE_NAME_TERMINATION,
        &INVALID_GENERICS,
        &INVALID_GENERICS_START,
        &INVALID_GENERICS_END,
        &INVALID_GENERICS_ARG_BLOCK_OPEN,
        &INVALID_GENERICS_ARG_BLOCK_CLOSE,
        &INVALID_GENERICS_ARGUMENT,
        &INVALID_GENERICS_ARGUMENT_START,
        &INVALID_GENERICS_ARGUMENT_END,
        &INVALID_GENERICS_COUNT,
        &INVALID_ASSEMBLY_NAME,
        &INVALID_ASSEMBLY_VERSION,
        &INVALID_ASSEMBLY_VERSION_VALUE,
        &INVALID_ASSEMBLY_CULTURE,
        &INVALID_ASSEMBLY_CULTURE_VALUE,
        &INVALID_ASSEMBLY_PUBLIC_KEY_TOKEN,
        &INVALID_ASSEMBLY_PUBLIC_KEY_TOKEN_VALUE,
        &INVALID_ASSEMBLY_PROPERTY,
        &INVALID_ASSEMBLY_PROPERTY_VALUE,
        &TYPE_NAME_ALREADY_DEFINED,
        &ASSEMBLY_NAME_ALREADY_DEFINED,
        &ASSEMBLY_VERSION_ALREADY_DEFINED,
        &ASSEMBLY_CULTURE_ALREADY_DEFINED,
        &ASSEMBLY_PUBLIC_KEY_TOKEN_ALREADY_DEFINED,
        &CANNOT_DEFINE_VERSION_BEFORE_ASSEMBLY_NAME,
        &CANNOT_DEFINE_CULTURE_BEFORE_ASSEMBLY_NAME,
        &CANNOT_DEFINE_PUBLIC_KEY_TOKEN_BEFORE_ASSEMBLY_NAME,
        &GENERICS_ARGUMENTS_COUNT_EXCEEDED,
        &NESTING_DEPTH_EXCEEDED,
    ];

    /// Look up a descriptor by its code.
    pub fn by_code(code: u32) -> Option<&'static ErrorDescriptor> {
        ALL.iter().copied().find(|d| d.code == code)
    }
}
