//! The built-ins registry (§4.7): a process-wide immutable set of
//! canonical `Function`/`Variable` symbols under stable names.
//!
//! Lowering refers to these by name identity when constructing coerced
//! HIR (casts, arithmetic, comparisons, accessor probes) and when
//! resolving math-intrinsic calls. Names not referenced by a given
//! module are never materialized as IR function declarations by
//! codegen (§4.5).

use crate::types::HirType;

/// How many real (or generically-typed) arguments a math intrinsic
/// takes, and its result type. All math intrinsics are `real -> real`
/// except the binary ones listed in [`BINARY_MATH_INTRINSICS`].
pub const UNARY_MATH_INTRINSICS: &[&str] = &[
    "ln", "log", "exp", "sqrt", "abs", "floor", "ceil", "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh",
    "tanh", "asinh", "acosh", "atanh",
];

/// Binary (`real, real -> real`) math intrinsics.
pub const BINARY_MATH_INTRINSICS: &[&str] = &["pow", "min", "max", "atan2", "hypot"];

/// `cast_int_to_real`: integer -> real.
pub const CAST_INT_TO_REAL: &str = "cast_int_to_real";
/// `cast_real_to_int`: real -> integer.
pub const CAST_REAL_TO_INT: &str = "cast_real_to_int";

/// Canonical integer arithmetic symbol names.
pub const INTEGER_ADDITION: &str = "integer_addition";
/// See [`INTEGER_ADDITION`].
pub const INTEGER_SUBTRACTION: &str = "integer_subtraction";
/// See [`INTEGER_ADDITION`].
pub const INTEGER_PRODUCT: &str = "integer_product";
/// See [`INTEGER_ADDITION`].
pub const INTEGER_DIVISION: &str = "integer_division";
/// See [`INTEGER_ADDITION`].
pub const INTEGER_EQUALITY: &str = "integer_equality";
/// See [`INTEGER_ADDITION`].
pub const INTEGER_INEQUALITY: &str = "integer_inequality";

/// Canonical real arithmetic symbol names.
pub const REAL_ADDITION: &str = "real_addition";
/// See [`REAL_ADDITION`].
pub const REAL_SUBTRACTION: &str = "real_subtraction";
/// See [`REAL_ADDITION`].
pub const REAL_PRODUCT: &str = "real_product";
/// See [`REAL_ADDITION`].
pub const REAL_DIVISION: &str = "real_division";
/// See [`REAL_ADDITION`].
pub const REAL_EQUALITY: &str = "real_equality";
/// See [`REAL_ADDITION`].
pub const REAL_INEQUALITY: &str = "real_inequality";

/// The `potential` accessor probe built-in (`V(...)`).
pub const POTENTIAL: &str = "potential";
/// The `flow` accessor probe built-in (`I(...)`).
pub const FLOW: &str = "flow";

/// `$temperature`'s canonical parameter-like symbol name.
pub const TEMPERATURE: &str = "$temperature";
/// `$temperature`'s default value in degrees Celsius (§4.7).
pub const TEMPERATURE_DEFAULT: f64 = 25.0;

/// Whether `name` is a recognized unary (`real -> real`) math intrinsic.
pub fn is_unary_math_intrinsic(name: &str) -> bool {
    UNARY_MATH_INTRINSICS.contains(&name)
}

/// Whether `name` is a recognized binary (`(real,real) -> real`) math
/// intrinsic.
pub fn is_binary_math_intrinsic(name: &str) -> bool {
    BINARY_MATH_INTRINSICS.contains(&name)
}

/// Looks up a math intrinsic's arity and per-argument/result type, if
/// `name` names one.
pub fn math_intrinsic_signature(name: &str) -> Option<(usize, HirType)> {
    if is_unary_math_intrinsic(name) {
        Some((1, HirType::Real))
    } else if is_binary_math_intrinsic(name) {
        Some((2, HirType::Real))
    } else {
        None
    }
}
