//! The boundary to the (externally supplied) JIT backend (§4.6).
//!
//! The core never compiles machine code itself — it emits an
//! [`crate::ir::IrModule`] and hands it to an `ExecutionEngine`, which is
//! free to be a real native JIT or (as `va_jit::InterpEngine` is) a
//! tree-walking interpreter run in-process.

use crate::errors::EngineError;
use crate::ir::IrModule;

/// Compiles an [`IrModule`] into a [`CompiledArtifact`].
pub trait ExecutionEngine {
    /// Compiles `module`, or fails with a verification error if it is
    /// structurally unsound.
    fn compile(&self, module: &IrModule) -> Result<Box<dyn CompiledArtifact>, EngineError>;
}

/// A compiled module: typed access to its global slots plus the ability
/// to invoke its entry point.
///
/// `global_address` returns a raw pointer into the artifact's own
/// backing storage, matching how a native JIT backend would hand back an
/// address into its data section; callers must know the slot's
/// [`crate::ir::IrType`] (from the originating `IrModule`) to read or
/// write through it safely.
///
/// Every global occupies a full 8-byte little-endian slot regardless of
/// its logical type: `IrType::Real` slots hold an IEEE-754 double;
/// `IrType::Integer` slots hold their `i32` value sign-extended to `i64`.
pub trait CompiledArtifact {
    /// The address of the named global, if it exists in this module.
    ///
    /// # Safety
    ///
    /// The returned pointer is valid only as long as `self` is alive and
    /// is not moved; callers must read/write exactly 8 bytes, interpreted
    /// per the global's declared [`crate::ir::IrType`] as documented on
    /// this trait.
    fn global_address(&self, name: &str) -> Option<*mut u8>;

    /// Invokes the named function (conventionally
    /// [`IrModule::ENTRY_POINT`]).
    fn call(&mut self, function: &str) -> Result<(), EngineError>;
}
