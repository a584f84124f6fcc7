#![warn(missing_docs)]
//! A reference execution engine and typed façade for running compiled
//! modules (§4.6).
//!
//! `InterpEngine` is not a native JIT — it is a tree-walking interpreter
//! that satisfies `va_codegen::ExecutionEngine`, standing in for a real
//! backend so the pipeline can be exercised end to end.

pub mod errors;
pub mod facade;
pub mod interp;

pub use errors::JitError;
pub use facade::CompiledModule;
pub use interp::InterpEngine;
