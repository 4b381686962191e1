//! Error taxonomy for the container decoder, the Lingo VM, and the network
//! manager. Modeled as `thiserror`-derived enums per subsystem rather than
//! the ad hoc `Result<_, String>` style, so callers can match on failure
//! kind instead of parsing a message.

use thiserror::Error;

/// Failure reading the outer RIFX/XFIR container itself: bad magic, an
/// unreadable memory map, or an afterburner section that doesn't parse.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("not a Director/Shockwave file: bad magic {found:#010x}")]
    BadMagic { found: u32 },

    #[error("unsupported codec {found:#010x}")]
    UnsupportedCodec { found: u32 },

    #[error("expected '{expected}' section but found '{found}'")]
    UnexpectedSection { expected: &'static str, found: String },

    #[error("afterburner map has no entry for resource {0}")]
    MissingResource(u32),

    #[error("afterburner section '{section}' failed to decompress: {reason}")]
    Decompression { section: &'static str, reason: String },

    #[error("no config chunk present")]
    MissingConfig,

    #[error("no key table chunk present")]
    MissingKeyTable,

    #[error(transparent)]
    Chunk(#[from] ChunkParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure decoding a single chunk's payload once its bytes have been
/// located and (if needed) decompressed. Per the container decoder's
/// failure semantics, a `ChunkParseError` for one chunk does not abort the
/// whole load: the chunk is logged and omitted.
#[derive(Debug, Error)]
pub enum ChunkParseError {
    #[error("chunk '{fourcc}' #{id}: {reason}")]
    Malformed {
        fourcc: String,
        id: u32,
        reason: String,
    },

    #[error("no deserializer registered for chunk kind '{0}'")]
    UnknownKind(String),

    #[error("chunk '{fourcc}' #{id}: expected length {expected} but read {actual}")]
    LengthMismatch {
        fourcc: String,
        id: u32,
        expected: usize,
        actual: usize,
    },
}

/// A fault raised by the execution of a single opcode: the VM's dispatcher
/// catches this, attributes it to the offending handler, and turns it into
/// a `VmFault` that the event dispatcher can see.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OpFault {
    #[error("stack underflow: needed {needed} operand(s), had {had}")]
    StackUnderflow { needed: usize, had: usize },

    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u16),

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("undefined handler '{0}'")]
    UndefinedHandler(String),

    #[error("ancestor chain exceeds depth limit ({limit})")]
    AncestorDepthExceeded { limit: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("chunk expression out of range")]
    ChunkOutOfRange,

    #[error("jump target {0} out of range")]
    BadJumpTarget(usize),
}

/// A fault that escaped opcode execution and is visible to the VM's caller:
/// either an `OpFault` that propagated out of a handler with no enclosing
/// `pass()`, or the step-budget watchdog tripping.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VmFault {
    #[error("in handler '{handler}' at pc {pc}: {source}")]
    Op {
        handler: String,
        pc: usize,
        #[source]
        source: OpFault,
    },

    #[error("step budget of {budget} instructions exceeded")]
    StepBudgetExceeded { budget: usize },

    #[error("scope stack exhausted (recursion too deep)")]
    ScopeStackExhausted,
}

/// A network task failure, surfaced to Lingo through `netError()`/polling
/// rather than as a Rust-level `Result` — the VM never blocks on a task and
/// never sees this type directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetError {
    #[error("could not resolve URL '{0}'")]
    InvalidUrl(String),

    #[error("no provider registered for scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("request failed with status {0}")]
    Status(u16),
}

/// Umbrella error for the public `Engine` API.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Vm(#[from] VmFault),
}
