//! Engine construction options (`spec.md` §6's "Configuration" list).
//!
//! There is no environment-variable or file-based configuration layer: the
//! core is a library, not a CLI, so options are passed directly by the
//! embedding host.

use url::Url;

/// Options threaded through VM construction. Defaults match the behavior
/// observed in the reference player.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Instruction ceiling for a single handler invocation. The VM's only
    /// execution limiter — there is no wall-clock timeout.
    pub step_budget: usize,

    /// Maximum hops walked when resolving a property/handler through an
    /// ancestor chain, to guard against cyclic ancestry.
    pub ancestor_depth_limit: usize,

    /// Delimiter used by "item" string-chunk expressions.
    pub string_chunk_item_delimiter: char,

    /// Sprite channel count. `None` derives it from the movie's config
    /// chunk / Director version at load time.
    pub channel_count: Option<usize>,

    /// Base URL resolved against for relative net requests.
    pub base_url: Option<Url>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            step_budget: 500_000,
            ancestor_depth_limit: 16,
            string_chunk_item_delimiter: ',',
            channel_count: None,
            base_url: None,
        }
    }
}

/// Hook for a debugger/inspector to observe VM execution without the VM
/// depending on any particular UI.
pub trait DebugTap {
    /// Called before each instruction executes. Returning `false` pauses
    /// execution at this point.
    fn on_instruction(&mut self, handler_name: &str, bytecode_index: usize) -> bool {
        let _ = (handler_name, bytecode_index);
        true
    }

    fn on_handler_enter(&mut self, handler_name: &str) {
        let _ = handler_name;
    }

    fn on_handler_exit(&mut self, handler_name: &str) {
        let _ = handler_name;
    }
}

/// A `DebugTap` that never pauses and records nothing; the default when no
/// host debugger is attached.
#[derive(Default)]
pub struct NullDebugTap;

impl DebugTap for NullDebugTap {}
