//! Lifecycle phase enumerations.
//!
//! Both enumerations are closed and totally ordered by declaration. The
//! discriminant doubles as the index into the registry's dense bucket tables.
//! Each enumeration is declared through `lifecycle_phases!`, which derives
//! `COUNT`, `ALL` and the name table from the one variant list, so a new phase
//! always gets a bucket and a name. Phase names exist for diagnostics only and
//! never drive control flow.

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// LifecyclePhase
// ─────────────────────────────────────────────────────────────────────────────

/// Behavior shared by both phase enumerations.
///
/// Lets diagnostics code name a phase without caring whether it is a graph
/// phase or a node phase.
pub trait LifecyclePhase: Copy + Ord + fmt::Debug + fmt::Display + 'static {
    /// Number of phases in the enumeration.
    const COUNT: usize;

    /// Returns the dense table index of this phase.
    fn index(self) -> usize;

    /// Returns the human-readable name of this phase.
    fn name(self) -> &'static str;
}

/// Declares a phase enumeration with its `COUNT`, `ALL`, `index`, `name`,
/// [`LifecyclePhase`] and `Display`.
///
/// Variants take no explicit discriminants; declaration order is both the
/// phase order and the bucket index.
macro_rules! lifecycle_phases {
    (
        $(#[$meta:meta])*
        $vis:vis enum $phase:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $phase {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $phase {
            /// Number of phases, counted from the declaration.
            pub const COUNT: usize = [$(stringify!($variant)),+].len();

            /// Every phase, in declaration order.
            pub const ALL: [Self; Self::COUNT] = [$(Self::$variant),+];

            /// Returns the dense table index of this phase.
            #[must_use]
            pub const fn index(self) -> usize {
                self as usize
            }

            /// Returns the human-readable name of this phase.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl LifecyclePhase for $phase {
            const COUNT: usize = $phase::COUNT;

            fn index(self) -> usize {
                $phase::index(self)
            }

            fn name(self) -> &'static str {
                $phase::name(self)
            }
        }

        impl fmt::Display for $phase {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// GraphLifecyclePhase
// ─────────────────────────────────────────────────────────────────────────────

lifecycle_phases! {
    /// Graph-level compilation phases, in pipeline order.
    ///
    /// A single compilation visits each phase at most once, strictly in
    /// declaration order.
    pub enum GraphLifecyclePhase {
        /// Before the dependency topology is built.
        PreTopologyBuild,
        /// After the dependency topology is built.
        PostTopologyBuild,
        /// Before the execution order is computed.
        PreExecutionOrder,
        /// After the execution order is computed.
        PostExecutionOrder,
        /// Before nodes are set up and compiled.
        PreCompilation,
        /// After every node has been compiled.
        PostCompilation,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NodeLifecyclePhase
// ─────────────────────────────────────────────────────────────────────────────

/// The node lifecycle method a [`NodeLifecyclePhase`] brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeStage {
    /// Once per compilation, before any node compiles.
    Setup,
    /// Once per compilation, after every node is set up.
    Compile,
    /// Once per frame.
    Execute,
    /// Once per teardown or recompilation.
    Cleanup,
}

impl NodeStage {
    /// Returns the human-readable name of this stage.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Setup => "Setup",
            Self::Compile => "Compile",
            Self::Execute => "Execute",
            Self::Cleanup => "Cleanup",
        }
    }
}

impl fmt::Display for NodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

lifecycle_phases! {
    /// Node-level lifecycle phases.
    ///
    /// For any one node, `PostSetup` precedes `PreCompile`, and `PreExecute`
    /// never happens before `PostCompile`. The execute pair repeats every
    /// frame; the others run once per compilation.
    pub enum NodeLifecyclePhase {
        /// Before the node's setup.
        PreSetup,
        /// After the node's setup.
        PostSetup,
        /// Before the node's compile.
        PreCompile,
        /// After the node's compile.
        PostCompile,
        /// Before the node executes a frame.
        PreExecute,
        /// After the node executes a frame.
        PostExecute,
        /// Before the node is cleaned up.
        PreCleanup,
        /// After the node is cleaned up.
        PostCleanup,
    }
}

impl NodeLifecyclePhase {
    /// Returns the lifecycle stage this phase brackets.
    #[must_use]
    pub const fn stage(self) -> NodeStage {
        match self {
            Self::PreSetup | Self::PostSetup => NodeStage::Setup,
            Self::PreCompile | Self::PostCompile => NodeStage::Compile,
            Self::PreExecute | Self::PostExecute => NodeStage::Execute,
            Self::PreCleanup | Self::PostCleanup => NodeStage::Cleanup,
        }
    }

    /// Returns true for the phase that runs before its stage.
    #[must_use]
    pub const fn is_pre(self) -> bool {
        self.index() % 2 == 0
    }

    /// Returns the opposite phase bracketing the same stage.
    #[must_use]
    pub const fn pair(self) -> Self {
        Self::ALL[self.index() ^ 1]
    }

    /// Returns the `(pre, post)` phases bracketing a stage.
    #[must_use]
    pub const fn bracketing(stage: NodeStage) -> (Self, Self) {
        match stage {
            NodeStage::Setup => (Self::PreSetup, Self::PostSetup),
            NodeStage::Compile => (Self::PreCompile, Self::PostCompile),
            NodeStage::Execute => (Self::PreExecute, Self::PostExecute),
            NodeStage::Cleanup => (Self::PreCleanup, Self::PostCleanup),
        }
    }
}

// Each `ALL` table must list every variant at its own discriminant, or the
// registry's bucket lookup would route hooks to the wrong phase.
const _: () = {
    let mut i = 0;
    while i < GraphLifecyclePhase::COUNT {
        assert!(GraphLifecyclePhase::ALL[i].index() == i);
        i += 1;
    }
    let mut i = 0;
    while i < NodeLifecyclePhase::COUNT {
        assert!(NodeLifecyclePhase::ALL[i].index() == i);
        i += 1;
    }
};
