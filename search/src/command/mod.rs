mod builder;
mod kind;
mod spec;

pub use builder::CommandBuilder;
pub use kind::{
    BitsetOptions, BitsetQuery, CommandKind, HalfNumberOptions, LadderStep, NumberOptions,
    OrderOptions, PatternOptions, SetOptions, UnrestrictedOptions, INFINITY_LABEL,
    MAX_BITSET_LETTERS,
};
pub use spec::{CommandSpec, ExplainFn, Modifier};
