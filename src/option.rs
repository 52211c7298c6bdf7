use std::collections::HashMap;

/// How the desugarer negates the duplicated operands of an XOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XorExpansion {
    /// Negate every duplicated operand with a `NOT` instruction, so
    /// `A XOR B` is exactly the symmetric difference of `A` and `B`.
    #[default]
    Complement,
    /// Negate single-predicate operands through [`crate::Predicate::invert`]
    /// and compound operands with `NOT`.
    ///
    /// An inverted predicate still excludes null fields, and inverted
    /// membership tests are not complements, so results can differ from
    /// [`XorExpansion::Complement`] on such entities.
    InvertLeaves,
}

/// Default ceiling on the length of a compiled program.
pub const DEFAULT_MAX_INSTRUCTIONS: usize = 1 << 16;

/// Configure the operations of the filter engine.
#[derive(Debug, Clone)]
pub struct EngineOption {
    pub(crate) column_aliases: HashMap<String, String>,
    pub(crate) xor_expansion: XorExpansion,
    pub(crate) max_instructions: usize,
}

impl Default for EngineOption {
    fn default() -> Self {
        Self {
            column_aliases: HashMap::new(),
            xor_expansion: XorExpansion::default(),
            max_instructions: DEFAULT_MAX_INSTRUCTIONS,
        }
    }
}

impl EngineOption {
    /// Maps a user-facing column name to the dataset column it reads.
    pub fn column_alias(mut self, alias: impl Into<String>, column: impl Into<String>) -> Self {
        self.column_aliases.insert(alias.into(), column.into());
        self
    }

    pub fn column_aliases<I, A, C>(self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        aliases
            .into_iter()
            .fold(self, |option, (alias, column)| option.column_alias(alias, column))
    }

    pub fn xor_expansion(self, xor_expansion: XorExpansion) -> Self {
        EngineOption {
            xor_expansion,
            ..self
        }
    }

    /// Caps the program length produced by XOR expansion.
    ///
    /// Every XOR duplicates both operands, so a chain of `n` XOR siblings
    /// compiles to roughly `2^(n + 3)` instructions.
    pub fn max_instructions(self, max_instructions: usize) -> Self {
        EngineOption {
            max_instructions,
            ..self
        }
    }
}

impl EngineOption {
    pub(crate) fn resolve_column<'a>(&'a self, column: &'a str) -> &'a str {
        self.column_aliases
            .get(column)
            .map_or(column, String::as_str)
    }
}
