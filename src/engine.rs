use crate::{
    dataset::Dataset,
    error::FilterError,
    observability::log_debug,
    option::EngineOption,
    plan::{desugar, parse, tokenize, Plan},
    set::EntitySet,
    spec::FilterQuery,
};

/// Entry point compiling filter specifications into [`Plan`]s.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    option: EngineOption,
}

impl FilterEngine {
    pub fn new(option: EngineOption) -> Self {
        Self { option }
    }

    /// Compiles `query` without touching any dataset.
    ///
    /// A query without a single leaf compiles to a plan selecting every
    /// entity, and its global inversion is ignored.
    pub fn compile(&self, query: &FilterQuery) -> Result<Plan, FilterError> {
        let leaves = query.leaf_count();
        if leaves == 0 {
            log_debug!(component = "engine", event = "empty_filter");
            return Ok(Plan::all());
        }

        let tokens = tokenize(&query.filters, &self.option)?;
        let token_count = tokens.len();
        let postfix = parse(tokens)?;
        let program = desugar(postfix, &self.option)?;

        log_debug!(
            component = "engine",
            event = "plan_compiled",
            leaves,
            tokens = token_count,
            instructions = program.len(),
            inverted = query.inverted,
        );
        Ok(Plan::new(program, query.inverted))
    }

    /// Compiles and executes `query` against `dataset`.
    pub fn run<D>(&self, query: &FilterQuery, dataset: &D) -> Result<EntitySet, FilterError>
    where
        D: Dataset + ?Sized,
    {
        self.compile(query)?.execute(dataset)
    }
}
