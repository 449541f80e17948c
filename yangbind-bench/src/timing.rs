//! Wall-clock helpers for ad-hoc measurements outside criterion.

use std::time::{Duration, Instant};

use yangbind_codegen::{BindingGenerator, CodegenError};
use yangbind_schema::parse_schema_tree;

/// Timings of one load-and-generate run.
#[derive(Debug, Clone, Copy)]
pub struct RunTimings {
    /// Time spent loading the schema tree.
    pub load: Duration,
    /// Time spent in the reactor.
    pub generate: Duration,
    /// Number of top-level types produced.
    pub types: usize,
}

/// Loads `xml` and generates bindings once, timing both steps.
///
/// # Errors
/// Returns `CodegenError` if loading or generation fails.
pub fn time_run(xml: &str) -> Result<RunTimings, CodegenError> {
    let start = Instant::now();
    let tree = parse_schema_tree(xml)?;
    let load = start.elapsed();

    let start = Instant::now();
    let types = BindingGenerator::new().generate(&tree)?.len();
    let generate = start.elapsed();

    Ok(RunTimings {
        load,
        generate,
        types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelShape, synthetic_model};

    #[test]
    fn test_time_run_counts_types() {
        let xml = synthetic_model(ModelShape::new(1, 1, 1));
        let timings = time_run(&xml).expect("Failed to time run");
        assert_eq!(timings.types, 6);
    }
}
