use anyhow::{Context, Result};
use chrono::Local;

use tabclean_cli::pipeline::{RunOutcome, RunRequest, SourcePlan, plan_source, run_source};

use crate::cli::{RunArgs, SourceArgs};

pub fn run(args: &RunArgs) -> Result<RunOutcome> {
    let request = RunRequest {
        src_tag: args.source.src_tag.clone(),
        product: args.source.product.clone(),
        params_dir: args.source.params_dir.clone(),
        src_time: args.src_time.clone(),
        file_path: args.file_path.clone(),
        date_part: args.date_part.clone(),
        now: Local::now().naive_local(),
    };
    // No query driver ships with the binary.
    run_source(&request, None).with_context(|| format!("source `{}`", request.src_tag))
}

pub fn check(args: &SourceArgs) -> Result<SourcePlan> {
    plan_source(&args.params_dir, &args.product, &args.src_tag)
        .with_context(|| format!("source `{}`", args.src_tag))
}
