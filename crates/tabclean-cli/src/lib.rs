//! Library side of the `tabclean` binary: logging setup and the source
//! pipeline.

pub mod logging;
pub mod pipeline;
