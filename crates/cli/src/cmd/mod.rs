mod compile;
mod plan;

pub use compile::cmd_compile;
pub use plan::cmd_plan;
