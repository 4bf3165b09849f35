mod backend;
mod chart;
mod errors;
mod input;
mod runner;
mod samples;
mod theme;
mod workload;

pub use backend::{Backend, BackendFormat, InfluxDbFormat, LevelDbFormat, MariaDbFormat};
pub use chart::{MissChart, PlotConfig, cache_index};
pub use errors::{BenchlensError, BenchlensResult};
pub use runner::{GenerateOptions, PlotOptions, run_benchlens, run_generate, run_plot};
pub use samples::{CacheMissSample, LEVEL_LABELS, read_samples};
pub use workload::{
    QUERY_VALUE_MAX, StreamSummary, check_stream, generate_query_list, generate_write_list,
    write_query_stream, write_write_stream,
};
