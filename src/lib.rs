extern crate serde;
extern crate serde_json;

extern crate clap;
extern crate itertools;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;

pub mod cmd_pipeline;
pub mod dataset_fetch;
pub mod file_format;
pub mod hierarchy;
pub mod lexicon;
pub mod logging;
