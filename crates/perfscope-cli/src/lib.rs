use clap::ValueEnum;
use perfscope_core::metrics::CacheMode;

pub mod commands;
pub mod report;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CacheArg {
    Warm,
    Cold,
}

impl From<CacheArg> for CacheMode {
    fn from(arg: CacheArg) -> Self {
        match arg {
            CacheArg::Warm => CacheMode::Warm,
            CacheArg::Cold => CacheMode::Cold,
        }
    }
}
