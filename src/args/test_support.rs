use clap::Parser;

use crate::error::{AppError, AppResult};

use super::VitalsArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<VitalsArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    VitalsArgs::try_parse_from(args).map_err(AppError::from)
}
