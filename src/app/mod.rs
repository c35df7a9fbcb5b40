mod export;
mod gate;
mod run;
pub(crate) mod summary;

#[cfg(test)]
mod tests;

pub(crate) use run::run_trace;
