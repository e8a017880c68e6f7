mod host;
mod runtime;

#[cfg(test)]
mod tests;

pub use host::HostEnvironment;
pub use runtime::Shell;
