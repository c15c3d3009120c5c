use sval_derive::Value;

/**
The scope name used for every scope block.
*/
pub const SCOPE_NAME: &str = "melt";

/**
The scope version used for every scope block.
*/
pub const SCOPE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Value, Debug, Clone, Copy, PartialEq)]
pub struct InstrumentationScope<'a> {
    #[sval(label = "name", index = 1)]
    pub name: &'a str,
    #[sval(label = "version", index = 2)]
    pub version: &'a str,
}

impl Default for InstrumentationScope<'static> {
    fn default() -> Self {
        InstrumentationScope {
            name: SCOPE_NAME,
            version: SCOPE_VERSION,
        }
    }
}
