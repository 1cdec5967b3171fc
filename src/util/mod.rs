pub(crate) mod panic;
pub(crate) mod result;
